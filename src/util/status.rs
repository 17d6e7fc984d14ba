use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    Ok,
    NotFound,
    AlreadyExists,
    Corruption,
    InvalidArgument,
    IOError,
    /// The table must be disabled before this operation
    TableNotDisabled,
    /// The table must be enabled before this operation
    TableNotEnabled,
    /// Data operation against a disabled table
    TableDisabled,
}

#[derive(Debug, Clone)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn ok() -> Self {
        Status {
            code: Code::Ok,
            message: None,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status {
            code: Code::NotFound,
            message: Some(msg.into()),
        }
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Status {
            code: Code::AlreadyExists,
            message: Some(msg.into()),
        }
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Status {
            code: Code::Corruption,
            message: Some(msg.into()),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidArgument,
            message: Some(msg.into()),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Status {
            code: Code::IOError,
            message: Some(msg.into()),
        }
    }

    pub fn table_not_disabled(table: &str) -> Self {
        Status {
            code: Code::TableNotDisabled,
            message: Some(format!("table '{table}' is not disabled")),
        }
    }

    pub fn table_not_enabled(table: &str) -> Self {
        Status {
            code: Code::TableNotEnabled,
            message: Some(format!("table '{table}' is not enabled")),
        }
    }

    pub fn table_disabled(table: &str) -> Self {
        Status {
            code: Code::TableDisabled,
            message: Some(format!("table '{table}' is disabled")),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_already_exists(&self) -> bool {
        self.code == Code::AlreadyExists
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_table_not_disabled(&self) -> bool {
        self.code == Code::TableNotDisabled
    }

    pub fn is_table_not_enabled(&self) -> bool {
        self.code == Code::TableNotEnabled
    }

    pub fn is_table_disabled(&self) -> bool {
        self.code == Code::TableDisabled
    }

    pub fn is_corruption(&self) -> bool {
        self.code == Code::Corruption
    }

    pub fn is_io_error(&self) -> bool {
        self.code == Code::IOError
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

impl From<std::io::Error> for Status {
    fn from(err: std::io::Error) -> Self {
        Status::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::corruption(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Status>;
