pub mod clock;
pub mod slice;
pub mod status;

pub use clock::{LATEST_TIMESTAMP, TimestampOracle, now_millis};
pub use slice::Slice;
pub use status::{Code, Result, Status};
