use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use cellbase::{ColumnFamilyDataAccess, Config, Result, Shell};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run column-family shell commands from a script or stdin")]
struct Args {
    /// JSON config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Script to execute, one command per line. Reads stdin when omitted.
    script: Option<PathBuf>,
}

fn run(args: Args) -> Result<usize> {
    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    info!(?config, "starting shell");

    let shell = Shell::new(ColumnFamilyDataAccess::from_config(&config));
    let mut stdout = io::stdout().lock();
    let summary = match &args.script {
        Some(path) => shell.run(BufReader::new(File::open(path)?), &mut stdout)?,
        None => shell.run(io::stdin().lock(), &mut stdout)?,
    };
    info!(
        executed = summary.executed,
        failed = summary.failed,
        "shell finished"
    );
    Ok(summary.failed)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("CELLBASE_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "shell aborted");
            ExitCode::FAILURE
        },
    }
}
