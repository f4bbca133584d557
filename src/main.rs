use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Run a gimmick source file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the source file to compile and run.
    path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let source = match fs::read_to_string(&args.path) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!(path = %args.path.display(), %err, "could not read source file");
            return ExitCode::FAILURE;
        }
    };

    match gimmick::compile_and_run(&source) {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "run failed");
            ExitCode::FAILURE
        }
    }
}
