use clap::Parser;
use std::process::ExitCode;

mod app;
mod cli;
mod input;
mod viewport;

fn main() -> ExitCode {
    match cli::Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
