use clap::Parser;
use dirdump::cli::{MergeArgs, run_merge};
use dirdump::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = MergeArgs::parse();

    match args
        .resolve()
        .and_then(|settings| run_merge(&settings, args.verbosity()))
    {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
