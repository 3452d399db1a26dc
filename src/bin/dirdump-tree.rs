use clap::Parser;
use dirdump::cli::{TreeArgs, run_tree};
use dirdump::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = TreeArgs::parse();

    match args.resolve().and_then(|settings| run_tree(&settings)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
