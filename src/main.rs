use std::process::ExitCode;

use clap::Parser;

use desktop_wm::cli::{self, Cli};
use desktop_wm::tracing_sub;

fn main() -> ExitCode {
    let args = Cli::parse();
    if let Err(err) = tracing_sub::init(
        args.log_file.as_deref(),
        args.is_interactive(),
        args.verbose,
    ) {
        eprintln!("desktop-wm: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }

    match cli::execute(args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("desktop-wm: {err}");
            ExitCode::FAILURE
        }
    }
}
