//! codo binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match codo::cli::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
