//! Binary entrypoint for the JavaScript parse driver.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match jsdriverd::run_driver() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(io::stderr().lock(), "jsdriverd: {error}").ok();
            ExitCode::FAILURE
        }
    }
}
