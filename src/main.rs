use std::process::ExitCode;

use namesmith::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = namesmith::cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
