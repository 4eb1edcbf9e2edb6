//! Binary entrypoint for the terminal tournament assistant.

use std::process::ExitCode;

use tourney_assistant::start_assistant;

fn main() -> ExitCode {
    start_assistant::run()
}
