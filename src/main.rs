use std::process::ExitCode;

fn main() -> ExitCode {
    depscribe::cli::run()
}
