use std::process::ExitCode;

fn main() -> ExitCode {
    match ru_locfix::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
