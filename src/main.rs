use std::process::ExitCode;

fn main() -> ExitCode {
    match search_filter::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
