use std::process::ExitCode;

fn main() -> ExitCode {
    match admissions_chat::cli::main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("❌ {err}");
            ExitCode::FAILURE
        }
    }
}
