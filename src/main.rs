//! Main entry point for the vpxcleaner CLI app

fn main() -> std::process::ExitCode {
    if let Err(e) = vpxtools::cli_runner::run_cleaner_app() {
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
