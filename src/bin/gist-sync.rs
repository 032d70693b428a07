//! Entry point for the gist-sync companion CLI.

fn main() -> std::process::ExitCode {
    if let Err(e) = vpxtools::cli_runner::run_gist_app() {
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
