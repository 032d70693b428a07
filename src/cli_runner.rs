//! Reusable CLI runners so that `vpxcleaner` and `gist-sync` stay thin
//! `main` wrappers. All printing and prompting happens here; the library
//! modules only compute.

use crate::cli::{CleanerArgs, CleanerCommands, GistArgs, GistCommands};
use crate::config::{ApiConfig, ListConfig, ScanConfig, SyncConfig};
use crate::error::{GistError, ScanError};
use crate::gist::client::{GistApi, GithubClient};
use crate::gist::filter;
use crate::gist::state::SyncState;
use crate::gist::sync::{self, SyncReport};
use crate::logging;
use crate::vpx::{self, detect, report};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};

fn banner(title: &str) {
    println!("{}", "=".repeat(70));
    println!("{}", title);
    println!("{}", "=".repeat(70));
}

/// Entry point of the `vpxcleaner` binary.
pub fn run_cleaner_app() -> Result<(), Box<dyn std::error::Error>> {
    let args = CleanerArgs::parse();
    logging::init(args.verbose);

    match args.command {
        CleanerCommands::Scan { vpx_file, remove } => {
            let config = ScanConfig {
                vpx_file,
                write_report: remove,
            };
            run_scan(&config)?;
        }
    }
    Ok(())
}

fn run_scan(config: &ScanConfig) -> Result<(), ScanError> {
    let path = &config.vpx_file;
    // Checked up front so a typo never gets as far as the container reader.
    if !path.exists() {
        return Err(ScanError::NotFound(path.clone()));
    }
    let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    banner("VPX CLEANER - Visual Pinball Asset Analyzer");
    println!("\nAnalyzing VPX file...");
    println!("   File: {}", path.display());
    println!("   Size: {}\n", report::format_size(file_size));

    let outcome = vpx::scan_path(path)?;
    print!("{}", report::render_inventory(&outcome));

    println!();
    banner("CHECKING FOR UNUSED ASSETS...");
    println!();

    let unused = detect::find_unused(&outcome.assets, &outcome.corpus);
    print!("{}", report::render_unused(&unused, file_size));

    if !config.write_report {
        if !unused.is_empty() {
            println!("\nTip: Use --remove flag to generate a removal report");
            println!("   Example: vpxcleaner scan {} --remove", path.display());
        }
        return Ok(());
    }

    if unused.is_empty() {
        println!("\nNo unused assets to remove!");
        return Ok(());
    }

    println!();
    banner("GENERATING REMOVAL REPORT...");
    let report_path = report::write_removal_report(path, &unused)?;
    println!("\nRemoval list saved to: {}", report_path.display());
    println!("\nNOTE: The table file was not modified. Remove the listed assets");
    println!("with Visual Pinball's Image/Sound Manager.");
    println!("{}", "=".repeat(70));
    Ok(())
}

/// Entry point of the `gist-sync` binary.
pub fn run_gist_app() -> Result<(), Box<dyn std::error::Error>> {
    let args = GistArgs::parse();
    logging::init(args.verbose);

    match args.command {
        GistCommands::List(list) => {
            let config = ListConfig::from_args(&list)?;
            run_list(&config)?;
        }
        GistCommands::Sync(sync_args) => {
            let (config, api) = SyncConfig::from_args(&sync_args)?;
            let report = run_sync(&config, &api, sync_args.yes, sync_args.dry_run)?;
            if !report.failed.is_empty() {
                return Err(format!("{} sync action(s) failed", report.failed.len()).into());
            }
        }
    }
    Ok(())
}

fn client_for(api: &ApiConfig) -> Result<GithubClient, GistError> {
    GithubClient::new(&api.base_url, api.token.clone())
}

fn run_list(config: &ListConfig) -> Result<(), GistError> {
    let client = client_for(&config.api)?;
    let gists = client.list_gists(&config.username)?;
    let selected = filter::select(&gists, &config.range, config.sort);
    for line in filter::render_lines(&selected, config.show_filenames) {
        println!("{}", line);
    }
    Ok(())
}

fn run_sync(
    config: &SyncConfig,
    api: &ApiConfig,
    assume_yes: bool,
    dry_run: bool,
) -> Result<SyncReport, Box<dyn std::error::Error>> {
    fs::create_dir_all(&config.root).map_err(|e| GistError::io(&config.root, e))?;
    let client = client_for(api)?;

    let remote = client.list_gists(&config.username)?;
    let local = sync::scan_local(&config.root)?;
    let mut state = SyncState::load(&config.root)?;
    sync::prune_state(&mut state, &remote, &local);

    let actions = sync::plan(&remote, &local, &state);
    if actions.is_empty() {
        println!("Everything is up to date.");
        return Ok(SyncReport::default());
    }

    println!("Planned actions ({}):", actions.len());
    for action in &actions {
        println!("  {}", action);
    }
    if dry_run {
        return Ok(SyncReport::default());
    }

    let deletions = actions.iter().filter(|a| a.is_destructive()).count();
    let confirm = deletions == 0
        || assume_yes
        || prompt_yes_no(&format!("Apply {} deletion(s)? [y/N] ", deletions))?;

    let report = sync::apply_plan(&client, config, &actions, &mut state, confirm);
    state.save(&config.root)?;

    println!("\nApplied: {}", report.applied.len());
    if !report.skipped.is_empty() {
        println!("Skipped deletions: {} (rerun with --yes to apply)", report.skipped.len());
    }
    for (action, error) in &report.failed {
        eprintln!("Failed: {} ({})", action, error);
    }
    Ok(report)
}

fn prompt_yes_no(question: &str) -> io::Result<bool> {
    eprint!("{}", question);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
