use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::gist::filter::SortOrder;

/// Identify unused images and sounds in Visual Pinball VPX files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CleanerArgs {
    /// Show debug output (skipped streams, per-step logging) on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CleanerCommands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum CleanerCommands {
    /// Scan a table and report images and sounds nothing refers to.
    #[command(alias = "s")]
    Scan {
        /// The VPX file to analyze.
        #[arg(required = true)]
        vpx_file: PathBuf,

        /// Write a removal list next to the table. The table itself is never modified.
        #[arg(short, long)]
        remove: bool,
    },
}

/// List and synchronize GitHub gists.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct GistArgs {
    /// Show debug output on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: GistCommands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum GistCommands {
    /// Print a user's gists created within a date range.
    #[command(alias = "l")]
    List(ListArgs),

    /// Two-way sync between a user's gists and a local directory.
    Sync(SyncArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// GitHub user whose gists are listed.
    #[arg(short, long)]
    pub user: String,

    /// First creation day to include (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub since: Option<String>,

    /// Last creation day to include (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub until: Option<String>,

    /// Ordering of the output.
    #[arg(long, value_enum, default_value_t = SortOrder::Name)]
    pub sort: SortOrder,

    /// Print filenames and update time after each URL; shared filenames are marked **like this**.
    #[arg(long)]
    pub show_filenames: bool,

    /// API token. If not provided, GITHUB_TOKEN is used when set.
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct SyncArgs {
    /// GitHub user that owns the gists.
    #[arg(short, long)]
    pub user: String,

    /// Local directory holding one sub-directory per gist.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// API token with gist scope. If not provided, GITHUB_TOKEN is used.
    #[arg(long)]
    pub token: Option<String>,

    /// Apply deletions without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Only print what would be done.
    #[arg(long)]
    pub dry_run: bool,

    /// Create new gists as public (secret by default).
    #[arg(long)]
    pub public: bool,
}

/// Gets the API token from the command-line option or the `GITHUB_TOKEN` environment variable.
///
/// Priority:
/// 1. `--token` command-line argument.
/// 2. `GITHUB_TOKEN` environment variable (ignored when empty).
/// 3. `None`, leaving the caller to decide whether anonymous access is enough.
pub fn get_token_from_opt_or_env(token_opt: Option<String>) -> Option<String> {
    if let Some(token) = token_opt {
        return Some(token);
    }
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_args() {
        let args = CleanerArgs::try_parse_from(["vpxcleaner", "scan", "table.vpx", "-r"]).unwrap();
        let CleanerCommands::Scan { vpx_file, remove } = args.command;
        assert_eq!(vpx_file, PathBuf::from("table.vpx"));
        assert!(remove);
        assert!(!args.verbose);
    }

    #[test]
    fn test_scan_requires_path() {
        assert!(CleanerArgs::try_parse_from(["vpxcleaner", "scan"]).is_err());
    }

    #[test]
    fn test_list_defaults() {
        let args = GistArgs::try_parse_from(["gist-sync", "list", "--user", "octocat"]).unwrap();
        match args.command {
            GistCommands::List(list) => {
                assert_eq!(list.sort, SortOrder::Name);
                assert!(!list.show_filenames);
                assert!(list.since.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sync_flags() {
        let args = GistArgs::try_parse_from([
            "gist-sync", "-v", "sync", "-u", "octocat", "-d", "gists", "--yes", "--dry-run",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            GistCommands::Sync(sync) => {
                assert_eq!(sync.dir, PathBuf::from("gists"));
                assert!(sync.yes && sync.dry_run && !sync.public);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_explicit_token_wins() {
        assert_eq!(get_token_from_opt_or_env(Some("abc".into())), Some("abc".into()));
    }
}
