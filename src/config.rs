//! Run configuration.
//!
//! Each command builds its configuration once from built-in defaults merged
//! with the parsed flags and hands it down by reference. Nothing mutates it
//! afterwards.

use std::path::PathBuf;

use crate::cli::{get_token_from_opt_or_env, ListArgs, SyncArgs};
use crate::error::GistError;
use crate::gist::client::DEFAULT_API_BASE;
use crate::gist::filter::{DateRange, SortOrder};

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub vpx_file: PathBuf,
    /// Write the removal list after the summary.
    pub write_report: bool,
}

/// Where and as whom to talk to GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: None,
        }
    }
}

/// Settings for `gist-sync list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub username: String,
    pub range: DateRange,
    pub sort: SortOrder,
    pub show_filenames: bool,
    pub api: ApiConfig,
}

impl ListConfig {
    pub fn from_args(args: &ListArgs) -> Result<Self, GistError> {
        Ok(Self {
            username: args.user.clone(),
            range: DateRange::parse(args.since.as_deref(), args.until.as_deref())?,
            sort: args.sort,
            show_filenames: args.show_filenames,
            api: ApiConfig {
                token: get_token_from_opt_or_env(args.token.clone()),
                ..ApiConfig::default()
            },
        })
    }
}

/// Settings for `gist-sync sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub username: String,
    pub root: PathBuf,
    /// Visibility of gists created from new local directories.
    pub public: bool,
}

impl SyncConfig {
    /// Returns the sync settings plus the API settings; a token is mandatory.
    pub fn from_args(args: &SyncArgs) -> Result<(Self, ApiConfig), GistError> {
        let token = get_token_from_opt_or_env(args.token.clone()).ok_or(GistError::MissingToken)?;
        let config = Self {
            username: args.user.clone(),
            root: args.dir.clone(),
            public: args.public,
        };
        let api = ApiConfig {
            token: Some(token),
            ..ApiConfig::default()
        };
        Ok((config, api))
    }
}
