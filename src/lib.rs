//! # vpxtools
//!
//! Library behind the `vpxcleaner` and `gist-sync` command-line tools.
//!
//! ## Key Modules
//!
//! - [`vpx`]: scans a Visual Pinball `.vpx` table for images and sounds that
//!   nothing in the table refers to. Read-only.
//! - [`gist`]: lists a user's GitHub gists and syncs them with a local directory.
//! - [`cli`] / [`cli_runner`]: argument parsing and the console front ends.
//! - [`config`]: immutable per-command settings built from defaults and flags.
//!
//! ## Examples
//!
//! ```no_run
//! use std::path::Path;
//! use vpxtools::vpx::{self, detect};
//!
//! let outcome = vpx::scan_path(Path::new("table.vpx"))?;
//! let unused = detect::find_unused(&outcome.assets, &outcome.corpus);
//! println!("{} bytes could be saved", unused.total_bytes());
//! # Ok::<(), vpxtools::ScanError>(())
//! ```

pub mod cli;
pub mod cli_runner;
pub mod config;
pub mod error;
pub use error::{GistError, ScanError};

pub mod gist;
pub mod logging;
pub mod vpx;
