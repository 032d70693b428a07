//! Console summary and removal report.
//!
//! Both are plain formatting over a finished scan. The removal report is
//! advisory: it lists what to delete by hand in the Visual Pinball editor.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::detect::UnusedAssets;
use super::extract::AssetKind;
use super::{AssetRecord, ScanOutcome};
use crate::error::ScanError;

const RULE_WIDTH: usize = 70;
const SAMPLE_NAMES: usize = 5;

/// Formats a byte count with two decimals, e.g. `1.50 KB`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// What was found, before the unused check.
pub fn render_inventory(outcome: &ScanOutcome) -> String {
    Inventory(outcome).to_string()
}

struct Inventory<'a>(&'a ScanOutcome);

impl fmt::Display for Inventory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        let images = outcome.count(AssetKind::Image);
        let sounds = outcome.count(AssetKind::Sound);
        writeln!(f, "Found {} images", images)?;
        writeln!(f, "Found {} sounds", sounds)?;
        writeln!(f, "Game data length: {} characters", outcome.corpus.char_len())?;
        if !outcome.skipped.is_empty() {
            writeln!(f, "Skipped {} asset streams without a usable name", outcome.skipped.len())?;
        }

        for (kind, total) in [(AssetKind::Image, images), (AssetKind::Sound, sounds)] {
            if total == 0 {
                continue;
            }
            let mut names: Vec<&str> = outcome.of_kind(kind).map(|a| a.name.as_str()).collect();
            names.sort_unstable();
            writeln!(f, "\nSample {} names:", kind.label())?;
            for name in names.iter().take(SAMPLE_NAMES) {
                writeln!(f, "  - {}", name)?;
            }
            if total > SAMPLE_NAMES {
                writeln!(f, "  ... and {} more", total - SAMPLE_NAMES)?;
            }
        }
        Ok(())
    }
}

fn unused_section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    plural: &str,
    assets: &[AssetRecord],
    bytes: u64,
) -> fmt::Result {
    writeln!(f, "Unused {}: {} ({})", title, assets.len(), format_size(bytes))?;
    if assets.is_empty() {
        return writeln!(f, "  All {} are being used!", plural);
    }
    writeln!(f, "\nUnused {} list:", plural.trim_end_matches('s'))?;
    for asset in assets {
        writeln!(f, "  - {:40} {:>12}  [{}]", asset.name, format_size(asset.byte_size), asset.stream_key)?;
    }
    Ok(())
}

/// Unused assets per category with sizes, and the total potential savings.
///
/// `file_size` is the size of the scanned file; it is only used for the
/// percentage line.
pub fn render_unused(unused: &UnusedAssets, file_size: u64) -> String {
    UnusedSummary { unused, file_size }.to_string()
}

struct UnusedSummary<'a> {
    unused: &'a UnusedAssets,
    file_size: u64,
}

impl fmt::Display for UnusedSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unused = self.unused;
        unused_section(f, "Images", "images", &unused.images, unused.image_bytes())?;
        writeln!(f)?;
        unused_section(f, "Sounds", "sounds", &unused.sounds, unused.sound_bytes())?;

        let total = unused.total_bytes();
        writeln!(f, "\n{}", rule('='))?;
        writeln!(f, "Total potential space savings: {}", format_size(total))?;
        if total > 0 && self.file_size > 0 {
            let percent = total as f64 / self.file_size as f64 * 100.0;
            writeln!(f, "   ({:.1}% of file size)", percent)?;
        }
        writeln!(f, "{}", rule('='))
    }
}

/// `<dir>/<stem>_removal_list_<YYYYMMDD_HHMMSS>.txt` next to the scanned file.
pub fn removal_report_path(input: &Path, at: DateTime<Local>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    let file_name = format!("{}_removal_list_{}.txt", stem, at.format("%Y%m%d_%H%M%S"));
    input.with_file_name(file_name)
}

fn name_list(f: &mut fmt::Formatter<'_>, title: &str, assets: &[AssetRecord]) -> fmt::Result {
    writeln!(f, "{} ({}):", title, assets.len())?;
    writeln!(f, "{}", rule('-'))?;
    if assets.is_empty() {
        writeln!(f, "  (none)")?;
    }
    for asset in assets {
        writeln!(f, "  - {}", asset.name)?;
    }
    Ok(())
}

/// Plain-text removal report with manual instructions.
pub fn render_removal_report(input: &Path, unused: &UnusedAssets, generated: DateTime<Local>) -> String {
    RemovalReport { input, unused, generated }.to_string()
}

struct RemovalReport<'a> {
    input: &'a Path,
    unused: &'a UnusedAssets,
    generated: DateTime<Local>,
}

impl fmt::Display for RemovalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", rule('='))?;
        writeln!(f, "VPX CLEANER - ASSET REMOVAL REPORT")?;
        writeln!(f, "{}\n", rule('='))?;
        writeln!(f, "File: {}", self.input.display())?;
        writeln!(f, "Generated: {}\n", self.generated.format("%Y-%m-%d %H:%M:%S"))?;

        name_list(f, "UNUSED IMAGES", &self.unused.images)?;
        f.write_str("\n\n")?;
        name_list(f, "UNUSED SOUNDS", &self.unused.sounds)?;

        writeln!(f, "\n\n{}", rule('='))?;
        writeln!(f, "INSTRUCTIONS FOR MANUAL REMOVAL:")?;
        writeln!(f, "{}", rule('='))?;
        f.write_str(
            "1. Open the VPX file in Visual Pinball\n\
             2. Open the Image Manager (Ctrl+I) or Sound Manager (Ctrl+U)\n\
             3. Select and delete the unused assets listed above\n\
             4. Save the table\n\
             \nNote: this tool never modifies the table file; removal has to be\n\
             done in the editor.\n",
        )
    }
}

/// Writes the removal report next to `input` and returns its path.
pub fn write_removal_report(input: &Path, unused: &UnusedAssets) -> Result<PathBuf, ScanError> {
    let now = Local::now();
    let path = removal_report_path(input, now);
    let body = render_removal_report(input, unused, now);
    fs::write(&path, body).map_err(|source| ScanError::ReportWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
