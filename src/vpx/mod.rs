//! # VPX asset scanner
//!
//! Finds images and sounds embedded in a Visual Pinball table that nothing in
//! the table refers to. A scan is one pass over one opened container:
//!
//! - [`container`]: stream enumeration and classification.
//! - [`extract`]: asset name recovery from image/sound streams.
//! - [`corpus`]: text of the script and game items.
//! - [`detect`]: the unused-asset test.
//! - [`report`]: console summary and the removal report.
//!
//! The container is only ever read.

pub mod container;
pub mod corpus;
pub mod detect;
pub mod extract;
pub mod report;

use std::cmp::Ordering;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ScanError;
use container::{CfbContainer, Container, StreamClass};
use corpus::ReferenceCorpus;
use extract::{extract_name, AssetKind, SkipReason};

/// One named image or sound found in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub kind: AssetKind,
    pub name: String,
    pub stream_key: String,
    pub byte_size: u64,
}

impl AssetRecord {
    pub fn new(kind: AssetKind, name: &str, stream_key: &str, byte_size: u64) -> Self {
        Self {
            kind,
            name: name.to_string(),
            stream_key: stream_key.to_string(),
            byte_size,
        }
    }

    /// Alphabetical by name; stream key breaks ties between same-named assets.
    pub fn display_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name).then_with(|| a.stream_key.cmp(&b.stream_key))
    }
}

/// An asset stream that yielded no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStream {
    pub stream_key: String,
    pub reason: SkipReason,
}

/// Everything one pass over a container produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub assets: Vec<AssetRecord>,
    pub corpus: ReferenceCorpus,
    pub skipped: Vec<SkippedStream>,
}

impl ScanOutcome {
    pub fn of_kind(&self, kind: AssetKind) -> impl Iterator<Item = &AssetRecord> {
        self.assets.iter().filter(move |a| a.kind == kind)
    }

    pub fn count(&self, kind: AssetKind) -> usize {
        self.of_kind(kind).count()
    }
}

/// Opens the table at `path`, scans it and closes it again.
pub fn scan_path(path: &Path) -> Result<ScanOutcome, ScanError> {
    let mut container = CfbContainer::open(path)?;
    let outcome = scan_container(&mut container);
    info!(
        path = %path.display(),
        assets = outcome.assets.len(),
        skipped = outcome.skipped.len(),
        "scan finished"
    );
    Ok(outcome)
}

/// Collects asset records and the reference corpus in a single pass.
///
/// Per-stream failures never abort the scan. Unreadable or unparsable asset
/// streams end up in [`ScanOutcome::skipped`]; unreadable reference streams
/// are left out of the corpus.
pub fn scan_container<C: Container>(container: &mut C) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for key in container.list_streams() {
        let kind = match StreamClass::of(&key) {
            StreamClass::Image => AssetKind::Image,
            StreamClass::Sound => AssetKind::Sound,
            StreamClass::Reference => {
                match container.read_stream(&key) {
                    Ok(data) => outcome.corpus.push(&data),
                    Err(e) => debug!(stream = %key, error = %e, "reference stream skipped"),
                }
                continue;
            }
            StreamClass::Other => continue,
        };

        match read_asset(container, &key, kind) {
            Ok(record) => outcome.assets.push(record),
            Err(reason) => {
                debug!(stream = %key, kind = kind.label(), %reason, "asset stream skipped");
                outcome.skipped.push(SkippedStream {
                    stream_key: key,
                    reason,
                });
            }
        }
    }

    outcome
}

fn read_asset<C: Container>(
    container: &mut C,
    key: &str,
    kind: AssetKind,
) -> Result<AssetRecord, SkipReason> {
    let data = container
        .read_stream(key)
        .map_err(|e| SkipReason::ReadFailed(e.to_string()))?;
    let name = extract_name(&data, kind)?;
    Ok(AssetRecord::new(kind, &name, key, data.len() as u64))
}
