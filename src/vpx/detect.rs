//! Unused asset detection.
//!
//! An asset is considered used when its name occurs anywhere in the reference
//! corpus, ignoring case. This is a plain substring test: a name that happens
//! to be part of a longer identifier counts as used.

use super::corpus::ReferenceCorpus;
use super::extract::AssetKind;
use super::AssetRecord;

/// Assets whose names never appear in the corpus, per category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnusedAssets {
    pub images: Vec<AssetRecord>,
    pub sounds: Vec<AssetRecord>,
}

impl UnusedAssets {
    pub fn image_bytes(&self) -> u64 {
        self.images.iter().map(|a| a.byte_size).sum()
    }

    pub fn sound_bytes(&self) -> u64 {
        self.sounds.iter().map(|a| a.byte_size).sum()
    }

    /// Potential space savings if every unused asset were removed.
    pub fn total_bytes(&self) -> u64 {
        self.image_bytes() + self.sound_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.sounds.is_empty()
    }
}

/// Splits `assets` into the unused ones, sorted by name then stream key.
pub fn find_unused(assets: &[AssetRecord], corpus: &ReferenceCorpus) -> UnusedAssets {
    let mut unused = UnusedAssets::default();
    for asset in assets.iter().filter(|a| !corpus.mentions(&a.name)) {
        match asset.kind {
            AssetKind::Image => unused.images.push(asset.clone()),
            AssetKind::Sound => unused.sounds.push(asset.clone()),
        }
    }
    unused.images.sort_by(AssetRecord::display_order);
    unused.sounds.sort_by(AssetRecord::display_order);
    unused
}
