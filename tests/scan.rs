//! End-to-end scans of compound documents written on the fly.

use std::io::Write;
use std::path::Path;

use tempfile::tempdir;
use vpxtools::vpx::extract::{AssetKind, SkipReason};
use vpxtools::vpx::{self, detect};
use vpxtools::ScanError;

fn write_cfb(path: &Path, streams: &[(&str, Vec<u8>)]) {
    let mut comp = cfb::create(path).unwrap();
    comp.create_storage("/GameStg").unwrap();
    comp.create_storage("/TableInfo").unwrap();
    for (key, data) in streams {
        let mut stream = comp.create_stream(key).unwrap();
        stream.write_all(data).unwrap();
    }
    comp.flush().unwrap();
}

fn prefixed(payload: &[u8]) -> Vec<u8> {
    let mut data = (payload.len() as u32).to_le_bytes().to_vec();
    data.extend_from_slice(payload);
    data
}

#[test]
fn malformed_streams_are_skipped_and_never_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.vpx");

    let mut overlong = 200u32.to_le_bytes().to_vec();
    overlong.extend_from_slice(b"NAMEshort");

    write_cfb(
        &path,
        &[
            ("/GameStg/GameData", b"Flipper1.Image = \"FlipperRed\"".to_vec()),
            ("/GameStg/Image0", prefixed(b"NAME\x0a\x00\x00\x00FlipperRed")),
            ("/GameStg/Image1", overlong),
            ("/GameStg/Image2", prefixed(b"NAME\x09\x00\x00\x00Backboard")),
            ("/GameStg/Sound0", vec![1, 2]),
            ("/TableInfo/TableName", b"Backboard".to_vec()),
        ],
    );

    let outcome = vpx::scan_path(&path).unwrap();
    assert_eq!(outcome.count(AssetKind::Image), 2);
    assert_eq!(outcome.count(AssetKind::Sound), 0);

    let mut skipped: Vec<_> = outcome
        .skipped
        .iter()
        .map(|s| (s.stream_key.as_str(), s.reason.clone()))
        .collect();
    skipped.sort_by(|a, b| a.0.cmp(b.0));
    assert_eq!(
        skipped,
        [
            ("GameStg/Image1", SkipReason::Truncated { needed: 204, available: 13 }),
            ("GameStg/Sound0", SkipReason::TooShort),
        ]
    );

    // TableInfo is not part of the corpus, so Backboard stays unused.
    let unused = detect::find_unused(&outcome.assets, &outcome.corpus);
    let names: Vec<_> = unused.images.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Backboard"]);
    assert_eq!(unused.images[0].stream_key, "GameStg/Image2");
    assert!(unused.sounds.is_empty());
}

#[test]
fn repeated_scans_agree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.vpx");
    write_cfb(
        &path,
        &[
            ("/GameStg/GameData", b"nothing to see".to_vec()),
            ("/GameStg/Sound0", prefixed(b"Drain__\x00\x00")),
            ("/GameStg/Sound1", prefixed(b"Drain\x00")),
        ],
    );

    let first = vpx::scan_path(&path).unwrap();
    let second = vpx::scan_path(&path).unwrap();
    assert_eq!(first.assets.len(), 2);
    let a = detect::find_unused(&first.assets, &first.corpus);
    let b = detect::find_unused(&second.assets, &second.corpus);
    assert_eq!(a, b);
    // Both streams decode to "Drain" and both are kept.
    assert_eq!(a.sounds.len(), 2);
    assert!(a.sounds.iter().all(|s| s.name == "Drain"));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let err = vpx::scan_path(&dir.path().join("nope.vpx")).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
}

#[test]
fn names_with_stray_bytes_match_their_references() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.vpx");
    write_cfb(
        &path,
        &[
            ("/GameStg/GameData", b"Wall.Image = \"D\xe9cor\"".to_vec()),
            ("/GameStg/Image0", prefixed(b"NAME\x00\x00\x00\x00D\xe9cor")),
        ],
    );

    let outcome = vpx::scan_path(&path).unwrap();
    let names: Vec<_> = outcome.assets.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Dcor"]);
    assert!(detect::find_unused(&outcome.assets, &outcome.corpus).is_empty());
}
