use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn name_field(payload: &[u8]) -> Vec<u8> {
    let mut data = (payload.len() as u32).to_le_bytes().to_vec();
    data.extend_from_slice(payload);
    data.extend_from_slice(&[0u8; 64]);
    data
}

fn image(name: &str) -> Vec<u8> {
    let mut payload = b"NAME\x00\x00\x00\x00".to_vec();
    payload.extend_from_slice(name.as_bytes());
    name_field(&payload)
}

fn sound(name: &str) -> Vec<u8> {
    let mut payload = name.as_bytes().to_vec();
    payload.extend_from_slice(b"_\x00");
    name_field(&payload)
}

/// Writes a small table: Apron and knocker are referenced, Unused and Orphan are not.
fn write_table(path: &Path, script: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut comp = cfb::create(path)?;
    comp.create_storage("/GameStg")?;
    let streams: Vec<(&str, Vec<u8>)> = vec![
        ("/GameStg/GameData", script.as_bytes().to_vec()),
        ("/GameStg/GameItem0", b"Wall001 Image=Apron".to_vec()),
        ("/GameStg/Image0", image("Apron")),
        ("/GameStg/Image1", image("Unused")),
        ("/GameStg/Sound0", sound("knocker")),
        ("/GameStg/Sound1", sound("Orphan")),
    ];
    for (key, data) in streams {
        let mut stream = comp.create_stream(key)?;
        stream.write_all(&data)?;
    }
    comp.flush()?;
    Ok(())
}

#[test]
fn test_missing_file_exits_with_one() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("vpxcleaner")?;
    cmd.arg("scan").arg(dir.path().join("missing.vpx"));
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
    Ok(())
}

#[test]
fn test_not_a_container_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.vpx");
    fs::write(&path, b"plain text, no compound document header")?;

    let mut cmd = Command::cargo_bin("vpxcleaner")?;
    cmd.arg("scan").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Could not open container"));
    Ok(())
}

#[test]
fn test_scan_reports_unused_assets() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("table.vpx");
    write_table(&table, "Sub Kicker_Hit: PlaySound \"Knocker\": End Sub")?;

    let mut cmd = Command::cargo_bin("vpxcleaner")?;
    cmd.arg("scan").arg(&table);
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("Found 2 images")
                .and(predicate::str::contains("Found 2 sounds"))
                .and(predicate::str::contains("Unused Images: 1"))
                .and(predicate::str::contains("Unused Sounds: 1"))
                .and(predicate::str::contains("- Unused"))
                .and(predicate::str::contains("- Orphan"))
                .and(predicate::str::contains("--remove")),
        );

    // Report-only mode leaves the directory untouched.
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_remove_writes_report_and_keeps_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("table.vpx");
    write_table(&table, "PlaySound \"knocker\"")?;
    let before = fs::read(&table)?;

    let mut cmd = Command::cargo_bin("vpxcleaner")?;
    cmd.arg("scan").arg(&table).arg("--remove");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Removal list saved to:"));

    assert_eq!(fs::read(&table)?, before);

    let reports: Vec<_> = fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("table_removal_list_") && n.ends_with(".txt"))
        .collect();
    assert_eq!(reports.len(), 1);

    let text = fs::read_to_string(dir.path().join(&reports[0]))?;
    assert!(text.contains("UNUSED IMAGES (1):"));
    assert!(text.contains("  - Unused"));
    assert!(text.contains("UNUSED SOUNDS (1):"));
    assert!(text.contains("  - Orphan"));
    Ok(())
}

#[test]
fn test_remove_with_nothing_unused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let table = dir.path().join("clean.vpx");
    write_table(&table, "knocker unused orphan")?;

    let mut cmd = Command::cargo_bin("vpxcleaner")?;
    cmd.arg("scan").arg(&table).arg("-r");
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("All images are being used!")
                .and(predicate::str::contains("No unused assets to remove!")),
        );
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_gist_sync_requires_token() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("gist-sync")?;
    cmd.env_remove("GITHUB_TOKEN")
        .arg("sync")
        .arg("--user")
        .arg("octocat")
        .arg("--dir")
        .arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("token is required"));
    Ok(())
}

#[test]
fn test_gist_list_rejects_bad_dates() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gist-sync")?;
    cmd.arg("list").arg("--user").arg("octocat").arg("--since").arg("06.11.2025");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
    Ok(())
}
