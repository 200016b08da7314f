use asset_fs::{NormalizedPath, io};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("android/link-assets-manifest.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("Info.plist");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.txt");
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_read_optional_text_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.json"));
    assert_eq!(io::read_optional_text(&path).unwrap(), None);
}

#[test]
fn test_remove_file_reports_whether_deleted() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("sound.mp3");
    fs::write(&file_path, "mp3").unwrap();
    let path = NormalizedPath::new(&file_path);

    assert!(io::remove_file(&path).unwrap());
    assert!(!io::remove_file(&path).unwrap());
    assert!(!file_path.exists());
}

#[test]
fn test_ensure_dir_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path().join("res/font"));

    io::ensure_dir(&dir).unwrap();
    io::ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[cfg(unix)]
#[test]
fn test_write_atomic_into_readonly_dir_fails() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores permission bits
    let probe = locked.join(".probe");
    if fs::write(&probe, "").is_ok() {
        fs::remove_file(&probe).unwrap();
        return;
    }

    let path = NormalizedPath::new(locked.join("manifest.json"));
    let err = io::write_atomic(&path, b"{}").unwrap_err();
    assert!(matches!(err, asset_fs::Error::Io { .. }));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}
