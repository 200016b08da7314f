use assert_fs::prelude::*;
use asset_fs::{NormalizedPath, compute_content_checksum, compute_file_checksum, io};

#[test]
fn checksum_of_file_matches_checksum_of_content() {
    let temp = assert_fs::TempDir::new().unwrap();
    let font = temp.child("assets/fonts/lato_regular.ttf");
    font.write_str("not really a font").unwrap();

    let checksum = compute_file_checksum(font.path()).unwrap();

    assert_eq!(checksum, compute_content_checksum("not really a font"));
    assert!(checksum.starts_with("sha256:"));
}

#[test]
fn checksum_of_directory_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("assets").create_dir_all().unwrap();

    assert!(compute_file_checksum(&temp.path().join("assets")).is_err());
}

#[test]
fn write_text_fails_when_parent_is_a_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("android").touch().unwrap();

    let path = NormalizedPath::new(temp.path().join("android/link-assets-manifest.json"));
    assert!(io::write_text(&path, "{}").is_err());
    temp.child("android").assert("");
}

#[test]
fn write_text_if_changed_leaves_identical_file_alone() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plist = temp.child("ios/LinkDemo/Info.plist");
    plist.write_str("<plist/>\n").unwrap();

    let path = NormalizedPath::new(plist.path());
    assert!(!io::write_text_if_changed(&path, "<plist/>\n").unwrap());
    assert!(io::write_text_if_changed(&path, "<plist></plist>\n").unwrap());
    plist.assert("<plist></plist>\n");
}

#[test]
fn remove_file_reports_whether_it_existed() {
    let temp = assert_fs::TempDir::new().unwrap();
    let sound = temp.child("android/app/src/main/res/raw/sound_mp3.mp3");
    sound.touch().unwrap();

    let path = NormalizedPath::new(sound.path());
    assert!(io::remove_file(&path).unwrap());
    assert!(!io::remove_file(&path).unwrap());
    sound.assert(predicates::path::missing());
}
