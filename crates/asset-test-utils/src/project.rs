//! [`TestProject`] builder for link scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

/// Kotlin entry point shipped with the fixture.
pub const KOTLIN_ENTRY: &str = "android/app/src/main/java/com/linkdemo/MainApplication.kt";
/// Java variant written by [`TestProject::with_java_entry_point`].
pub const JAVA_ENTRY: &str = "android/app/src/main/java/com/linkdemo/MainApplication.java";
pub const PBXPROJ: &str = "ios/LinkDemo.xcodeproj/project.pbxproj";
pub const INFO_PLIST: &str = "ios/LinkDemo/Info.plist";
pub const ANDROID_MANIFEST: &str = "android/link-assets-manifest.json";
pub const IOS_MANIFEST: &str = "ios/link-assets-manifest.json";

const JAVA_MAIN_APPLICATION: &str = r#"package com.linkdemo;

import android.app.Application;
import com.facebook.react.ReactApplication;
import com.facebook.react.ReactNativeHost;
import com.facebook.soloader.SoLoader;

public class MainApplication extends Application implements ReactApplication {

  @Override
  public void onCreate() {
    super.onCreate();
    SoLoader.init(this, false);
  }
}
"#;

/// Directory of the fixture project.
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/projects/base")
}

/// A temporary copy of the fixture project.
///
/// # Example
///
/// ```rust,no_run
/// use asset_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.add_asset("assets/shared/lato_light.ttf", "light");
/// project.assert_file_exists("assets/shared/lato_light.ttf");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Copy the fixture into a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = fixture_dir();
        for entry in WalkDir::new(&source) {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(&source).unwrap();
            let target = temp_dir.path().join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).unwrap();
            } else {
                fs::copy(entry.path(), &target).unwrap();
            }
        }
        Self { temp_dir }
    }

    /// Swap the Kotlin `MainApplication` for a Java one.
    pub fn with_java_entry_point(self) -> Self {
        fs::remove_file(self.path(KOTLIN_ENTRY)).unwrap();
        fs::write(self.path(JAVA_ENTRY), JAVA_MAIN_APPLICATION).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file (creating parents) relative to the project root.
    pub fn add_asset(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        let path = self.path(relative);
        if path.is_dir() {
            fs::remove_dir_all(path).unwrap();
        } else {
            fs::remove_file(path).unwrap();
        }
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// File names directly inside a directory, sorted.
    pub fn list(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.path(relative)) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Paths recorded in a manifest file, in file order.
    pub fn manifest_paths(&self, manifest: &str) -> Vec<String> {
        let manifest: serde_json::Value = serde_json::from_str(&self.read(manifest)).unwrap();
        manifest["assets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["path"].as_str().unwrap().to_string())
            .collect()
    }

    /// Occurrences of `needle` in a file.
    pub fn count(&self, relative: &str, needle: &str) -> usize {
        self.read(relative).matches(needle).count()
    }

    /// # Panics
    /// Panics if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// # Panics
    /// Panics if the path exists.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            relative,
            content,
            file_content
        );
    }

    /// # Panics
    /// Panics if the file contains `content`.
    pub fn assert_file_not_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            !file_content.contains(content),
            "File {} unexpectedly contains: {}",
            relative,
            content
        );
    }
}
