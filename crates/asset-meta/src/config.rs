//! Link configuration schema
//!
//! Mirrors the shape handed over by project discovery:
//!
//! ```toml
//! assets = ["./assets/shared"]
//!
//! [project.android]
//! sourceDir = "android"
//! appName = "app"
//! assets = ["./assets/android"]
//!
//! [project.ios]
//! sourceDir = "ios"
//! assets = ["./assets/ios"]
//! ```

use asset_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::{Error, Platform, Result};

fn default_app_name() -> String {
    "app".to_string()
}

/// Android project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidProjectConfig {
    /// The `android/` directory, relative to the project root or absolute
    pub source_dir: String,
    /// Gradle module holding the application (`app` by default)
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Asset roots linked into Android only
    #[serde(default)]
    pub assets: Vec<String>,
}

/// iOS project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosProjectConfig {
    /// The `ios/` directory, relative to the project root or absolute
    pub source_dir: String,
    /// Asset roots linked into iOS only
    #[serde(default)]
    pub assets: Vec<String>,
    /// `.xcodeproj` bundle relative to `source_dir`; discovered when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    /// `Info.plist` relative to `source_dir`; read from build settings when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_plist: Option<String>,
}

/// Per-platform project sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidProjectConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosProjectConfig>,
}

/// Complete input for one link run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Asset roots shared by every platform
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub project: ProjectConfig,
}

impl LinkConfig {
    /// Load configuration from a TOML or JSON file.
    ///
    /// Format is detected from the file extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let Some(content) = io::read_optional_text(path)? else {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        };
        let extension = path.extension().unwrap_or("").to_ascii_lowercase();

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// Raw source directory configured for a platform, if any.
    pub fn source_dir(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Android => self.project.android.as_ref().map(|c| c.source_dir.as_str()),
            Platform::Ios => self.project.ios.as_ref().map(|c| c.source_dir.as_str()),
        }
    }

    /// Shared roots followed by the platform's own roots.
    pub fn asset_roots(&self, platform: Platform) -> Vec<&str> {
        let platform_roots: &[String] = match platform {
            Platform::Android => self
                .project
                .android
                .as_ref()
                .map(|c| c.assets.as_slice())
                .unwrap_or_default(),
            Platform::Ios => self
                .project
                .ios
                .as_ref()
                .map(|c| c.assets.as_slice())
                .unwrap_or_default(),
        };

        self.assets
            .iter()
            .chain(platform_roots)
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn asset_roots_put_shared_roots_first() {
        let config: LinkConfig = serde_json::from_str(
            r#"{
                "assets": ["./assets/shared"],
                "project": {
                    "android": { "sourceDir": "android", "assets": ["./assets/android"] },
                    "ios": { "sourceDir": "ios" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.asset_roots(Platform::Android),
            vec!["./assets/shared", "./assets/android"]
        );
        assert_eq!(config.asset_roots(Platform::Ios), vec!["./assets/shared"]);
        assert_eq!(config.project.android.unwrap().app_name, "app");
    }

    #[test]
    fn missing_platform_has_no_source_dir() {
        let config = LinkConfig::default();
        assert_eq!(config.source_dir(Platform::Ios), None);
        assert_eq!(config.asset_roots(Platform::Ios), Vec::<&str>::new());
    }
}
