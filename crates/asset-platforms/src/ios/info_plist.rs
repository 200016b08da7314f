//! `UIAppFonts` maintenance in `Info.plist`

use asset_content::PlistDocument;
use asset_fs::{NormalizedPath, io};

use crate::Result;
use crate::integration::{AssetWarning, LinkOutcome};

pub const FONTS_KEY: &str = "UIAppFonts";

/// Add and remove font file names in the plist's font list.
///
/// A missing plist is only a warning, and only when fonts need adding.
/// Returns whether the file was written.
pub(crate) fn update_fonts(
    path: &NormalizedPath,
    add: &[String],
    remove: &[String],
    outcome: &mut LinkOutcome,
) -> Result<bool> {
    if add.is_empty() && remove.is_empty() {
        return Ok(false);
    }

    let Some(content) = io::read_optional_text(path)? else {
        if !add.is_empty() {
            outcome.warn(AssetWarning::general(format!(
                "{} not found, {} fonts not listed in {}",
                path,
                add.len(),
                FONTS_KEY
            )));
        }
        return Ok(false);
    };

    let mut plist = PlistDocument::parse(&content)?;
    let removed = plist.remove_from_string_array(FONTS_KEY, remove);
    let added = plist.add_to_string_array(FONTS_KEY, add)?;
    if !(removed || added) {
        return Ok(false);
    }

    let written = plist.save(path)?;
    if written {
        outcome.action(format!("updated {} in {}", FONTS_KEY, path));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PLIST: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">
<plist version=\"1.0\">
<dict>
\t<key>CFBundleName</key>
\t<string>Demo</string>
</dict>
</plist>
";

    #[test]
    fn adds_then_removes_fonts() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("Info.plist"));
        fs::write(path.to_native(), PLIST).unwrap();
        let mut outcome = LinkOutcome::default();

        let fonts = vec!["lato_regular.ttf".to_string()];
        assert!(update_fonts(&path, &fonts, &[], &mut outcome).unwrap());
        assert!(!update_fonts(&path, &fonts, &[], &mut outcome).unwrap());
        assert!(fs::read_to_string(path.to_native())
            .unwrap()
            .contains("\t<key>UIAppFonts</key>\n\t<array>\n\t\t<string>lato_regular.ttf</string>\n\t</array>\n"));

        assert!(update_fonts(&path, &[], &fonts, &mut outcome).unwrap());
        assert_eq!(fs::read_to_string(path.to_native()).unwrap(), PLIST);
    }

    #[test]
    fn missing_plist_warns_only_when_adding() {
        let temp = TempDir::new().unwrap();
        let path = NormalizedPath::new(temp.path().join("Info.plist"));
        let mut outcome = LinkOutcome::default();

        update_fonts(&path, &[], &["a.ttf".to_string()], &mut outcome).unwrap();
        assert!(outcome.warnings.is_empty());

        update_fonts(&path, &["a.ttf".to_string()], &[], &mut outcome).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(!path.exists());
    }
}
