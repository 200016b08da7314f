//! Link, relink and unlink scenarios over the fixture app
//!
//! Each test copies `test-fixtures/projects/base` into a temporary directory
//! and drives the whole engine: discovery, manifests and both linkers.

use std::collections::BTreeMap;

use asset_content::{FontFamilyXml, PlistDocument, XcodeProject};
use asset_core::{LinkEngine, LinkReport, PlatformStatus};
use asset_fs::NormalizedPath;
use asset_meta::{LinkConfig, Platform};
use asset_platforms::ios::project::{find_resources_group, group_children};
use asset_test_utils::TestProject;
use asset_test_utils::project::{
    ANDROID_MANIFEST, INFO_PLIST, IOS_MANIFEST, JAVA_ENTRY, KOTLIN_ENTRY, PBXPROJ,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

const FONT_DIR: &str = "android/app/src/main/res/font";

async fn link(project: &TestProject) -> LinkReport {
    let root = NormalizedPath::new(project.root());
    let config = LinkConfig::load(&root.join("link-assets.toml")).unwrap();
    let report = LinkEngine::new(root, config).run().await;
    assert!(report.success(), "{:?}", report);
    report
}

fn counts(report: &LinkReport, platform: Platform) -> (usize, usize, usize) {
    let r = report.platform(platform).unwrap();
    assert_eq!(r.status, PlatformStatus::Linked);
    (r.added, r.removed, r.changed)
}

fn resources_children(project: &TestProject) -> Vec<String> {
    let xcode = XcodeProject::parse(&project.read(PBXPROJ)).unwrap();
    let group = find_resources_group(&xcode).unwrap();
    group_children(&xcode, &group)
}

fn family_entries(project: &TestProject, family: &str) -> Vec<String> {
    let xml = FontFamilyXml::parse(&project.read(&format!("{}/{}.xml", FONT_DIR, family))).unwrap();
    xml.entries().iter().map(|e| e.font.clone()).collect()
}

fn app_fonts(project: &TestProject) -> Vec<String> {
    let plist = PlistDocument::parse(&project.read(INFO_PLIST)).unwrap();
    plist.string_array("UIAppFonts")
}

/// Every file in the project with its content.
fn snapshot(project: &TestProject) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(project.root())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(project.root()).unwrap();
            (
                relative.to_string_lossy().into_owned(),
                std::fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn first_link_kotlin() {
    let project = TestProject::new();
    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (10, 0, 0));
    assert_eq!(counts(&report, Platform::Ios), (9, 0, 0));

    assert_eq!(
        family_entries(&project, "lato"),
        vec!["lato_regular", "lato_bold", "lato_bolditalic"]
    );
    assert_eq!(
        family_entries(&project, "firacode"),
        vec!["firacode_regular", "firacode_bold"]
    );
    project.assert_file_exists("android/app/src/main/res/raw/sound.mp3");
    project.assert_file_exists("android/app/src/main/res/drawable/image_gif.gif");
    project.assert_file_exists("android/app/src/main/res/drawable/image_jpg.jpg");
    project.assert_file_exists("android/app/src/main/res/drawable/image_png.png");
    project.assert_file_exists("android/app/src/main/assets/custom/document.pdf");
    project.assert_file_contains(KOTLIN_ENTRY, "addCustomFont(this, \"lato\", R.font.lato)\n");
    project.assert_file_contains(KOTLIN_ENTRY, "addCustomFont(this, \"firacode\", R.font.firacode)\n");

    assert_eq!(resources_children(&project).len(), 9);
    assert_eq!(
        app_fonts(&project),
        vec![
            "Raleway-Regular.ttf",
            "firacode_bold.otf",
            "firacode_regular.otf",
            "lato_regular.ttf",
        ]
    );

    assert_eq!(project.manifest_paths(ANDROID_MANIFEST).len(), 10);
    assert_eq!(
        project.manifest_paths(IOS_MANIFEST),
        vec![
            "assets/ios/Raleway-Regular.ttf",
            "assets/shared/custom/document.pdf",
            "assets/shared/firacode_bold.otf",
            "assets/shared/firacode_regular.otf",
            "assets/shared/image_gif.gif",
            "assets/shared/image_jpg.jpg",
            "assets/shared/image_png.png",
            "assets/shared/lato_regular.ttf",
            "assets/shared/sound.mp3",
        ]
    );
}

#[tokio::test]
async fn first_link_java() {
    let project = TestProject::new().with_java_entry_point();
    link(&project).await;

    project.assert_file_contains(JAVA_ENTRY, "addCustomFont(this, \"lato\", R.font.lato);\n");
    project.assert_file_contains(
        JAVA_ENTRY,
        "import com.facebook.react.common.assets.ReactFontManager;\n",
    );
    assert_eq!(family_entries(&project, "lato").len(), 3);
}

#[tokio::test]
async fn relink_with_new_assets() {
    let project = TestProject::new();
    link(&project).await;

    project.add_asset("assets/shared/lato_light.ttf", "lato light");
    project.add_asset("assets/android/montserrat_regular.ttf", "montserrat");
    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (2, 0, 0));
    assert_eq!(counts(&report, Platform::Ios), (1, 0, 0));

    assert_eq!(
        family_entries(&project, "lato"),
        vec!["lato_light", "lato_regular", "lato_bold", "lato_bolditalic"]
    );
    assert_eq!(family_entries(&project, "montserrat"), vec!["montserrat_regular"]);
    assert_eq!(project.count(KOTLIN_ENTRY, "R.font.lato)"), 1);
    project.assert_file_contains(KOTLIN_ENTRY, "R.font.montserrat)");

    assert_eq!(resources_children(&project).len(), 10);
    assert!(app_fonts(&project).contains(&"lato_light.ttf".to_string()));
    assert!(!app_fonts(&project).contains(&"montserrat_regular.ttf".to_string()));
}

#[tokio::test]
async fn unlink_one_asset() {
    let project = TestProject::new();
    link(&project).await;

    project.remove("assets/shared/image_png.png");
    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (0, 1, 0));
    assert_eq!(counts(&report, Platform::Ios), (0, 1, 0));
    project.assert_file_not_exists("android/app/src/main/res/drawable/image_png.png");
    project.assert_file_not_exists("ios/Resources/image_png.png");
    project.assert_file_not_contains(PBXPROJ, "image_png.png");
    assert_eq!(resources_children(&project).len(), 8);
    assert!(
        !project
            .manifest_paths(ANDROID_MANIFEST)
            .contains(&"assets/shared/image_png.png".to_string())
    );
    assert_eq!(project.manifest_paths(IOS_MANIFEST).len(), 8);
}

#[tokio::test]
async fn unlink_one_font_style() {
    let project = TestProject::new();
    link(&project).await;

    project.remove("assets/android/lato_bolditalic.ttf");
    link(&project).await;

    assert_eq!(family_entries(&project, "lato"), vec!["lato_regular", "lato_bold"]);
    project.assert_file_not_exists(&format!("{}/lato_bolditalic.ttf", FONT_DIR));
    project.assert_file_contains(KOTLIN_ENTRY, "R.font.lato)");
}

#[tokio::test]
async fn unlink_all_shared_and_android_assets() {
    let project = TestProject::new();
    let original_entry = project.read(KOTLIN_ENTRY);
    link(&project).await;

    project.remove("assets/shared");
    project.remove("assets/android");
    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (0, 10, 0));
    assert_eq!(counts(&report, Platform::Ios), (0, 8, 0));

    assert!(project.manifest_paths(ANDROID_MANIFEST).is_empty());
    assert_eq!(project.list(FONT_DIR), Vec::<String>::new());
    assert_eq!(project.list("android/app/src/main/res/drawable"), Vec::<String>::new());
    project.assert_file_not_exists("android/app/src/main/assets/custom/document.pdf");
    assert_eq!(project.read(KOTLIN_ENTRY), original_entry);

    assert_eq!(resources_children(&project), vec!["Raleway-Regular.ttf"]);
    assert_eq!(app_fonts(&project), vec!["Raleway-Regular.ttf"]);
    assert_eq!(project.list("ios/Resources"), vec!["Raleway-Regular.ttf"]);
    assert_eq!(
        project.manifest_paths(IOS_MANIFEST),
        vec!["assets/ios/Raleway-Regular.ttf"]
    );
}

#[tokio::test]
async fn second_run_changes_nothing() {
    let project = TestProject::new();
    link(&project).await;
    let before = snapshot(&project);

    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (0, 0, 0));
    assert_eq!(counts(&report, Platform::Ios), (0, 0, 0));
    for platform in Platform::ALL {
        assert!(report.platform(platform).unwrap().actions.is_empty());
    }
    assert_eq!(snapshot(&project), before);
}

#[tokio::test]
async fn edited_asset_is_recopied() {
    let project = TestProject::new();
    link(&project).await;
    let pbxproj = project.read(PBXPROJ);

    project.add_asset("assets/shared/sound.mp3", "a new recording");
    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (0, 0, 1));
    assert_eq!(counts(&report, Platform::Ios), (0, 0, 1));
    assert_eq!(
        project.read("android/app/src/main/res/raw/sound.mp3"),
        "a new recording"
    );
    assert_eq!(project.read("ios/Resources/sound.mp3"), "a new recording");
    assert_eq!(project.read(PBXPROJ), pbxproj);
}

#[tokio::test]
async fn relink_fonts_from_raw_assets_to_font_resources() {
    let project = TestProject::new();
    let legacy = "android/app/src/main/assets/fonts";
    for font in ["lato_regular.ttf", "lato_bold.ttf", "firacode_bold.otf"] {
        project.add_asset(&format!("{}/{}", legacy, font), "linked the old way");
    }
    project.add_asset(&format!("{}/icons.ttf", legacy), "not managed here");

    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (10, 0, 0));
    assert_eq!(project.list(legacy), vec!["icons.ttf"]);
    assert_eq!(
        family_entries(&project, "lato"),
        vec!["lato_regular", "lato_bold", "lato_bolditalic"]
    );
    assert_eq!(family_entries(&project, "firacode"), vec!["firacode_regular", "firacode_bold"]);
    project.assert_file_contains(KOTLIN_ENTRY, "R.font.lato)");

    let before = snapshot(&project);
    link(&project).await;
    assert_eq!(snapshot(&project), before);
}

#[tokio::test]
async fn unsuffixed_font_links_under_its_own_resource_name() {
    let project = TestProject::new();
    link(&project).await;

    project.add_asset("assets/shared/montserrat.ttf", "montserrat");
    project.add_asset("assets/shared/montserrat_bold.ttf", "montserrat bold");
    let report = link(&project).await;

    assert_eq!(counts(&report, Platform::Android), (2, 0, 0));
    assert!(report.platform(Platform::Android).unwrap().warnings.is_empty());
    assert_eq!(
        family_entries(&project, "montserrat"),
        vec!["montserrat_regular", "montserrat_bold"]
    );
    project.assert_file_exists(&format!("{}/montserrat_regular.ttf", FONT_DIR));
    project.assert_file_not_exists(&format!("{}/montserrat.ttf", FONT_DIR));
    // iOS bundles keep the original file names.
    assert!(resources_children(&project).contains(&"montserrat.ttf".to_string()));
}
