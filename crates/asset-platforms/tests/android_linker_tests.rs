//! AndroidLinker against a copy of the fixture app

use asset_fs::NormalizedPath;
use asset_meta::{AssetRecord, LinkConfig};
use asset_platforms::{AndroidLinker, Error, LinkContext, PlatformChanges, PlatformLinker};
use asset_test_utils::TestProject;
use asset_test_utils::project::{JAVA_ENTRY, KOTLIN_ENTRY};
use pretty_assertions::assert_eq;

const RES: &str = "android/app/src/main/res";

const ALL_ASSETS: &[&str] = &[
    "assets/android/lato_bold.ttf",
    "assets/android/lato_bolditalic.ttf",
    "assets/shared/custom/document.pdf",
    "assets/shared/firacode_bold.otf",
    "assets/shared/firacode_regular.otf",
    "assets/shared/image_gif.gif",
    "assets/shared/image_jpg.jpg",
    "assets/shared/image_png.png",
    "assets/shared/lato_regular.ttf",
    "assets/shared/sound.mp3",
];

fn context(project: &TestProject) -> LinkContext {
    let root = NormalizedPath::new(project.root());
    let config = LinkConfig::load(&root.join("link-assets.toml")).unwrap();
    LinkContext::new(root.clone(), root.join("android"), config)
}

fn records(project: &TestProject, paths: &[&str]) -> Vec<AssetRecord> {
    let root = NormalizedPath::new(project.root());
    let roots = [root.join("assets/shared"), root.join("assets/android")];
    paths
        .iter()
        .map(|p| AssetRecord::from_linked_path(&root, p, &roots))
        .collect()
}

fn fresh_link(project: &TestProject) -> PlatformChanges {
    let current = records(project, ALL_ASSETS);
    PlatformChanges {
        added: current.clone(),
        current,
        ..Default::default()
    }
}

#[tokio::test]
async fn first_link_copies_resources_and_writes_families() {
    let project = TestProject::new();
    let outcome = AndroidLinker::new()
        .link(&context(&project), &fresh_link(&project))
        .await
        .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_eq!(
        project.list(&format!("{}/font", RES)),
        vec![
            "firacode.xml",
            "firacode_bold.otf",
            "firacode_regular.otf",
            "lato.xml",
            "lato_bold.ttf",
            "lato_bolditalic.ttf",
            "lato_regular.ttf",
        ]
    );
    assert_eq!(project.count(&format!("{}/font/lato.xml", RES), "<font "), 3);
    assert_eq!(project.count(&format!("{}/font/firacode.xml", RES), "<font "), 2);
    assert_eq!(
        project.list(&format!("{}/drawable", RES)),
        vec!["image_gif.gif", "image_jpg.jpg", "image_png.png"]
    );
    project.assert_file_exists(&format!("{}/raw/sound.mp3", RES));
    project.assert_file_exists("android/app/src/main/assets/custom/document.pdf");

    project.assert_file_contains(
        KOTLIN_ENTRY,
        "    super.onCreate()\n    ReactFontManager.getInstance().addCustomFont(this, \"firacode\", R.font.firacode)\n    ReactFontManager.getInstance().addCustomFont(this, \"lato\", R.font.lato)\n",
    );
    project.assert_file_contains(
        KOTLIN_ENTRY,
        "import com.facebook.react.common.assets.ReactFontManager\n",
    );
}

#[tokio::test]
async fn java_entry_point_gets_semicolons() {
    let project = TestProject::new().with_java_entry_point();
    AndroidLinker::new()
        .link(&context(&project), &fresh_link(&project))
        .await
        .unwrap();

    project.assert_file_contains(
        JAVA_ENTRY,
        "ReactFontManager.getInstance().addCustomFont(this, \"lato\", R.font.lato);\n",
    );
    project.assert_file_contains(
        JAVA_ENTRY,
        "import com.facebook.react.common.assets.ReactFontManager;\n",
    );
}

#[tokio::test]
async fn relinking_the_same_set_changes_nothing() {
    let project = TestProject::new();
    let context = context(&project);
    AndroidLinker::new()
        .link(&context, &fresh_link(&project))
        .await
        .unwrap();
    let entry = project.read(KOTLIN_ENTRY);
    let lato = project.read(&format!("{}/font/lato.xml", RES));

    let current = records(&project, ALL_ASSETS);
    let outcome = AndroidLinker::new()
        .link(
            &context,
            &PlatformChanges {
                current,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.actions.is_empty(), "{:?}", outcome.actions);
    assert_eq!(project.read(KOTLIN_ENTRY), entry);
    assert_eq!(project.read(&format!("{}/font/lato.xml", RES)), lato);
}

#[tokio::test]
async fn removing_a_family_deletes_descriptor_and_registration() {
    let project = TestProject::new();
    let context = context(&project);
    AndroidLinker::new()
        .link(&context, &fresh_link(&project))
        .await
        .unwrap();

    let kept: Vec<&str> = ALL_ASSETS
        .iter()
        .copied()
        .filter(|p| !p.contains("firacode") && !p.ends_with("sound.mp3"))
        .collect();
    let changes = PlatformChanges {
        removed: records(
            &project,
            &[
                "assets/shared/firacode_bold.otf",
                "assets/shared/firacode_regular.otf",
                "assets/shared/sound.mp3",
            ],
        ),
        current: records(&project, &kept),
        ..Default::default()
    };
    AndroidLinker::new().link(&context, &changes).await.unwrap();

    project.assert_file_not_exists(&format!("{}/font/firacode.xml", RES));
    project.assert_file_not_exists(&format!("{}/font/firacode_bold.otf", RES));
    project.assert_file_not_exists(&format!("{}/raw/sound.mp3", RES));
    project.assert_file_not_contains(KOTLIN_ENTRY, "R.font.firacode)");
    project.assert_file_contains(KOTLIN_ENTRY, "R.font.lato)");
    assert_eq!(project.count(&format!("{}/font/lato.xml", RES), "<font "), 3);
}

#[tokio::test]
async fn missing_android_section_is_a_configuration_error() {
    let project = TestProject::new();
    let mut context = context(&project);
    context.config.project.android = None;

    let err = AndroidLinker::new()
        .link(&context, &fresh_link(&project))
        .await
        .unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn missing_app_module_is_reported() {
    let project = TestProject::new();
    project.remove("android/app");

    let err = AndroidLinker::new()
        .link(&context(&project), &fresh_link(&project))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound { .. }));
}

#[tokio::test]
async fn missing_source_file_is_a_warning_for_that_asset_only() {
    let project = TestProject::new();
    project.remove("assets/shared/image_png.png");

    let outcome = AndroidLinker::new()
        .link(&context(&project), &fresh_link(&project))
        .await
        .unwrap();

    assert_eq!(
        outcome.failed_assets().into_iter().collect::<Vec<_>>(),
        vec!["assets/shared/image_png.png"]
    );
    project.assert_file_exists(&format!("{}/drawable/image_gif.gif", RES));
    project.assert_file_not_exists(&format!("{}/drawable/image_png.png", RES));
}

fn link_with(project: &TestProject, extra: &[&str]) -> PlatformChanges {
    let mut paths = ALL_ASSETS.to_vec();
    paths.extend_from_slice(extra);
    paths.sort();
    let current = records(project, &paths);
    PlatformChanges {
        added: current.clone(),
        current,
        ..Default::default()
    }
}

#[tokio::test]
async fn unsuffixed_font_does_not_clash_with_its_family() {
    let project = TestProject::new();
    project.add_asset("assets/android/roboto.ttf", "roboto");
    project.add_asset("assets/android/Roboto-Bold.ttf", "roboto bold");

    let outcome = AndroidLinker::new()
        .link(
            &context(&project),
            &link_with(&project, &["assets/android/Roboto-Bold.ttf", "assets/android/roboto.ttf"]),
        )
        .await
        .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    let fonts = project.list(&format!("{}/font", RES));
    assert!(fonts.contains(&"roboto.xml".to_string()));
    assert!(fonts.contains(&"roboto_regular.ttf".to_string()));
    assert!(fonts.contains(&"roboto_bold.ttf".to_string()));
    assert!(!fonts.contains(&"roboto.ttf".to_string()));
    project.assert_file_contains(&format!("{}/font/roboto.xml", RES), "@font/roboto_regular\"");
    project.assert_file_not_contains(&format!("{}/font/roboto.xml", RES), "@font/roboto\"");
    project.assert_file_contains(KOTLIN_ENTRY, "R.font.roboto)");
}

#[tokio::test]
async fn same_resource_name_with_another_extension_is_rejected() {
    let project = TestProject::new();
    project.add_asset("assets/android/image_png.jpg", "jpg");

    let outcome = AndroidLinker::new()
        .link(
            &context(&project),
            &link_with(&project, &["assets/android/image_png.jpg"]),
        )
        .await
        .unwrap();

    // The first asset by path owns the `image_png` drawable.
    assert_eq!(
        project.list(&format!("{}/drawable", RES)),
        vec!["image_gif.gif", "image_jpg.jpg", "image_png.jpg"]
    );
    assert_eq!(
        outcome.failed_assets().into_iter().collect::<Vec<_>>(),
        vec!["assets/shared/image_png.png"]
    );
}

#[tokio::test]
async fn fonts_linked_as_raw_assets_are_moved_to_font_resources() {
    let project = TestProject::new();
    project.add_asset("android/app/src/main/assets/fonts/lato_regular.ttf", "old copy");
    project.add_asset("android/app/src/main/assets/fonts/custom.ttf", "not ours");

    let outcome = AndroidLinker::new()
        .link(&context(&project), &fresh_link(&project))
        .await
        .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_eq!(
        project.list("android/app/src/main/assets/fonts"),
        vec!["custom.ttf"]
    );
    project.assert_file_exists(&format!("{}/font/lato_regular.ttf", RES));
}
