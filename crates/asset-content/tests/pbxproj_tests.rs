use asset_content::{Element, PbxObject, Value, XcodeProject};
use asset_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const FIXTURE: &str =
    include_str!("../../../test-fixtures/projects/base/ios/LinkDemo.xcodeproj/project.pbxproj");

#[test]
fn test_fixture_round_trips_byte_for_byte() {
    let project = XcodeProject::parse(FIXTURE).unwrap();
    assert_eq!(project.to_pbxproj(), FIXTURE);
}

#[test]
fn test_lookup_by_isa_and_comment() {
    let project = XcodeProject::parse(FIXTURE).unwrap();

    let groups: Vec<_> = project
        .objects_by_isa("PBXGroup")
        .filter(|(_, group)| group.get_str("name").as_deref() == Some("Resources"))
        .collect();
    assert_eq!(groups.len(), 1);
    let (group_id, group) = groups[0];
    assert_eq!(project.object_comment(group_id), Some("Resources"));

    let children = group.get_array("children").unwrap();
    assert_eq!(children[0].comment.as_deref(), Some("Raleway-Regular.ttf"));

    let project_object = project.project_object().unwrap();
    assert_eq!(project_object.isa().as_deref(), Some("PBXProject"));
    let targets = project_object.get_array("targets").unwrap();
    assert_eq!(targets[0].as_str().as_deref(), Some("13B07F861A680F5B00A75B9A"));
}

#[test]
fn test_quoted_values_are_unescaped() {
    let project = XcodeProject::parse(FIXTURE).unwrap();
    let reference = project.object("F1E2D3C4B5A6978877665544").unwrap();
    assert_eq!(
        reference.get_str("path").as_deref(),
        Some("Resources/Raleway-Regular.ttf")
    );
    assert_eq!(reference.get_str("sourceTree").as_deref(), Some("<group>"));
}

#[test]
fn test_edit_and_save_writes_only_on_change() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("project.pbxproj"));
    std::fs::write(path.to_native(), FIXTURE).unwrap();

    let mut project = XcodeProject::load(&path).unwrap();
    assert!(!project.save(&path).unwrap());

    let id = project.generate_id();
    project.insert_object(
        &id,
        "lato_regular.ttf",
        PbxObject::new()
            .with("isa", Value::string("PBXFileReference"))
            .with("lastKnownFileType", Value::string("file"))
            .with("name", Value::string("lato_regular.ttf"))
            .with("path", Value::string("Resources/lato_regular.ttf"))
            .with("sourceTree", Value::string("<group>")),
    );
    project
        .object_mut("D4E5F6A7B8C9D0E1F2A3B4C5")
        .and_then(|group| group.get_array_mut("children"))
        .unwrap()
        .push(Element::reference(&id, "lato_regular.ttf"));

    assert!(project.save(&path).unwrap());
    let written = std::fs::read_to_string(path.to_native()).unwrap();
    assert!(written.contains(&format!(
        "\t\t{id} /* lato_regular.ttf */ = {{isa = PBXFileReference; lastKnownFileType = file; name = lato_regular.ttf; path = Resources/lato_regular.ttf; sourceTree = \"<group>\"; }};\n"
    )));
    assert!(written.contains(&format!(
        "\t\t\t\tF1E2D3C4B5A6978877665544 /* Raleway-Regular.ttf */,\n\t\t\t\t{id} /* lato_regular.ttf */,\n"
    )));

    let reloaded = XcodeProject::load(&path).unwrap();
    assert_eq!(reloaded.to_pbxproj(), written);
}
