use asset_content::PlistDocument;
use pretty_assertions::assert_eq;

const INFO_PLIST: &str = include_str!("../../../test-fixtures/projects/base/ios/LinkDemo/Info.plist");

#[test]
fn test_fixture_round_trips_byte_for_byte() {
    let doc = PlistDocument::parse(INFO_PLIST).unwrap();
    assert_eq!(doc.to_xml(), INFO_PLIST);
}

#[test]
fn test_font_merge_keeps_other_keys_in_place() {
    let mut doc = PlistDocument::parse(INFO_PLIST).unwrap();
    doc.add_to_string_array(
        "UIAppFonts",
        &["lato_regular.ttf".to_string(), "firacode_bold.otf".to_string()],
    )
    .unwrap();

    let keys: Vec<_> = doc.root_dict().unwrap().keys().cloned().collect();
    let original: Vec<_> = PlistDocument::parse(INFO_PLIST)
        .unwrap()
        .root_dict()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, original);
    assert_eq!(
        doc.string_array("UIAppFonts"),
        vec!["Raleway-Regular.ttf", "lato_regular.ttf", "firacode_bold.otf"]
    );
}

#[test]
fn test_binary_plist_is_rejected() {
    assert!(PlistDocument::parse("bplist00\u{1}\u{2}").is_err());
}
