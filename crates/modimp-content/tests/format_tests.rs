//! Format handler behaviour across SJSON, JSON and YAML

use modimp_content::{Document, Format, Tree, merge_file};
use modimp_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::sjson(Format::Sjson, "Weapons = [ { Name = \"Sword\" Damage = 10 } ]\n")]
#[case::json(Format::Json, r#"{"Weapons": [{"Name": "Sword", "Damage": 10}]}"#)]
#[case::yaml(Format::Yaml, "Weapons:\n  - Name: Sword\n    Damage: 10\n")]
fn parses_same_tree_in_every_format(#[case] format: Format, #[case] source: &str) {
    let doc = Document::parse_as(source, format).unwrap();
    assert_eq!(
        doc.tree(),
        &Tree::from(json!({"Weapons": [{"Name": "Sword", "Damage": 10}]}))
    );
}

#[rstest]
#[case::sjson(Format::Sjson, "a.sjson", "Keep = 1\nDrop = 2\n", "Drop = { _delete = true }\nAdd = \"x\"\n")]
#[case::json(Format::Json, "a.json", r#"{"Keep": 1, "Drop": 2}"#, r#"{"Drop": {"_delete": true}, "Add": "x"}"#)]
#[case::yaml(Format::Yaml, "a.yaml", "Keep: 1\nDrop: 2\n", "Drop:\n  _delete: true\nAdd: x\n")]
fn merge_file_round_trips_through_disk(
    #[case] format: Format,
    #[case] name: &str,
    #[case] base: &str,
    #[case] patch: &str,
) {
    let dir = tempfile::tempdir().unwrap();
    let target = NormalizedPath::new(dir.path().join(name));
    let patch_path = NormalizedPath::new(dir.path().join(format!("patch-{name}")));
    std::fs::write(target.to_native(), base).unwrap();
    std::fs::write(patch_path.to_native(), patch).unwrap();

    merge_file(format, &target, &patch_path).unwrap();

    let reread = Document::load(&target, format).unwrap();
    assert_eq!(reread.tree(), &Tree::from(json!({"Keep": 1, "Add": "x"})));
}

#[test]
fn sjson_sequence_override_patch() {
    let base = "Rooms = [\n  { Name = \"A\" }\n  { Name = \"B\" }\n]\n";
    let patch = "Rooms = { _sequence = true, 1 = { Depth = 4 }, 2 = { Name = \"C\" } }\n";

    let mut doc = Document::parse_as(base, Format::Sjson).unwrap();
    let patch = Document::parse_as(patch, Format::Sjson).unwrap();
    doc.apply(patch.into_tree());

    assert_eq!(
        doc.tree(),
        &Tree::from(json!({"Rooms": [{"Name": "A"}, {"Name": "B", "Depth": 4}, {"Name": "C"}]}))
    );
}

#[test]
fn deleting_sjson_root_writes_empty_document() {
    let mut doc = Document::parse_as("A = 1\n", Format::Sjson).unwrap();
    doc.apply(Tree::from(json!({"_delete": true})));
    assert_eq!(doc.render().unwrap(), "");
}
