//! Mod scenarios run through the whole importer
//!
//! Each test builds a game folder, installs one or more mods and checks the
//! patched content the game would load.

use modimp_content::{Format, Tree};
use modimp_core::{ImportContext, ModImporter, Profile, RunSummary};
use modimp_test_utils::GameFixture;
use pretty_assertions::assert_eq;
use serde_json::json;

const ROOM_MANAGER: &str = "Scripts/RoomManager.lua";

fn run(game: &GameFixture) -> RunSummary {
    if !game.content_exists(ROOM_MANAGER) {
        game.content_file(ROOM_MANAGER, "Base()");
    }
    let ctx = ImportContext::from_profile(
        "Hades",
        &Profile::with_targets([ROOM_MANAGER]),
        Some(&game.game_dir()),
    )
    .unwrap();
    ModImporter::new(ctx).run(&mut Vec::<String>::new()).unwrap()
}

fn parsed(game: &GameFixture, format: Format, relative: &str) -> Tree {
    modimp_content::Document::parse_as(&game.read_content(relative), format)
        .unwrap()
        .into_tree()
}

#[test]
fn sjson_mods_stack_by_priority() {
    let game = GameFixture::new();
    game.content_file(
        "Game/Text/en/HelpText.en.sjson",
        "Texts = [\n  { Id = \"Boon\" DisplayName = \"Boon\" }\n  { Id = \"Keep\" DisplayName = \"Keep\" }\n]\n",
    );
    game.mod_file(
        "Early",
        "HelpText.sjson",
        "Texts = { _sequence = true \"0\" = { DisplayName = \"Early\" } }",
    );
    game.modfile(
        "Early",
        "Load Priority 1\nTo \"Game/Text/en/HelpText.en.sjson\"\nSJSON HelpText.sjson",
    );
    game.mod_file(
        "Late",
        "HelpText.sjson",
        "Texts = [ \"_append\" { Id = \"New\" DisplayName = \"New\" } ]",
    );
    game.mod_file("Late", "Rename.sjson", "Texts = { _sequence = true \"0\" = { DisplayName = \"Late\" } }");
    game.modfile(
        "Late",
        "To \"Game/Text/en/HelpText.en.sjson\"\nSJSON HelpText.sjson Rename.sjson",
    );

    let summary = run(&game);
    assert_eq!(summary.records, 3);
    assert_eq!(
        parsed(&game, Format::Sjson, "Game/Text/en/HelpText.en.sjson"),
        Tree::from(json!({
            "Texts": [
                {"Id": "Boon", "DisplayName": "Late"},
                {"Id": "Keep", "DisplayName": "Keep"},
                {"Id": "New", "DisplayName": "New"}
            ]
        }))
    );
}

#[test]
fn json_and_yaml_payloads_merge_with_markers() {
    let game = GameFixture::new();
    game.content_file(
        "Config/settings.json",
        r#"{"Audio": {"Volume": 1.0, "Muted": false}, "Keys": ["A", "B"]}"#,
    );
    game.content_file("Config/roster.yaml", "heroes:\n  - Zag\n  - Meg\nboss: Hades\n");
    game.mod_file(
        "Tweaks",
        "settings.json",
        r#"{"Audio": {"Muted": {"_delete": true}, "Volume": 0.5}, "Keys": ["_replace", "Q"]}"#,
    );
    game.mod_file("Tweaks", "roster.yaml", "heroes: [_append, Than]\nboss:\n  _delete: true\n");
    game.modfile(
        "Tweaks",
        "To Config/settings.json; JSON settings.json\nTo Config/roster.yaml; YAML roster.yaml",
    );

    run(&game);
    assert_eq!(
        parsed(&game, Format::Json, "Config/settings.json"),
        Tree::from(json!({"Audio": {"Volume": 0.5}, "Keys": ["Q"]}))
    );
    assert_eq!(
        parsed(&game, Format::Yaml, "Config/roster.yaml"),
        Tree::from(json!({"heroes": ["Zag", "Meg", "Than"]}))
    );
}

#[test]
fn include_and_deploy_stage_helper_files() {
    let game = GameFixture::new();
    game.mod_file("Pack", "scripts/a.lua", "A()");
    game.mod_file("Pack", "scripts/b.lua", "B()");
    game.mod_file("Pack", "data/shared.lua", "Shared()");
    game.mod_file("Pack", "parts/imports.txt", "Import ../scripts");
    game.modfile(
        "Pack",
        "-: the scripts folder is imported\n   in name order :-\nInclude parts\nDeploy data/shared.lua",
    );

    let summary = run(&game);
    assert_eq!(summary.records, 2);
    game.assert_content(
        ROOM_MANAGER,
        "Base()\nImport \"../Deploy/Pack/scripts/a.lua\"\nImport \"../Deploy/Pack/scripts/b.lua\"",
    );
    game.assert_content("Deploy/Pack/data/shared.lua", "Shared()");
}

#[test]
fn package_copy_only_overwrites_existing_packages() {
    let game = GameFixture::new();
    game.content_file("Packages/Fx.pkg", "old fx");
    game.mod_file("Gfx", "Fx.pkg", "new fx");
    game.mod_file("Gfx", "Missing.pkg", "never copied");
    game.modfile(
        "Gfx",
        "To Packages/Fx.pkg\nPackage Copy Fx.pkg\nTo Packages/Missing.pkg\nPackage Copy Missing.pkg",
    );

    run(&game);
    game.assert_content("Packages/Fx.pkg", "new fx");
    assert!(!game.content_exists("Packages/Missing.pkg"));
}

#[test]
fn broken_payload_reverts_its_target_only() {
    let game = GameFixture::new();
    game.content_file("Config/settings.json", r#"{"a": 1}"#);
    game.mod_file("Broken", "settings.json", "{ not json");
    game.mod_file("Broken", "mod.lua", "Mod()");
    game.modfile("Broken", "Import mod.lua\nTo Config/settings.json\nJSON settings.json");
    game.content_file(ROOM_MANAGER, "Base()");

    let ctx = ImportContext::from_profile(
        "Hades",
        &Profile::with_targets([ROOM_MANAGER]),
        Some(&game.game_dir()),
    )
    .unwrap();
    let err = ModImporter::new(ctx)
        .run(&mut Vec::<String>::new())
        .unwrap_err();

    assert!(err.to_string().contains("Config/settings.json"), "{err}");
    game.assert_content("Config/settings.json", r#"{"a": 1}"#);
    game.assert_content(ROOM_MANAGER, "Base()\nImport \"../Deploy/Broken/mod.lua\"");
}
