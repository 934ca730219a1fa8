//! End-to-end test for the vertical slice
//!
//! Exercises the complete flow: config file -> profile -> context -> import
//! run -> restore on the next run.

use modimp_core::{ImportContext, ImporterConfig, ModImporter};
use modimp_fs::{ConfigStore, Fingerprinter, NormalizedPath};
use modimp_test_utils::GameFixture;
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
hashes = ["md5", "sha256"]

[profiles.Hades]
default_target = ["Scripts/RoomManager.lua", "Scripts/Extra.lua"]
folder_deployed = "Staged"
"#;

fn context(game: &GameFixture) -> ImportContext {
    let path = NormalizedPath::new(game.root().join("modimp.toml"));
    std::fs::write(path.to_native(), CONFIG).unwrap();
    let config: ImporterConfig = ConfigStore::new().load(&path).unwrap();

    let (name, profile) = config.resolve_profile(false, None, "Hades").unwrap();
    ImportContext::from_profile(&name, &profile, Some(&game.game_dir()))
        .unwrap()
        .with_fingerprinter(Fingerprinter::from_names(&config.hashes).unwrap())
        .with_protected([path])
}

#[test]
fn configured_run_then_clean_rerun() {
    let game = GameFixture::new();
    game.content_file("Scripts/RoomManager.lua", "Room()");
    game.content_file("Scripts/Extra.lua", "Extra()");
    game.mod_file("Helper", "helper.lua", "Helper()");
    game.modfile("Helper", ":: broadcast to both default targets\nImport helper.lua");

    let importer = ModImporter::new(context(&game));
    let mut echo: Vec<String> = Vec::new();
    let summary = importer.run(&mut echo).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.records, 2);
    game.assert_content(
        "Scripts/RoomManager.lua",
        "Room()\nImport \"../Staged/Helper/helper.lua\"",
    );
    game.assert_content("Scripts/Extra.lua", "Extra()\nImport \"../Staged/Helper/helper.lua\"");
    let fingerprint = game.read_content("Edit Cache/Scripts/Extra.lua.hash");
    assert_eq!(fingerprint.lines().count(), 2);
    assert!(fingerprint.starts_with("md5\t"));

    // The mod is uninstalled: the next run puts the game back.
    std::fs::remove_dir_all(game.mods_dir().join("Helper").to_native()).unwrap();
    let summary = importer.run(&mut Vec::<String>::new()).unwrap();
    assert_eq!(summary.files, 0);
    assert_eq!(
        summary.restore.restored,
        vec!["Scripts/Extra.lua", "Scripts/RoomManager.lua"]
    );
    game.assert_content("Scripts/RoomManager.lua", "Room()");
    game.assert_content("Scripts/Extra.lua", "Extra()");
}

#[test]
fn protected_config_is_never_a_payload() {
    let game = GameFixture::new();
    game.content_file("Scripts/RoomManager.lua", "Room()");
    let ctx = context(&game)
        .with_protected([game.content_dir().join("Mods/Sneaky/secret.lua")]);
    game.mod_file("Sneaky", "secret.lua", "Secret()");
    game.modfile("Sneaky", "Replace secret.lua");

    let summary = ModImporter::new(ctx).run(&mut Vec::<String>::new()).unwrap();
    assert_eq!(summary.records, 0);
    game.assert_content("Scripts/RoomManager.lua", "Room()");
}
