//! [`GameFixture`] builder for import scenarios.

use std::fs;
use std::path::Path;

use modimp_fs::NormalizedPath;
use tempfile::TempDir;

/// Name of the fixture's game folder, which doubles as its folder profile.
pub const GAME_NAME: &str = "Hades";

/// A temporary game installation:
///
/// ```text
/// <tmp>/Hades/
///     Content/
///         Mods/<mod>/modfile.txt
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use modimp_test_utils::GameFixture;
///
/// let game = GameFixture::new();
/// game.content_file("Scripts/RoomManager.lua", "base");
/// game.mod_file("MyMod", "mod.lua", "print('hi')");
/// game.modfile("MyMod", "Import \"mod.lua\"");
/// ```
pub struct GameFixture {
    temp_dir: TempDir,
    game_dir: NormalizedPath,
}

impl Default for GameFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFixture {
    /// Create a game directory with an empty `Content` folder.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = NormalizedPath::canonicalize(temp_dir.path()).unwrap();
        let game_dir = root.join(GAME_NAME);
        fs::create_dir_all(game_dir.join("Content").to_native()).unwrap();
        Self { temp_dir, game_dir }
    }

    /// The temporary directory holding the game folder.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn game_dir(&self) -> NormalizedPath {
        self.game_dir.clone()
    }

    pub fn content_dir(&self) -> NormalizedPath {
        self.game_dir.join("Content")
    }

    pub fn mods_dir(&self) -> NormalizedPath {
        self.content_dir().join("Mods")
    }

    /// Write a file below the game folder.
    pub fn game_file(&self, relative: &str, content: &str) -> NormalizedPath {
        write(self.game_dir.join(relative), content)
    }

    /// Write a file below the content folder.
    pub fn content_file(&self, relative: &str, content: &str) -> NormalizedPath {
        write(self.content_dir().join(relative), content)
    }

    /// Write a payload file into a mod folder.
    pub fn mod_file(&self, mod_name: &str, relative: &str, content: &str) -> NormalizedPath {
        write(self.mods_dir().join(mod_name).join(relative), content)
    }

    /// Write a mod's `modfile.txt`.
    pub fn modfile(&self, mod_name: &str, directives: &str) -> NormalizedPath {
        self.mod_file(mod_name, "modfile.txt", directives)
    }

    /// Read a file below the content folder.
    pub fn read_content(&self, relative: &str) -> String {
        let path = self.content_dir().join(relative);
        fs::read_to_string(path.to_native())
            .unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
    }

    pub fn content_exists(&self, relative: &str) -> bool {
        self.content_dir().join(relative).exists()
    }

    /// Assert that a content file has exactly `expected` as its text.
    pub fn assert_content(&self, relative: &str, expected: &str) {
        let actual = self.read_content(relative);
        assert_eq!(
            actual, expected,
            "content of {relative} differs from expectation"
        );
    }
}

fn write(path: NormalizedPath, content: &str) -> NormalizedPath {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.to_native()).unwrap();
    }
    fs::write(path.to_native(), content).unwrap();
    path
}
