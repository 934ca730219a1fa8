//! Filesystem primitives for the mod importer
//!
//! Provides normalized path handling, atomic I/O, file fingerprints and
//! format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{Fingerprinter, HashAlgorithm};
pub use config::{ConfigStore, SettingsFormat};
pub use error::{Error, Result};
pub use path::NormalizedPath;
