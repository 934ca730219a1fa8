//! Command implementations for modimp-cli

pub mod config;
pub mod import;

pub use config::{apply_overrides, load_config, run_modify, save_config};
pub use import::{StdoutEcho, build_context, run_import};
