//! Shared test utilities for the modimp workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`game`]: [`GameFixture`], a temporary game directory with a content
//!   folder, mod folders and directive files

pub mod game;

pub use game::GameFixture;
