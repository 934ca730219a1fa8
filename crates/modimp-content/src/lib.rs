//! Structured content merging for the mod importer
//!
//! Holds the [`Tree`] value model, the marker-driven merge engine and the
//! SJSON, JSON and YAML handlers that read and write trees.

pub mod document;
pub mod error;
pub mod format;
pub mod handlers;
pub mod merge;
pub mod tree;

pub use document::{Document, merge_file};
pub use error::{Error, Result};
pub use format::{Format, FormatHandler};
pub use merge::{PatchMarker, merge};
pub use tree::{Scalar, Tree};
