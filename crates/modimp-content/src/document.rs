//! Structured documents backed by a format handler

use modimp_fs::{NormalizedPath, io};

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::merge::merge;
use crate::tree::Tree;

/// A parsed structured file together with the handler that renders it
pub struct Document {
    format: Format,
    tree: Tree,
    handler: Box<dyn FormatHandler>,
}

impl Document {
    /// Parse with explicit format
    pub fn parse_as(source: &str, format: Format) -> Result<Self> {
        let handler = format.handler().ok_or_else(|| Error::FormatUnavailable {
            format: format.name().to_string(),
        })?;
        let tree = handler.parse(source)?;
        Ok(Self {
            format,
            tree,
            handler,
        })
    }

    /// Read and parse a file.
    pub fn load(path: &NormalizedPath, format: Format) -> Result<Self> {
        let source = io::read_text(path)?;
        Self::parse_as(&source, format)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Overlay a patch tree onto this document.
    pub fn apply(&mut self, patch: Tree) {
        let base = std::mem::take(&mut self.tree);
        self.tree = merge(base, patch);
    }

    /// Render the current tree in this document's format.
    pub fn render(&self) -> Result<String> {
        self.handler.render(&self.tree)
    }

    /// Render and write atomically to `path`.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let rendered = self.render()?;
        io::write_text(path, &rendered)?;
        Ok(())
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("format", &self.format)
            .field("tree", &self.tree)
            .finish()
    }
}

/// Merge the patch file at `patch` into the structured file at `target`,
/// rewriting `target` in place.
///
/// # Errors
///
/// Fails without touching `target` if either file cannot be read or parsed,
/// or if `format` was compiled out.
pub fn merge_file(format: Format, target: &NormalizedPath, patch: &NormalizedPath) -> Result<()> {
    let mut document = Document::load(target, format)?;
    let patch = Document::load(patch, format)?;
    document.apply(patch.into_tree());
    document.save(target)
}
