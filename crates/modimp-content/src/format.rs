//! Format detection and handler trait

use crate::error::Result;
use crate::tree::Tree;

/// Structured formats a merge payload can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Sjson,
    Json,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 3] = [Self::Sjson, Self::Json, Self::Yaml];

    /// Display name, also the directive keyword selecting this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sjson => "SJSON",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// The handler for this format, or `None` if it was compiled out.
    pub fn handler(&self) -> Option<Box<dyn FormatHandler>> {
        match self {
            #[cfg(feature = "sjson")]
            Self::Sjson => Some(Box::new(crate::handlers::SjsonHandler::new())),
            Self::Json => Some(Box::new(crate::handlers::JsonHandler::new())),
            #[cfg(feature = "yaml")]
            Self::Yaml => Some(Box::new(crate::handlers::YamlHandler::new())),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.handler().is_some()
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for format-specific handlers
pub trait FormatHandler: Send + Sync {
    /// Format identifier
    fn format(&self) -> Format;

    /// Parse source into a tree
    fn parse(&self, source: &str) -> Result<Tree>;

    /// Render a finalized tree back to text. An `Absent` root renders as an
    /// empty document.
    fn render(&self, tree: &Tree) -> Result<String>;
}
