//! YAML format handler

use serde_json::Value;

use crate::error::Result;
use crate::format::{Format, FormatHandler};
use crate::tree::Tree;

/// Handler for YAML files.
///
/// Documents go through `serde_json::Value`, so mapping keys must be strings.
#[derive(Debug, Default)]
pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for YamlHandler {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        if source.trim().is_empty() {
            return Ok(Tree::map());
        }
        let value: Value = serde_yaml::from_str(source)?;
        Ok(Tree::from(value))
    }

    fn render(&self, tree: &Tree) -> Result<String> {
        match tree.to_json() {
            Some(value) => Ok(serde_yaml::to_string(&value)?),
            None => Ok(String::new()),
        }
    }
}
