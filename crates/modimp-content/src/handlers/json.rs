//! JSON format handler

use serde_json::Value;

use crate::error::Result;
use crate::format::{Format, FormatHandler};
use crate::tree::Tree;

/// Handler for JSON files
#[derive(Debug, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for JsonHandler {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        if source.trim().is_empty() {
            return Ok(Tree::map());
        }
        let value: Value = serde_json::from_str(source)?;
        Ok(Tree::from(value))
    }

    fn render(&self, tree: &Tree) -> Result<String> {
        match tree.to_json() {
            Some(value) => Ok(serde_json::to_string_pretty(&value)?),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_parse_error() {
        assert!(JsonHandler::new().parse("{invalid: json").is_err());
    }

    #[test]
    fn test_json_render_keeps_order() {
        let handler = JsonHandler::new();
        let tree = handler.parse(r#"{"z": 1, "a": [true, null]}"#).unwrap();
        let rendered = handler.render(&tree).unwrap();
        assert!(rendered.find("\"z\"").unwrap() < rendered.find("\"a\"").unwrap());
        assert_eq!(handler.parse(&rendered).unwrap(), Tree::from(json!({"z": 1, "a": [true, null]})));
    }

    #[test]
    fn test_json_absent_root_renders_empty() {
        assert_eq!(JsonHandler::new().render(&Tree::Absent).unwrap(), "");
    }
}
