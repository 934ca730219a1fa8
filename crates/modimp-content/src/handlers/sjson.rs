//! SJSON ("simplified JSON") format handler
//!
//! SJSON documents are an implicit top-level object of `key = value` pairs.
//! Keys may be bare identifiers, commas are optional, and both `//` and
//! `/* */` comments are allowed:
//!
//! ```text
//! // implicit root object
//! Name = "Tartarus"
//! Rooms = [
//!     { Name = "A_Intro01", Depth = 1 }
//!     { Name = "A_Story01", Depth = 2 }
//! ]
//! ```

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::format::{Format, FormatHandler};
use crate::tree::{Scalar, Tree};

/// Nesting limit for objects and arrays.
const MAX_DEPTH: usize = 128;

const INDENT: &str = "  ";

/// Handler for SJSON files
#[derive(Debug, Default)]
pub struct SjsonHandler;

impl SjsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for SjsonHandler {
    fn format(&self) -> Format {
        Format::Sjson
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        Parser::new(source).parse_document()
    }

    /// Only a map root has an SJSON form; anything else renders empty.
    fn render(&self, tree: &Tree) -> Result<String> {
        let Tree::Map(entries) = tree else {
            return Ok(String::new());
        };

        let mut out = String::new();
        for (key, value) in entries {
            if value.is_absent() {
                continue;
            }
            write_key(&mut out, key);
            out.push_str(" = ");
            write_value(&mut out, value, 0);
            out.push('\n');
        }
        Ok(out)
    }
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl std::fmt::Display) -> Error {
        let line = self.src[..self.pos.min(self.src.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1;
        Error::parse("SJSON", format!("{message} at line {line}"))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.bytes[self.pos..].starts_with(pattern.as_bytes())
    }

    fn parse_document(mut self) -> Result<Tree> {
        self.skip_trivia()?;
        let root = if self.peek() == Some(b'{') {
            self.parse_value()?
        } else {
            self.parse_entries(None)?
        };
        self.skip_trivia()?;
        if self.pos < self.bytes.len() {
            return Err(self.error("unexpected trailing content"));
        }
        Ok(root)
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.starts_with("//") => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.starts_with("/*") => {
                    match self.src[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => return Err(self.error("unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {MAX_DEPTH}")));
        }
        Ok(())
    }

    /// Parse `key = value` pairs until `close` (or end of input for the root).
    fn parse_entries(&mut self, close: Option<u8>) -> Result<Tree> {
        let mut entries = IndexMap::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None if close.is_none() => break,
                None => return Err(self.error("unexpected end of input in object")),
                Some(b) if Some(b) == close => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => {
                    self.pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;
            match self.peek() {
                Some(b'=') | Some(b':') => self.pos += 1,
                _ => return Err(self.error(format!("expected '=' after key '{key}'"))),
            }
            self.skip_trivia()?;
            let value = self.parse_value()?;
            entries.insert(key, value);
        }
        Ok(Tree::Map(entries))
    }

    fn parse_key(&mut self) -> Result<String> {
        if self.peek() == Some(b'"') {
            return self.parse_string();
        }
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'$' | b'@') || b >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a key"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_value(&mut self) -> Result<Tree> {
        match self.peek() {
            None => Err(self.error("expected a value")),
            Some(b'{') => {
                self.enter()?;
                self.pos += 1;
                let map = self.parse_entries(Some(b'}'))?;
                self.depth -= 1;
                Ok(map)
            }
            Some(b'[') => {
                self.enter()?;
                self.pos += 1;
                let items = self.parse_array()?;
                self.depth -= 1;
                Ok(items)
            }
            Some(b'"') => {
                if self.starts_with("\"\"\"") {
                    self.parse_raw_string().map(Tree::string)
                } else {
                    self.parse_string().map(Tree::string)
                }
            }
            Some(_) => self.parse_literal(),
        }
    }

    fn parse_array(&mut self) -> Result<Tree> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(self.error("unexpected end of input in array")),
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => self.pos += 1,
                Some(_) => items.push(self.parse_value()?),
            }
        }
        Ok(Tree::Sequence(items))
    }

    fn parse_raw_string(&mut self) -> Result<String> {
        let start = self.pos + 3;
        match self.src[start..].find("\"\"\"") {
            Some(len) => {
                self.pos = start + len + 3;
                Ok(self.src[start..start + len].to_string())
            }
            None => Err(self.error("unterminated raw string")),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        // Opening quote
        self.pos += 1;
        let mut out = String::new();
        let mut run_start = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    let escaped = self.peek().ok_or_else(|| self.error("unterminated escape"))?;
                    self.pos += 1;
                    match escaped {
                        b'"' => out.push('"'),
                        b'\\' => out.push('\\'),
                        b'/' => out.push('/'),
                        b'b' => out.push('\u{8}'),
                        b'f' => out.push('\u{c}'),
                        b'n' => out.push('\n'),
                        b'r' => out.push('\r'),
                        b't' => out.push('\t'),
                        b'u' => out.push(self.parse_unicode_escape()?),
                        other => {
                            return Err(self.error(format!("invalid escape '\\{}'", other as char)));
                        }
                    }
                    run_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Decode the digits after `\u`, joining a UTF-16 surrogate pair
    /// written as two consecutive escapes into one character.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let high = self.parse_hex4()?;
        if (0xD800..0xDC00).contains(&high) && self.starts_with("\\u") {
            let resume = self.pos;
            self.pos += 2;
            let low = self.parse_hex4()?;
            if (0xDC00..0xE000).contains(&low) {
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = resume;
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let hex = self
            .src
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(code)
    }

    fn parse_literal(&mut self) -> Result<Tree> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || matches!(b, b',' | b']' | b'}' | b'[' | b'{' | b'=' | b'"') {
                break;
            }
            if b == b'/' && (self.starts_with("//") || self.starts_with("/*")) {
                break;
            }
            self.pos += 1;
        }
        let token = &self.src[start..self.pos];

        let scalar = match token {
            "" => return Err(self.error("expected a value")),
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            "null" => Scalar::Null,
            _ => {
                if let Ok(i) = token.parse::<i64>() {
                    Scalar::Integer(i)
                } else if let Ok(u) = token.parse::<u64>() {
                    Scalar::Unsigned(u)
                } else if let Ok(f) = token.parse::<f64>() {
                    Scalar::Float(f)
                } else {
                    self.pos = start;
                    return Err(self.error(format!("unexpected token '{token}'")));
                }
            }
        };
        Ok(Tree::Scalar(scalar))
    }
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn write_key(out: &mut String, key: &str) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        write_string(out, key);
    }
}

fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn write_value(out: &mut String, value: &Tree, level: usize) {
    match value {
        Tree::Absent | Tree::Scalar(Scalar::Null) => out.push_str("null"),
        Tree::Scalar(Scalar::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        Tree::Scalar(Scalar::Integer(i)) => out.push_str(&i.to_string()),
        Tree::Scalar(Scalar::Unsigned(u)) => out.push_str(&u.to_string()),
        Tree::Scalar(Scalar::Float(f)) if f.is_finite() => out.push_str(&format!("{f:?}")),
        Tree::Scalar(Scalar::Float(_)) => out.push_str("null"),
        Tree::Scalar(Scalar::String(s)) => write_string(out, s),
        Tree::Map(entries) if entries.is_empty() => out.push_str("{}"),
        Tree::Map(entries) => {
            out.push_str("{\n");
            for (key, item) in entries.iter().filter(|(_, v)| !v.is_absent()) {
                write_indent(out, level + 1);
                write_key(out, key);
                out.push_str(" = ");
                write_value(out, item, level + 1);
                out.push('\n');
            }
            write_indent(out, level);
            out.push('}');
        }
        Tree::Sequence(items) if items.is_empty() => out.push_str("[]"),
        Tree::Sequence(items) => {
            out.push_str("[\n");
            for item in items.iter().filter(|v| !v.is_absent()) {
                write_indent(out, level + 1);
                write_value(out, item, level + 1);
                out.push('\n');
            }
            write_indent(out, level);
            out.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(source: &str) -> Tree {
        SjsonHandler::new().parse(source).unwrap()
    }

    #[test]
    fn test_implicit_root_object() {
        let tree = parse("Name = \"Tartarus\"\nDepth = 3\nScale = 1.5\nEnabled = true\nNothing = null\n");
        assert_eq!(
            tree,
            Tree::from(json!({
                "Name": "Tartarus",
                "Depth": 3,
                "Scale": 1.5,
                "Enabled": true,
                "Nothing": null
            }))
        );
    }

    #[test]
    fn test_braced_root_and_colons() {
        let tree = parse("{ \"quoted key\": 1, other: [1, 2, 3] }");
        assert_eq!(tree, Tree::from(json!({"quoted key": 1, "other": [1, 2, 3]})));
    }

    #[test]
    fn test_comments_and_optional_commas() {
        let tree = parse(
            "// header\nRooms = [ /* inline */\n  { Name = \"A\" Depth = 1 }\n  { Name = \"B\", Depth = 2 },\n]\n",
        );
        assert_eq!(
            tree,
            Tree::from(json!({"Rooms": [{"Name": "A", "Depth": 1}, {"Name": "B", "Depth": 2}]}))
        );
    }

    #[test]
    fn test_raw_and_escaped_strings() {
        let tree = parse("Raw = \"\"\"line \"one\"\nline two\"\"\"\nEsc = \"a\\tb\\u0041\"\n");
        assert_eq!(tree.get("Raw").and_then(Tree::as_str), Some("line \"one\"\nline two"));
        assert_eq!(tree.get("Esc").and_then(Tree::as_str), Some("a\tbA"));
    }

    #[test]
    fn test_surrogate_pair_escape_is_one_character() {
        let tree = parse("Icon = \"\\uD83D\\uDE00\"\nLone = \"\\uD83Dx\"\n");
        assert_eq!(tree.get("Icon").and_then(Tree::as_str), Some("\u{1F600}"));
        assert_eq!(tree.get("Lone").and_then(Tree::as_str), Some("\u{FFFD}x"));

        let rendered = SjsonHandler::new().render(&tree).unwrap();
        assert_eq!(parse(&rendered), tree);
    }

    #[test]
    fn test_large_unsigned_integer_is_kept_exactly() {
        let tree = parse("Seed = 18446744073709551615\n");
        assert_eq!(tree.get("Seed"), Some(&Tree::Scalar(Scalar::Unsigned(u64::MAX))));
        let rendered = SjsonHandler::new().render(&tree).unwrap();
        assert!(rendered.contains("18446744073709551615"), "{rendered}");
    }

    #[test]
    fn test_empty_document_is_empty_map() {
        assert_eq!(parse("  // nothing here\n"), Tree::map());
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = SjsonHandler::new().parse("A = 1\nB = \n").unwrap_err();
        assert!(err.to_string().contains("line"), "{err}");
        assert!(SjsonHandler::new().parse("A = [1, 2").is_err());
        assert!(SjsonHandler::new().parse("A = \"open").is_err());
        assert!(SjsonHandler::new().parse("A = 1 /* open").is_err());
        assert!(SjsonHandler::new().parse("A 1").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("A = {}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(SjsonHandler::new().parse(&deep).is_err());
        let ok = format!("A = {}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(SjsonHandler::new().parse(&ok).is_ok());
    }

    #[test]
    fn test_render_layout() {
        let tree = Tree::from(json!({
            "Name": "A",
            "Weird Key": [1, {"X": 2.0}],
            "Empty": {}
        }));
        let rendered = SjsonHandler::new().render(&tree).unwrap();
        insta::assert_snapshot!(rendered, @r###"
        Name = "A"
        "Weird Key" = [
          1
          {
            X = 2.0
          }
        ]
        Empty = {}
        "###);
    }

    #[test]
    fn test_render_then_parse_is_stable() {
        let handler = SjsonHandler::new();
        let tree = parse("Text = \"quote \\\" and \\\\ slash\"\nList = [ -1 2.5e3 \"x\" ]\n");
        let rendered = handler.render(&tree).unwrap();
        assert_eq!(handler.parse(&rendered).unwrap(), tree);
    }

    #[test]
    fn test_non_map_root_renders_empty() {
        let handler = SjsonHandler::new();
        assert_eq!(handler.render(&Tree::Absent).unwrap(), "");
        assert_eq!(handler.render(&Tree::from(json!([1]))).unwrap(), "");
    }
}
