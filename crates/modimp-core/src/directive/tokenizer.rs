//! Splitting directive text into logical lines of tokens
//!
//! ```text
//! :: line comment
//! -: block comment,
//!    may span lines :-
//! To "Scripts/RoomManager.lua"; Import "my mod.lua", other.lua
//! ```

pub const LINE_COMMENT: &str = "::";
pub const BLOCK_COMMENT_OPEN: &str = "-:";
pub const BLOCK_COMMENT_CLOSE: &str = ":-";
pub const STATEMENT_SEPARATOR: char = ';';
pub const TOKEN_DELIMITER: char = ',';
pub const QUOTE: char = '"';

/// A run of text within a logical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Unquoted text, split on whitespace and delimiters
    Plain(String),
    /// Quoted text, kept whole with the quotes stripped
    Quoted(String),
}

/// One logical line: the spans between two line breaks or separators.
pub type LogicalLine = Vec<Span>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Quoted,
    BlockComment,
}

struct Splitter {
    lines: Vec<LogicalLine>,
    current: LogicalLine,
    buffer: String,
}

impl Splitter {
    fn flush(&mut self, quoted: bool) {
        let text = std::mem::take(&mut self.buffer);
        if quoted {
            self.current.push(Span::Quoted(text));
        } else if !text.is_empty() {
            self.current.push(Span::Plain(text));
        }
    }

    fn end_line(&mut self) {
        self.flush(false);
        self.lines.push(std::mem::take(&mut self.current));
    }
}

/// Split directive text into logical lines.
///
/// Physical line breaks and `;` end a logical line. A block comment absorbs
/// everything up to its close marker, line breaks included, so text on both
/// sides of a multi-line block comment ends up on one logical line. A quote
/// left open ends at the end of its physical line.
pub fn split_lines(text: &str) -> Vec<LogicalLine> {
    let mut splitter = Splitter {
        lines: Vec::new(),
        current: Vec::new(),
        buffer: String::new(),
    };
    let mut mode = Mode::Plain;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match mode {
            Mode::BlockComment => {
                if rest.starts_with(BLOCK_COMMENT_CLOSE) {
                    rest = &rest[BLOCK_COMMENT_CLOSE.len()..];
                    mode = Mode::Plain;
                    continue;
                }
            }
            Mode::Quoted => match c {
                QUOTE => {
                    splitter.flush(true);
                    mode = Mode::Plain;
                }
                '\n' => {
                    splitter.flush(true);
                    splitter.end_line();
                    mode = Mode::Plain;
                }
                _ => splitter.buffer.push(c),
            },
            Mode::Plain => {
                if rest.starts_with(BLOCK_COMMENT_OPEN) {
                    rest = &rest[BLOCK_COMMENT_OPEN.len()..];
                    mode = Mode::BlockComment;
                    continue;
                }
                if rest.starts_with(LINE_COMMENT) {
                    rest = &rest[rest.find('\n').unwrap_or(rest.len())..];
                    continue;
                }
                match c {
                    '\n' | STATEMENT_SEPARATOR => splitter.end_line(),
                    QUOTE => {
                        splitter.flush(false);
                        mode = Mode::Quoted;
                    }
                    _ => splitter.buffer.push(c),
                }
            }
        }
        rest = &rest[c.len_utf8()..];
    }

    if mode == Mode::Quoted {
        splitter.flush(true);
    }
    splitter.end_line();
    splitter.lines
}

/// Turn a logical line into tokens, dropping empty ones.
pub fn tokenize_line(line: &[Span]) -> Vec<String> {
    let mut tokens = Vec::new();
    for span in line {
        match span {
            Span::Plain(text) => tokens.extend(
                text.split(|c: char| c.is_whitespace() || c == TOKEN_DELIMITER)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string),
            ),
            Span::Quoted(text) if !text.is_empty() => tokens.push(text.clone()),
            Span::Quoted(_) => {}
        }
    }
    tokens
}

/// Split and tokenize a whole directive file.
///
/// Every logical line is returned, including ones without tokens.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    split_lines(text).iter().map(|line| tokenize_line(line)).collect()
}
