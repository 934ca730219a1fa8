//! Payload dispatch: directive keywords mapped to file-patching handlers
//!
//! Entries are matched in declaration order against the leading tokens of a
//! directive line. An entry whose backing capability is missing stays in the
//! table, marked unavailable, so its lines can be reported and skipped.

mod import;
mod merge;
mod package;
mod replace;

use std::fmt;

use modimp_content::Format;
use modimp_fs::NormalizedPath;

use crate::context::ImportContext;
use crate::{Error, Result};

pub use self::import::ImportHandler;
pub use self::merge::MergeHandler;
pub use self::package::{PackageCopyHandler, PackagePatchHandler};
pub use self::replace::ReplaceHandler;

/// The kind of patch a mod record applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Replace,
    PackageCopy,
    PackagePatch,
    Import,
    TopImport,
    Merge(Format),
}

impl PayloadKind {
    /// The keyword tokens that introduce this payload in a directive file.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Replace => &["Replace"],
            Self::PackageCopy => &["Package", "Copy"],
            Self::PackagePatch => &["Package", "Patch"],
            Self::Import => &["Import"],
            Self::TopImport => &["Top", "Import"],
            Self::Merge(Format::Sjson) => &["SJSON"],
            Self::Merge(Format::Json) => &["JSON"],
            Self::Merge(Format::Yaml) => &["YAML"],
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords().join(" "))
    }
}

/// Applies one payload to a live target file.
pub trait PayloadHandler: Send + Sync {
    /// Patch `target` in place using `sources`, both absolute.
    fn apply(&self, target: &NormalizedPath, sources: &[NormalizedPath]) -> Result<()>;

    /// Whether the handler's backing capability is present.
    fn is_available(&self) -> bool {
        true
    }
}

/// One row of the dispatch table
pub struct DispatchEntry {
    pub kind: PayloadKind,
    /// Number of source paths each invocation takes
    pub arity: usize,
    /// Checked once when the table is built
    pub available: bool,
    handler: Box<dyn PayloadHandler>,
}

impl DispatchEntry {
    pub fn new(kind: PayloadKind, arity: usize, handler: Box<dyn PayloadHandler>) -> Self {
        Self {
            kind,
            arity: arity.max(1),
            available: handler.is_available(),
            handler,
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.kind.keywords()
    }

    /// The arguments following this entry's keywords, if `tokens` starts
    /// with them and carries at least one argument.
    pub fn strip_keywords<'t>(&self, tokens: &'t [String]) -> Option<&'t [String]> {
        let keywords = self.keywords();
        if tokens.len() <= keywords.len() {
            return None;
        }
        let matches = tokens.iter().zip(keywords).all(|(token, keyword)| token == keyword);
        matches.then(|| &tokens[keywords.len()..])
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("available", &self.available)
            .finish()
    }
}

/// Ordered set of payload handlers
#[derive(Debug, Default)]
pub struct DispatchTable {
    entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The importer's built-in payloads, in match order.
    pub fn standard(ctx: &ImportContext) -> Self {
        let mut table = Self::new();
        table.push(DispatchEntry::new(PayloadKind::Replace, 1, Box::new(ReplaceHandler)));
        table.push(DispatchEntry::new(
            PayloadKind::PackageCopy,
            1,
            Box::new(PackageCopyHandler),
        ));
        table.push(DispatchEntry::new(
            PayloadKind::PackagePatch,
            1,
            Box::new(PackagePatchHandler::resolve(ctx.package_patcher.as_deref())),
        ));
        table.push(DispatchEntry::new(
            PayloadKind::Import,
            1,
            Box::new(ImportHandler::append()),
        ));
        table.push(DispatchEntry::new(
            PayloadKind::TopImport,
            1,
            Box::new(ImportHandler::prepend()),
        ));
        for format in Format::ALL {
            table.push(DispatchEntry::new(
                PayloadKind::Merge(format),
                1,
                Box::new(MergeHandler::new(format)),
            ));
        }
        table
    }

    /// Append an entry; it matches after every existing one.
    pub fn push(&mut self, entry: DispatchEntry) {
        self.entries.push(entry);
    }

    /// Replace the handler for `kind`, keeping its position.
    pub fn replace(&mut self, entry: DispatchEntry) {
        match self.entries.iter_mut().find(|e| e.kind == entry.kind) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    pub fn entry(&self, kind: PayloadKind) -> Option<&DispatchEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// First entry whose keywords prefix `tokens`, with the remaining
    /// arguments.
    pub fn match_line<'t>(&self, tokens: &'t [String]) -> Option<(&DispatchEntry, &'t [String])> {
        self.entries
            .iter()
            .find_map(|entry| entry.strip_keywords(tokens).map(|args| (entry, args)))
    }

    /// Run the handler for `kind` on a live target.
    pub fn apply(
        &self,
        kind: PayloadKind,
        target: &NormalizedPath,
        sources: &[NormalizedPath],
    ) -> Result<()> {
        let entry = self
            .entry(kind)
            .filter(|entry| entry.available)
            .ok_or_else(|| Error::PayloadUnavailable {
                keyword: kind.to_string(),
            })?;
        entry.handler.apply(target, sources)
    }
}

/// The first source, or an error naming the payload.
fn first_source<'s>(
    kind: PayloadKind,
    target: &NormalizedPath,
    sources: &'s [NormalizedPath],
) -> Result<&'s NormalizedPath> {
    sources.first().ok_or_else(|| Error::MissingSource {
        keyword: kind.to_string(),
        target: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modimp_test_utils::GameFixture;
    use pretty_assertions::assert_eq;

    fn toks(line: &str) -> Vec<String> {
        line.split(' ').map(str::to_string).collect()
    }

    fn table() -> (GameFixture, DispatchTable) {
        let game = GameFixture::new();
        let ctx = ImportContext::from_profile(
            "Hades",
            &crate::config::Profile::default(),
            Some(&game.game_dir()),
        )
        .unwrap();
        (game, DispatchTable::standard(&ctx))
    }

    #[test]
    fn declaration_order() {
        let (_game, table) = table();
        let kinds: Vec<_> = table.entries().iter().map(|e| e.kind.to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "Replace",
                "Package Copy",
                "Package Patch",
                "Import",
                "Top Import",
                "SJSON",
                "JSON",
                "YAML"
            ]
        );
    }

    #[test]
    fn match_line_strips_keywords() {
        let (_game, table) = table();
        let tokens = toks("Top Import a.lua b.lua");
        let (entry, args) = table.match_line(&tokens).unwrap();
        assert_eq!(entry.kind, PayloadKind::TopImport);
        assert_eq!(args, &tokens[2..]);
    }

    #[test]
    fn keywords_without_arguments_do_not_match() {
        let (_game, table) = table();
        assert!(table.match_line(&toks("Import")).is_none());
        assert!(table.match_line(&toks("Package Copy")).is_none());
        assert!(table.match_line(&toks("Unknown a.lua")).is_none());
    }

    #[test]
    fn package_patch_unavailable_without_patcher() {
        let (_game, table) = table();
        let entry = table.entry(PayloadKind::PackagePatch).unwrap();
        assert!(!entry.available);
        let err = table
            .apply(PayloadKind::PackagePatch, &NormalizedPath::new("a"), &[])
            .unwrap_err();
        assert!(matches!(err, Error::PayloadUnavailable { .. }));
    }

    #[test]
    fn json_merge_always_available() {
        let (_game, table) = table();
        assert!(table.entry(PayloadKind::Merge(Format::Json)).unwrap().available);
    }
}
