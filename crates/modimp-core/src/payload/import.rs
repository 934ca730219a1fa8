use modimp_fs::{NormalizedPath, io};

use super::{PayloadHandler, PayloadKind, first_source};
use crate::Result;

/// Adds an `Import "<path>"` statement for the source to a script target.
///
/// The imported path is relative to the target's directory.
#[derive(Debug)]
pub struct ImportHandler {
    top: bool,
}

impl ImportHandler {
    /// Append the statement on a new last line.
    pub fn append() -> Self {
        Self { top: false }
    }

    /// Insert the statement as the first line.
    pub fn prepend() -> Self {
        Self { top: true }
    }

    fn kind(&self) -> PayloadKind {
        if self.top {
            PayloadKind::TopImport
        } else {
            PayloadKind::Import
        }
    }
}

fn import_statement(target: &NormalizedPath, source: &NormalizedPath) -> String {
    let relative = match target.parent() {
        Some(dir) => source.relative_from(&dir),
        None => source.to_string(),
    };
    format!("Import \"{relative}\"")
}

impl PayloadHandler for ImportHandler {
    fn apply(&self, target: &NormalizedPath, sources: &[NormalizedPath]) -> Result<()> {
        let source = first_source(self.kind(), target, sources)?;
        let statement = import_statement(target, source);
        let content = io::read_text(target)?;

        let patched = if self.top {
            format!("{statement}\n{content}")
        } else {
            format!("{content}\n{statement}")
        };
        io::write_text(target, &patched)?;
        Ok(())
    }
}
