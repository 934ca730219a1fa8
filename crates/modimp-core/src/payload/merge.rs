use modimp_content::{Format, merge_file};
use modimp_fs::NormalizedPath;

use super::{PayloadHandler, PayloadKind, first_source};
use crate::Result;

/// Merges a structured patch file into a structured target of the same
/// format.
#[derive(Debug)]
pub struct MergeHandler {
    format: Format,
}

impl MergeHandler {
    pub fn new(format: Format) -> Self {
        Self { format }
    }
}

impl PayloadHandler for MergeHandler {
    fn apply(&self, target: &NormalizedPath, sources: &[NormalizedPath]) -> Result<()> {
        let patch = first_source(PayloadKind::Merge(self.format), target, sources)?;
        merge_file(self.format, target, patch)?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.format.is_available()
    }
}
