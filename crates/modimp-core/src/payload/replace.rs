use modimp_fs::{NormalizedPath, io};

use super::{PayloadHandler, PayloadKind, first_source};
use crate::Result;

/// Overwrites the target with the source file.
#[derive(Debug, Default)]
pub struct ReplaceHandler;

impl PayloadHandler for ReplaceHandler {
    fn apply(&self, target: &NormalizedPath, sources: &[NormalizedPath]) -> Result<()> {
        let source = first_source(PayloadKind::Replace, target, sources)?;
        io::copy_file(source, target)?;
        Ok(())
    }
}
