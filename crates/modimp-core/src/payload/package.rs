use std::path::PathBuf;
use std::process::Command;

use modimp_fs::{NormalizedPath, io};
use tracing::debug;

use super::{PayloadHandler, PayloadKind, first_source};
use crate::{Error, Result};

/// Overwrites the target with the source, but only if the target exists.
#[derive(Debug, Default)]
pub struct PackageCopyHandler;

impl PayloadHandler for PackageCopyHandler {
    fn apply(&self, target: &NormalizedPath, sources: &[NormalizedPath]) -> Result<()> {
        let source = first_source(PayloadKind::PackageCopy, target, sources)?;
        if target.exists() {
            io::copy_file(source, target)?;
        }
        Ok(())
    }
}

/// Patches a binary package by running an external patcher as
/// `<patcher> patch <target> <source>`.
#[derive(Debug, Default)]
pub struct PackagePatchHandler {
    command: Option<PathBuf>,
}

impl PackagePatchHandler {
    /// Look the patcher command up on `PATH` (or as a path).
    pub fn resolve(command: Option<&str>) -> Self {
        let command = command.and_then(|name| match which::which(name) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(command = name, error = %e, "package patcher not found");
                None
            }
        });
        Self { command }
    }
}

impl PayloadHandler for PackagePatchHandler {
    fn apply(&self, target: &NormalizedPath, sources: &[NormalizedPath]) -> Result<()> {
        let command = self.command.as_ref().ok_or_else(|| Error::PayloadUnavailable {
            keyword: PayloadKind::PackagePatch.to_string(),
        })?;
        let source = first_source(PayloadKind::PackagePatch, target, sources)?;

        let output = Command::new(command)
            .arg("patch")
            .arg(target.to_native())
            .arg(source.to_native())
            .output()?;
        if !output.status.success() {
            return Err(Error::PackagePatch {
                message: format!(
                    "{} exited with {}: {}",
                    command.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.command.is_some()
    }
}
