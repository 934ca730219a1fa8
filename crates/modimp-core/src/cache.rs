//! Pristine snapshots, fingerprints and rollback
//!
//! Two caches live beside the patched files:
//!
//! - the base cache holds the pre-patch copy of every target touched by the
//!   current run, at the target's relative path;
//! - the edit cache holds `<target>.hash`, the fingerprint of the content the
//!   importer last wrote.
//!
//! The next run compares live files with their fingerprints to decide
//! whether the pristine copy can be put back.

use modimp_fs::{Fingerprinter, NormalizedPath, io};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::context::ImportContext;
use crate::echo::{EchoSink, source_line};
use crate::payload::DispatchTable;
use crate::registry::ModRecord;
use crate::{Error, Result};

/// Lifecycle of a run as seen by the cache manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Restoring,
    Provisioning,
    Applying { target: String },
    Done,
    Failed { target: String },
}

/// Outcome of restoring the previous run's targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Targets put back to their pristine content
    pub restored: Vec<String>,
    /// Targets changed since the last run; left as they are
    pub externally_modified: Vec<String>,
    /// Targets that already matched their pristine copy
    pub unchanged: Vec<String>,
}

/// What the live copy of a cached target looks like now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveState {
    Missing,
    /// Still exactly what the importer wrote
    AsPatched,
    /// Byte-identical to the pristine copy
    Pristine,
    /// Pristine copy without a fingerprint: a run stopped mid-target
    Interrupted,
    Modified,
}

/// Owns the base and edit caches for one run.
pub struct CacheManager<'a> {
    ctx: &'a ImportContext,
    state: RunState,
}

impl<'a> CacheManager<'a> {
    pub fn new(ctx: &'a ImportContext) -> Self {
        Self {
            ctx,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Undo the previous run's patches.
    ///
    /// Every pristine copy in the base cache is put back over its live file,
    /// unless the live file was changed by something other than the importer.
    /// Those are reported and their pristine copies kept. A pristine copy
    /// with no fingerprint beside it comes from a run that stopped before
    /// committing the target, so it is always put back. Empty cache
    /// directories are pruned afterwards.
    pub fn restore_previous(&mut self) -> Result<RestoreReport> {
        self.state = RunState::Restoring;
        let mut report = RestoreReport::default();
        let base_dir = &self.ctx.base_dir;
        if !base_dir.is_dir() {
            return Ok(report);
        }

        let mut pristine_files = Vec::new();
        for entry in WalkDir::new(base_dir.to_native()).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                pristine_files.push(NormalizedPath::new(entry.path()));
            }
        }

        for pristine in pristine_files {
            let Some(target) = pristine.relative_to(base_dir).map(str::to_string) else {
                continue;
            };
            let live = self.ctx.scope_dir.join(&target);

            match self.live_state(&target, &live, &pristine)? {
                LiveState::Missing | LiveState::AsPatched => {
                    io::copy_file(&pristine, &live)?;
                    io::remove_file(&pristine)?;
                    debug!(target = %target, "restored pristine copy");
                    report.restored.push(target);
                }
                LiveState::Interrupted => {
                    io::copy_file(&pristine, &live)?;
                    io::remove_file(&pristine)?;
                    warn!(
                        target = %target,
                        "previous run stopped before this file was committed; restored pristine copy"
                    );
                    report.restored.push(target);
                }
                LiveState::Pristine => {
                    io::remove_file(&pristine)?;
                    report.unchanged.push(target);
                }
                LiveState::Modified => {
                    warn!(
                        target = %target,
                        "file changed since it was last patched; leaving it as is"
                    );
                    report.externally_modified.push(target);
                }
            }
        }

        io::prune_empty_dirs(base_dir)?;
        Ok(report)
    }

    fn live_state(
        &self,
        target: &str,
        live: &NormalizedPath,
        pristine: &NormalizedPath,
    ) -> Result<LiveState> {
        if !live.is_file() {
            return Ok(LiveState::Missing);
        }
        if self.is_edited(target)? {
            return Ok(LiveState::AsPatched);
        }
        if io::read_bytes(live)? == io::read_bytes(pristine)? {
            return Ok(LiveState::Pristine);
        }
        if !self.ctx.fingerprint_path(target).is_file() {
            return Ok(LiveState::Interrupted);
        }
        Ok(LiveState::Modified)
    }

    /// Whether the live target still has the fingerprint recorded for it.
    ///
    /// The comparison uses the algorithms the fingerprint was recorded with,
    /// not the ones currently configured.
    pub fn is_edited(&self, target: &str) -> Result<bool> {
        let recorded = self.ctx.fingerprint_path(target);
        let live = self.ctx.scope_dir.join(target);
        if !recorded.is_file() || !live.is_file() {
            return Ok(false);
        }
        let recorded = io::read_text(&recorded)?;
        Ok(Fingerprinter::matches_recorded(&recorded, &live)?)
    }

    /// Start a fresh batch with empty base and edit caches.
    pub fn begin_batch(&mut self) -> Result<()> {
        self.state = RunState::Provisioning;
        io::reset_dir(&self.ctx.base_dir)?;
        io::reset_dir(&self.ctx.edit_dir)?;
        Ok(())
    }

    /// Apply one target's ordered records.
    ///
    /// The live file is snapshotted first. If any handler fails the snapshot
    /// is copied back and [`Error::HandlerFailed`] returned; otherwise the
    /// patched file's fingerprint is recorded.
    pub fn apply_patches(
        &mut self,
        target: &str,
        records: &[ModRecord],
        table: &DispatchTable,
        echo: &mut dyn EchoSink,
    ) -> Result<()> {
        self.state = RunState::Applying {
            target: target.to_string(),
        };
        let live = self.ctx.scope_dir.join(target);
        let pristine = self.ctx.pristine_path(target);
        io::copy_file(&live, &pristine)?;

        echo.echo("");
        echo.echo(target);

        let mut number = 0;
        for record in records {
            let sources: Vec<_> = record
                .payload_sources
                .iter()
                .map(|source| self.ctx.scope_dir.join(source))
                .collect();

            if let Err(error) = table.apply(record.kind, &live, &sources) {
                io::copy_file(&pristine, &live)?;
                warn!(target = %target, error = %error, "patch failed, target reverted");
                self.state = RunState::Failed {
                    target: target.to_string(),
                };
                return Err(Error::HandlerFailed {
                    target: target.to_string(),
                    source: Box::new(error),
                });
            }

            for (index, source) in record.source_description.lines().enumerate() {
                number += 1;
                echo.echo(&source_line(number, index > 0, source));
            }
        }

        let fingerprint = self.ctx.fingerprinter.fingerprint_file(&live)?;
        io::write_text(&self.ctx.fingerprint_path(target), &fingerprint)?;
        info!(target = %target, records = records.len(), "target patched");
        Ok(())
    }

    pub fn finish(&mut self) {
        self.state = RunState::Done;
    }
}
