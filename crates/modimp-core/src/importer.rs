//! One complete import run

use std::fs;

use tracing::info;

use crate::cache::{CacheManager, RestoreReport};
use crate::context::ImportContext;
use crate::directive::{Interpretation, Interpreter};
use crate::echo::EchoSink;
use crate::payload::DispatchTable;
use crate::Result;

/// Totals reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Target files patched
    pub files: usize,
    /// Mod records applied
    pub records: usize,
    pub restore: RestoreReport,
}

impl RunSummary {
    /// The closing progress line.
    pub fn message(&self) -> String {
        format!(
            "{} file{} modified by a total of {} mod file{}.",
            self.files,
            if self.files == 1 { " is" } else { "s are" },
            self.records,
            if self.records == 1 { "" } else { "s" },
        )
    }
}

/// Restores the previous run, then reads every mod and patches its targets.
pub struct ModImporter {
    ctx: ImportContext,
    table: DispatchTable,
}

impl ModImporter {
    pub fn new(ctx: ImportContext) -> Self {
        let table = DispatchTable::standard(&ctx);
        Self { ctx, table }
    }

    /// Use a custom dispatch table instead of the built-in payloads.
    pub fn with_table(ctx: ImportContext, table: DispatchTable) -> Self {
        Self { ctx, table }
    }

    pub fn context(&self) -> &ImportContext {
        &self.ctx
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Interpret every mod's directive file without touching the game.
    pub fn read_mods(&self) -> Result<Interpretation> {
        let mut interpreter = Interpreter::new(&self.ctx, &self.table);
        interpreter.load_all()?;
        let mut interpretation = interpreter.finish();
        interpretation.registry.sort();
        Ok(interpretation)
    }

    /// Run the import.
    ///
    /// Stops at the first target that fails to patch. That target is
    /// reverted; targets patched before it stay patched.
    pub fn run(&self, echo: &mut dyn EchoSink) -> Result<RunSummary> {
        let mut cache = CacheManager::new(&self.ctx);

        echo.echo("Cleaning edits... (if there are issues validate/reinstall files)");
        let restore = cache.restore_previous()?;
        for target in &restore.restored {
            echo.echo(target);
        }
        info!(
            restored = restore.restored.len(),
            modified = restore.externally_modified.len(),
            "previous run restored"
        );

        cache.begin_batch()?;
        fs::create_dir_all(self.ctx.mods_dir.to_native())?;
        fs::create_dir_all(self.ctx.deploy_dir.to_native())?;

        echo.echo("");
        echo.echo("Reading mod files...");
        let interpretation = self.read_mods()?;
        for file in &interpretation.files {
            echo.echo(file);
        }

        let deployed = interpretation.deployments.stage(&self.ctx)?;
        info!(files = deployed, "mod files deployed");

        echo.echo("");
        echo.echo(&format!("Modified files for {} mods:", self.ctx.profile_name));
        let registry = &interpretation.registry;
        for (target, records) in registry.iter() {
            cache.apply_patches(target, records, &self.table, echo)?;
        }
        cache.finish();

        let summary = RunSummary {
            files: registry.target_count(),
            records: registry.record_count(),
            restore,
        };
        echo.echo("");
        echo.echo(&summary.message());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_message_grammar() {
        let one = RunSummary {
            files: 1,
            records: 1,
            ..RunSummary::default()
        };
        assert_eq!(one.message(), "1 file is modified by a total of 1 mod file.");

        let many = RunSummary {
            files: 2,
            records: 5,
            ..RunSummary::default()
        };
        assert_eq!(many.message(), "2 files are modified by a total of 5 mod files.");
    }
}
