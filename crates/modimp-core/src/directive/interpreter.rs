//! Directive interpretation
//!
//! Each directive file runs with its own state: active targets, load
//! priority and deploy config. `Include` starts a fresh state for the
//! included file, so nothing it sets leaks back into the includer.

use modimp_fs::{NormalizedPath, io};
use tracing::{debug, warn};

use super::tokenizer::tokenize;
use crate::Result;
use crate::context::ImportContext;
use crate::deploy::DeployQueue;
use crate::payload::{DispatchEntry, DispatchTable};
use crate::registry::{DeployConfig, ModRecord, ModRegistry};

const KW_TO: &str = "To";
const KW_LOAD: &str = "Load";
const KW_PRIORITY: &str = "Priority";
const KW_INCLUDE: &str = "Include";
const KW_DEPLOY: &str = "Deploy";

/// Everything produced by interpreting a set of directive files
#[derive(Debug, Default)]
pub struct Interpretation {
    pub registry: ModRegistry,
    pub deployments: DeployQueue,
    /// Directive files read, relative to the mods folder
    pub files: Vec<String>,
}

/// Per-file interpreter state
#[derive(Debug, Clone)]
struct FileState {
    dir: NormalizedPath,
    targets: Vec<String>,
    priority: i64,
    deploy_config: DeployConfig,
}

/// A payload source argument after directory expansion
enum Source {
    File(NormalizedPath),
    Dir(Vec<NormalizedPath>),
}

impl Source {
    fn pick(&self, index: usize) -> &NormalizedPath {
        match self {
            Self::File(path) => path,
            Self::Dir(files) => &files[index],
        }
    }
}

/// Turns directive files into mod records and deployments.
pub struct Interpreter<'a> {
    ctx: &'a ImportContext,
    table: &'a DispatchTable,
    output: Interpretation,
    /// Canonical directive files currently being interpreted, outermost first
    active: Vec<NormalizedPath>,
}

impl<'a> Interpreter<'a> {
    pub fn new(ctx: &'a ImportContext, table: &'a DispatchTable) -> Self {
        Self {
            ctx,
            table,
            output: Interpretation::default(),
            active: Vec::new(),
        }
    }

    /// Interpret `<mod_dir>/modfile.txt` if it exists.
    pub fn load_mod(&mut self, mod_dir: &NormalizedPath) -> Result<()> {
        let modfile = mod_dir.join(&self.ctx.modfile_name);
        if modfile.is_file() {
            self.load_file(&modfile)?;
        }
        Ok(())
    }

    /// Interpret every mod folder inside the mods folder, by name.
    pub fn load_all(&mut self) -> Result<()> {
        if !self.ctx.mods_dir.is_dir() {
            return Ok(());
        }
        for entry in io::list_dir(&self.ctx.mods_dir)? {
            if entry.is_dir() {
                self.load_mod(&entry)?;
            }
        }
        Ok(())
    }

    /// Interpret one directive file, or every file below a directory.
    pub fn load_file(&mut self, path: &NormalizedPath) -> Result<()> {
        self.load(path, 0)
    }

    pub fn finish(self) -> Interpretation {
        self.output
    }

    fn load(&mut self, path: &NormalizedPath, depth: usize) -> Result<()> {
        if depth > self.ctx.max_include_depth {
            warn!(file = %path, limit = self.ctx.max_include_depth, "include depth exceeded, skipping");
            return Ok(());
        }
        let Some(relative) = path.relative_to(&self.ctx.mods_dir).map(str::to_string) else {
            debug!(file = %path, "directive file outside the mods folder, skipping");
            return Ok(());
        };

        if path.is_dir() {
            for entry in io::list_dir(path)? {
                self.load(&entry, depth + 1)?;
            }
            return Ok(());
        }

        let key = NormalizedPath::canonicalize(path).unwrap_or_else(|_| path.clone());
        if self.active.contains(&key) {
            warn!(file = %path, "directive file already being interpreted, skipping include cycle");
            return Ok(());
        }

        let text = match io::read_text(path) {
            Ok(text) => text,
            Err(e) => {
                debug!(file = %path, error = %e, "directive file unreadable, skipping");
                return Ok(());
            }
        };
        self.output.files.push(relative);

        let Some(dir) = path.parent() else {
            return Ok(());
        };
        let mut state = FileState {
            dir,
            targets: self.ctx.default_target.clone(),
            priority: self.ctx.default_priority,
            deploy_config: DeployConfig::new(),
        };

        self.active.push(key);
        let result = tokenize(&text)
            .iter()
            .filter(|tokens| !tokens.is_empty())
            .try_for_each(|tokens| self.line(&mut state, tokens, depth));
        self.active.pop();
        result
    }

    fn line(&mut self, state: &mut FileState, tokens: &[String], depth: usize) -> Result<()> {
        let table = self.table;
        let args = &tokens[1..];
        match tokens[0].as_str() {
            KW_TO => {
                state.targets = if args.is_empty() {
                    self.ctx.default_target.clone()
                } else {
                    args.iter().map(|t| t.replace('\\', "/")).collect()
                };
            }
            KW_LOAD => {
                if args.first().map(String::as_str) == Some(KW_PRIORITY) {
                    match args.get(1) {
                        None => state.priority = self.ctx.default_priority,
                        Some(value) => match value.parse() {
                            Ok(priority) => state.priority = priority,
                            Err(_) => warn!(value = %value, "ignoring malformed load priority"),
                        },
                    }
                }
            }
            KW_INCLUDE if !args.is_empty() => {
                for arg in args {
                    let path = state.dir.join(arg);
                    self.load(&path, depth + 1)?;
                }
            }
            KW_DEPLOY if !args.is_empty() => {
                for arg in args {
                    self.deploy(&state.dir.join(arg), &state.deploy_config)?;
                }
            }
            _ => match table.match_line(tokens) {
                Some((entry, _)) if !entry.available => {
                    warn!(
                        payload = %entry.kind,
                        line = %tokens.join(" "),
                        "payload support is not available, skipping"
                    );
                }
                Some((entry, args)) => self.load_command(state, entry, args)?,
                None => debug!(line = %tokens.join(" "), "unrecognised directive"),
            },
        }
        Ok(())
    }

    fn deploy(&mut self, path: &NormalizedPath, config: &DeployConfig) -> Result<()> {
        let Some(relative) = path.relative_to(&self.ctx.mods_dir) else {
            debug!(path = %path, "deploy path outside the mods folder, dropped");
            return Ok(());
        };
        if path.is_file() {
            self.output.deployments.register(relative, config);
        } else if path.is_dir() {
            for entry in io::list_dir(path)? {
                if !entry.is_file() {
                    continue;
                }
                if let Some(relative) = entry.relative_to(&self.ctx.mods_dir) {
                    self.output.deployments.register(relative, config);
                }
            }
        } else {
            debug!(path = %path, "deploy path does not exist, dropped");
        }
        Ok(())
    }

    /// Resolve a payload argument relative to the directive file.
    ///
    /// Returns `None` if the argument may not be used as a payload source.
    /// Files of a directory argument that are out of scope are left out of
    /// its expansion.
    fn resolve_source(&self, state: &FileState, arg: &str) -> Result<Option<Source>> {
        let path = state.dir.join(arg);
        if !path.is_within(&self.ctx.mods_dir) {
            return Ok(None);
        }
        if path.is_dir() {
            let mut files = Vec::new();
            for entry in io::list_dir(&path)? {
                if entry.is_dir() {
                    continue;
                }
                if self.ctx.in_scope(&entry) {
                    files.push(entry);
                } else {
                    warn!(source = %entry, "payload source out of scope, skipping");
                }
            }
            return Ok(Some(Source::Dir(files)));
        }
        if self.ctx.in_scope(&path) {
            Ok(Some(Source::File(path)))
        } else {
            Ok(None)
        }
    }

    fn load_command(
        &mut self,
        state: &FileState,
        entry: &DispatchEntry,
        args: &[String],
    ) -> Result<()> {
        for target in &state.targets {
            let target_path = self.ctx.scope_dir.join(target);
            if !self.ctx.in_scope(&target_path) {
                debug!(target = %target, "target out of scope, dropped");
                continue;
            }
            let Some(target) = self.ctx.scope_relative(&target_path) else {
                continue;
            };

            for group in args.chunks_exact(entry.arity) {
                let mut sources = Vec::with_capacity(group.len());
                for arg in group {
                    match self.resolve_source(state, arg)? {
                        Some(source) => sources.push(source),
                        None => break,
                    }
                }
                if sources.len() != group.len() {
                    debug!(sources = %group.join(" "), "payload source out of scope, dropped");
                    continue;
                }

                let count = sources
                    .iter()
                    .filter_map(|source| match source {
                        Source::Dir(files) => Some(files.len()),
                        Source::File(_) => None,
                    })
                    .min()
                    .unwrap_or(1);

                for index in 0..count {
                    let picked: Vec<&NormalizedPath> =
                        sources.iter().map(|source| source.pick(index)).collect();
                    self.emit(state, entry, &target, &picked);
                }
            }
        }
        Ok(())
    }

    fn emit(
        &mut self,
        state: &FileState,
        entry: &DispatchEntry,
        target: &str,
        sources: &[&NormalizedPath],
    ) {
        let mut relatives = Vec::with_capacity(sources.len());
        let mut payload_sources = Vec::with_capacity(sources.len());
        for source in sources {
            let Some(relative) = source.relative_to(&self.ctx.mods_dir) else {
                return;
            };
            self.output
                .deployments
                .register(relative, &state.deploy_config);
            let deployed = self.ctx.deployed_path(relative);
            match self.ctx.scope_relative(&deployed) {
                Some(path) => payload_sources.push(path),
                None => return,
            }
            relatives.push(relative);
        }

        let source_description = relatives.join("\n");
        self.output.registry.add(ModRecord {
            source_description,
            payload_sources,
            kind: entry.kind,
            target: target.to_string(),
            sequence_index: 0,
            priority: state.priority,
            deploy_config: state.deploy_config.clone(),
        });
    }
}
