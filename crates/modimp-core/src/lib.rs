//! Patch engine for game content mods
//!
//! Mods are folders holding a `modfile.txt` directive file and payload files.
//! A run:
//!
//! 1. restores every file the previous run patched, unless it was changed
//!    since ([`CacheManager::restore_previous`]);
//! 2. interprets each mod's directives into [`ModRecord`]s
//!    ([`Interpreter`]);
//! 3. copies payloads into the deploy folder ([`DeployQueue`]);
//! 4. applies each target's records in priority order, rolling the target
//!    back if any payload fails ([`CacheManager::apply_patches`]).
//!
//! ```text
//!        ModImporter
//!             |
//!   +---------+----------+-------------+
//!   |         |          |             |
//! directive  registry  cache      payload ---> modimp-content
//!   |                    |
//!   +------ modimp-fs ---+
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod deploy;
pub mod directive;
pub mod echo;
pub mod error;
pub mod importer;
pub mod payload;
pub mod registry;
pub mod scope;

pub use cache::{CacheManager, RestoreReport, RunState};
pub use config::{ImporterConfig, Profile};
pub use context::ImportContext;
pub use deploy::DeployQueue;
pub use directive::{Interpretation, Interpreter};
pub use echo::{EchoSink, SilentEcho, TracingEcho};
pub use error::{Error, Result};
pub use importer::{ModImporter, RunSummary};
pub use payload::{DispatchEntry, DispatchTable, PayloadHandler, PayloadKind};
pub use registry::{DeployConfig, ModRecord, ModRegistry};
pub use scope::ScopeVerdict;
