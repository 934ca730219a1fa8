//! Scope policy: which paths the importer may read and patch

use modimp_fs::NormalizedPath;

use crate::context::ImportContext;

/// Result of checking a path against the scope policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeVerdict {
    FileInScope,
    DirInScope,
    OutOfScope,
    InBaseCache,
    InEditCache,
    /// One of the importer's own files
    Protected,
    DoesNotExist,
}

impl ScopeVerdict {
    /// Only existing files inside the content folder may be patched or used
    /// as payload sources.
    pub fn is_in_scope(&self) -> bool {
        matches!(self, Self::FileInScope)
    }
}

impl ImportContext {
    /// Check `path` against the scope policy.
    ///
    /// With `permit_missing`, a path that does not exist is judged as if it
    /// were a directory about to be created.
    pub fn scope_verdict(&self, path: &NormalizedPath, permit_missing: bool) -> ScopeVerdict {
        if !permit_missing && !path.exists() {
            return ScopeVerdict::DoesNotExist;
        }
        if self.protected.iter().any(|p| path.is_within(p)) {
            return ScopeVerdict::Protected;
        }
        if path.is_within(&self.base_dir) {
            return ScopeVerdict::InBaseCache;
        }
        if path.is_within(&self.edit_dir) {
            return ScopeVerdict::InEditCache;
        }
        if path.is_within(&self.scope_dir) {
            if path.is_file() {
                return ScopeVerdict::FileInScope;
            }
            return ScopeVerdict::DirInScope;
        }
        ScopeVerdict::OutOfScope
    }

    pub fn in_scope(&self, path: &NormalizedPath) -> bool {
        self.scope_verdict(path, false).is_in_scope()
    }
}
