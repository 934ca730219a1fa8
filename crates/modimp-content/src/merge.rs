//! Directive-annotated tree merging
//!
//! A patch tree is overlaid onto a base tree. Reserved keys and leading
//! sequence values in the patch steer the overlay:
//!
//! | Marker | Map form | Sequence form |
//! |--------|----------|---------------|
//! | Delete | `_delete = true` | first element `"_delete"` |
//! | ReplaceWhole | `_replace = true` | first element `"_replace"` |
//! | AppendItems | | first element `"_append"` |
//! | SequenceReindex | `_sequence = true` with decimal keys | |
//!
//! Precedence is fixed: Delete, then ReplaceWhole, then AppendItems, then a
//! positional or key-wise merge. Shape mismatches never fail; the patch
//! replaces the base.

use indexmap::IndexMap;
use tracing::warn;

use crate::tree::Tree;

pub const SEQUENCE_KEY: &str = "_sequence";
pub const DELETE_MARKER: &str = "_delete";
pub const REPLACE_MARKER: &str = "_replace";
pub const APPEND_MARKER: &str = "_append";

/// Indices above this in a sequence-override map are ignored.
pub const MAX_REINDEX: usize = 1 << 16;

/// Patch behaviours signalled by reserved values inside a patch tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMarker {
    Delete,
    ReplaceWhole,
    AppendItems,
    SequenceReindex,
}

impl PatchMarker {
    /// The marker a patch node carries, honouring precedence.
    pub fn detect(patch: &Tree) -> Option<PatchMarker> {
        match patch {
            Tree::Map(map) => {
                let flag = |key: &str| map.get(key).is_some_and(Tree::is_truthy);
                if flag(DELETE_MARKER) {
                    Some(Self::Delete)
                } else if flag(REPLACE_MARKER) {
                    Some(Self::ReplaceWhole)
                } else if flag(SEQUENCE_KEY) {
                    Some(Self::SequenceReindex)
                } else {
                    None
                }
            }
            Tree::Sequence(items) => match items.first().and_then(Tree::as_str) {
                Some(DELETE_MARKER) => Some(Self::Delete),
                Some(REPLACE_MARKER) => Some(Self::ReplaceWhole),
                Some(APPEND_MARKER) => Some(Self::AppendItems),
                _ => None,
            },
            _ => None,
        }
    }

    /// A map patch node that deletes whatever it is merged onto.
    pub fn delete_node() -> Tree {
        Tree::Map(IndexMap::from([(DELETE_MARKER.to_string(), Tree::from(true))]))
    }
}

/// Merge `patch` onto `base` and finalize the result.
///
/// The returned tree never contains `Absent` except as the root, which means
/// the whole document was deleted.
pub fn merge(base: Tree, patch: Tree) -> Tree {
    merge_node(base, patch).finalize()
}

/// Merge without finalizing; intermediate `Absent` values are kept.
pub fn merge_node(base: Tree, patch: Tree) -> Tree {
    if patch.is_absent() {
        return base;
    }

    let patch = match PatchMarker::detect(&patch) {
        Some(PatchMarker::Delete) => return Tree::Absent,
        Some(PatchMarker::SequenceReindex) => reindex(patch),
        _ => patch,
    };

    match patch {
        Tree::Sequence(items) => {
            let base = match base {
                Tree::Sequence(existing) => existing,
                _ => Vec::new(),
            };
            merge_sequence(base, items)
        }
        Tree::Map(entries) => {
            let base = match base {
                Tree::Map(existing) => existing,
                _ => IndexMap::new(),
            };
            merge_map(base, entries)
        }
        scalar => scalar,
    }
}

fn merge_sequence(mut base: Vec<Tree>, mut patch: Vec<Tree>) -> Tree {
    match patch.first().and_then(Tree::as_str) {
        Some(DELETE_MARKER) => Tree::Absent,
        Some(REPLACE_MARKER) => {
            patch.remove(0);
            Tree::Sequence(patch)
        }
        Some(APPEND_MARKER) => {
            base.extend(patch.into_iter().skip(1));
            Tree::Sequence(base)
        }
        _ => {
            if base.len() < patch.len() {
                base.resize(patch.len(), Tree::Absent);
            }
            for (slot, value) in base.iter_mut().zip(patch) {
                let current = std::mem::take(slot);
                *slot = merge_node(current, value);
            }
            Tree::Sequence(base)
        }
    }
}

fn merge_map(mut base: IndexMap<String, Tree>, mut patch: IndexMap<String, Tree>) -> Tree {
    if patch.get(REPLACE_MARKER).is_some_and(Tree::is_truthy) {
        patch.shift_remove(REPLACE_MARKER);
        return Tree::Map(patch);
    }

    for (key, value) in patch {
        let current = base.get_mut(&key).map(std::mem::take).unwrap_or_default();
        base.insert(key, merge_node(current, value));
    }
    Tree::Map(base)
}

/// Turn a sequence-override map into a sequence, placing each value at its
/// decimal key and padding gaps with `Absent`. Other keys are ignored.
fn reindex(patch: Tree) -> Tree {
    let Tree::Map(entries) = patch else {
        return patch;
    };

    let mut items = Vec::new();
    for (key, value) in entries {
        let Ok(index) = key.parse::<usize>() else {
            continue;
        };
        if index > MAX_REINDEX {
            warn!(index, "ignoring sequence-override index beyond limit");
            continue;
        }
        if index >= items.len() {
            items.resize(index + 1, Tree::Absent);
        }
        items[index] = value;
    }
    Tree::Sequence(items)
}
