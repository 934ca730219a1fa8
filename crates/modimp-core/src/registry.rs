//! Mod records grouped and ordered per target file

use indexmap::IndexMap;

use crate::payload::PayloadKind;

/// Settings attached to deployed payload files. Carried through untouched.
pub type DeployConfig = IndexMap<String, String>;

/// One resolved unit of patch work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRecord {
    /// Source paths relative to the mods folder, one per line, for progress
    /// output
    pub source_description: String,
    /// Deployed source paths, relative to the content folder
    pub payload_sources: Vec<String>,
    pub kind: PayloadKind,
    /// Target path relative to the content folder
    pub target: String,
    /// Position within the target's bucket; reassigned by [`ModRegistry::sort`]
    pub sequence_index: usize,
    pub priority: i64,
    pub deploy_config: DeployConfig,
}

/// Buckets mod records by target file.
///
/// Targets iterate in the order they were first seen.
#[derive(Debug, Default)]
pub struct ModRegistry {
    buckets: IndexMap<String, Vec<ModRecord>>,
}

impl ModRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to its target's bucket, after every record already there.
    pub fn add(&mut self, mut record: ModRecord) {
        let bucket = self.buckets.entry(record.target.clone()).or_default();
        record.sequence_index = bucket.len();
        bucket.push(record);
    }

    /// Order each bucket by ascending priority and renumber it.
    ///
    /// The sort is stable: records of equal priority keep discovery order.
    pub fn sort(&mut self) {
        for records in self.buckets.values_mut() {
            records.sort_by_key(|record| record.priority);
            for (index, record) in records.iter_mut().enumerate() {
                record.sequence_index = index;
            }
        }
    }

    pub fn get(&self, target: &str) -> Option<&[ModRecord]> {
        self.buckets.get(target).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ModRecord])> {
        self.buckets
            .iter()
            .map(|(target, records)| (target.as_str(), records.as_slice()))
    }

    pub fn target_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
