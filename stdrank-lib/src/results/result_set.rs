use crate::targets::Target;
use serde::Serialize;
use std::collections::BTreeMap;

/// One measured package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    #[serde(rename = "libPath")]
    pub target: Target,

    #[serde(rename = "num")]
    pub count: u64,
}

impl ResultEntry {
    #[must_use]
    pub const fn new(target: Target, count: u64) -> Self {
        Self { target, count }
    }
}

/// All packages measured in a run.
///
/// Entries are kept in insertion order until [`ResultSet::sort_descending`] is applied.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<ResultEntry>,
}

impl ResultSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, entry: ResultEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Count recorded for `target`, if it was measured.
    #[must_use]
    pub fn get(&self, target: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.target.as_str() == target).map(|e| e.count)
    }

    /// Order entries by decreasing count. Entries with equal counts keep their relative order.
    pub fn sort_descending(&mut self) {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
    }

    /// Order-independent view of the set.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<Target, u64> {
        self.entries.iter().map(|e| (e.target.clone(), e.count)).collect()
    }
}

impl FromIterator<ResultEntry> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ResultEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<ResultEntry> for ResultSet {
    fn extend<I: IntoIterator<Item = ResultEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultEntry;
    type IntoIter = std::vec::IntoIter<ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
