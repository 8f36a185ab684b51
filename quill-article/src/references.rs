//! Citation reference map: one global index per cited source.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use quill_core::Information;
use serde::{Deserialize, Serialize};

/// `url → unified citation index` (1-based, dense) and `url → Information`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMap {
    pub url_to_unified_index: BTreeMap<String, usize>,
    pub url_to_info: BTreeMap<String, Information>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map indexing `sources` 1..=n in order. Repeated URLs keep their
    /// first index and merge snippets.
    pub fn from_sources(sources: &[Information]) -> Self {
        let mut map = Self::new();
        let keep: BTreeSet<usize> = (1..=sources.len()).collect();
        map.merge(sources, &keep);
        map
    }

    pub fn len(&self) -> usize {
        self.url_to_unified_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.url_to_unified_index.is_empty()
    }

    /// Information cited as `[index]`.
    pub fn info_for_index(&self, index: usize) -> Option<&Information> {
        self.url_to_unified_index
            .iter()
            .find(|(_, i)| **i == index)
            .and_then(|(url, _)| self.url_to_info.get(url))
    }

    /// Merge the sources one section was written from.
    ///
    /// `sources[n - 1]` is the source of local citation `[n]`; only the local
    /// indices in `keep` are merged. A new URL gets the next global index; a
    /// known URL keeps its index and gains the new snippets. Returns the
    /// local → global index mapping.
    pub fn merge(
        &mut self,
        sources: &[Information],
        keep: &BTreeSet<usize>,
    ) -> HashMap<usize, usize> {
        let mut mapping = HashMap::new();
        for (i, source) in sources.iter().enumerate() {
            let local = i + 1;
            if !keep.contains(&local) {
                continue;
            }
            let next = self.url_to_unified_index.len() + 1;
            let global = *self
                .url_to_unified_index
                .entry(source.url.clone())
                .or_insert(next);
            self.url_to_info
                .entry(source.url.clone())
                .and_modify(|existing| existing.merge(source))
                .or_insert_with(|| {
                    let mut info = source.clone();
                    info.dedup_snippets();
                    info
                });
            mapping.insert(local, global);
        }
        mapping
    }

    /// Apply an old → new index mapping. Sources whose index has no new
    /// index are dropped.
    pub fn renumber(&mut self, mapping: &HashMap<usize, usize>) {
        self.url_to_unified_index = std::mem::take(&mut self.url_to_unified_index)
            .into_iter()
            .filter_map(|(url, old)| mapping.get(&old).map(|new| (url, *new)))
            .collect();
        let cited = &self.url_to_unified_index;
        self.url_to_info.retain(|url, _| cited.contains_key(url));
    }
}
