// src/xref.rs
//! Attach IPIP item ids to the rows of a scoring key.
//!
//! Each row label is put in lookup form, corrected through the remap table if it
//! is a known broken variant, then looked up. Row labels themselves are never
//! changed; a miss only leaves the id empty and is reported back to the caller.
use crate::core::sanitize::normalize_for_lookup;
use crate::engine::ScoringKey;
use crate::store::{IdTable, RemapTable};

/// Ids aligned with `ScoringKey::items`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrossRef {
    pub ids: Vec<Option<String>>,
    /// Original labels of rows with no id, in row order.
    pub unmatched: Vec<String>,
}

impl CrossRef {
    pub fn matched(&self) -> usize {
        self.ids.iter().filter(|id| id.is_some()).count()
    }
}

pub fn lookup<'t>(item: &str, ipip: &'t IdTable, remap: &RemapTable) -> Option<&'t str> {
    let normalized = normalize_for_lookup(item);
    ipip.get(remap.apply(&normalized))
}

pub fn cross_reference(key: &ScoringKey, ipip: &IdTable, remap: &RemapTable) -> CrossRef {
    let mut out = CrossRef::default();
    for item in &key.items {
        let id = lookup(item, ipip, remap).map(String::from);
        if id.is_none() {
            out.unmatched.push(item.clone());
        }
        out.ids.push(id);
    }
    out
}
