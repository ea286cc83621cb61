// src/store.rs
//! Read-only lookup tables, loaded once per run.
//!
//! All three are two-column TSV files with a header row:
//! - IPIP items: `text <TAB> id`, keyed by lookup form (see `sanitize::normalize_for_lookup`)
//! - remap: `broken <TAB> corrected`, both sides in lookup form
//! - split: `merged <TAB> first`, raw extracted item text
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::consts::TABLE_SEP;
use crate::config::{RunOptions, TableSource};
use crate::core::sanitize::normalize_for_lookup;
use crate::csv::parse_rows;
use crate::error::{KeyError, Result};

/// Item text (lookup form) -> external IPIP id.
#[derive(Clone, Debug, Default)]
pub struct IdTable(HashMap<String, String>);

impl IdTable {
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        Self(pairs.into_iter().map(|(text, id)| (normalize_for_lookup(&text), id)).collect())
    }

    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.0.get(normalized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Typo'd item text -> corrected text, both in lookup form.
#[derive(Clone, Debug, Default)]
pub struct RemapTable(HashMap<String, String>);

impl RemapTable {
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(bad, good)| (normalize_for_lookup(&bad), normalize_for_lookup(&good)))
                .collect(),
        )
    }

    /// Corrected form of `normalized`, or `normalized` itself.
    pub fn apply<'a>(&'a self, normalized: &'a str) -> &'a str {
        self.0.get(normalized).map(String::as_str).unwrap_or(normalized)
    }
}

/// Wrongly merged item text -> the first item it should be split into.
#[derive(Clone, Debug, Default)]
pub struct SplitTable(HashMap<String, String>);

impl SplitTable {
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn first_of(&self, merged: &str) -> Option<&str> {
        self.0.get(merged).map(String::as_str)
    }
}

/// Every table a run needs. `ipip` is only loaded when cross-referencing.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub ipip: Option<IdTable>,
    pub remap: RemapTable,
    pub split: SplitTable,
}

impl Tables {
    pub fn load(opts: &RunOptions) -> Result<Self> {
        let ipip = if opts.cross_reference {
            // ids are useless without the item bank, wherever it was meant to be
            let path = opts.ipip_table.path();
            let t = IdTable::from_pairs(read_pairs(path)?);
            logf!("Tables: {} IPIP items from {}", t.len(), path.display());
            Some(t)
        } else {
            None
        };
        let remap = RemapTable::from_pairs(read_optional(&opts.remap_table)?);
        let split = SplitTable::from_pairs(read_optional(&opts.split_table)?);
        Ok(Self { ipip, remap, split })
    }
}

fn read_optional(src: &TableSource) -> Result<Vec<(String, String)>> {
    if !src.required() && !src.path().exists() {
        logd!("Tables: {} not found, using empty table", src.path().display());
        return Ok(Vec::new());
    }
    read_pairs(src.path())
}

/// First two columns of every data row; the header row and short rows are skipped.
pub fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    let text = fs::read_to_string(path).map_err(|e| KeyError::io(path, e))?;
    let pairs: Vec<(String, String)> = parse_rows(&text, TABLE_SEP)
        .into_iter()
        .skip(1)
        .filter_map(|mut row| {
            if row.len() < 2 { return None; }
            row.truncate(2);
            let second = row.pop()?;
            let first = row.pop()?;
            Some((first, second))
        })
        .collect();
    logd!("Tables: {} rows from {}", pairs.len(), path.display());
    Ok(pairs)
}
