// src/config/measure.rs
//! Per-measure scraping configuration.
//!
//! A measure is described by a small JSON record of regex patterns, merged over
//! `configs/default.json`. The raw record is only a bag of optional strings; it is
//! compiled once into a [`MeasureConfig`] whose patterns are validated up front, so
//! a missing capture group shows up at load time rather than halfway through a page.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::engine::types::Sign;
use crate::error::{KeyError, Result};

use super::consts::CONFIG_EXT;

/// One JSON config file as written on disk. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RawMeasureConfig {
    pub url: Option<String>,
    pub default_sign: Option<String>,
    pub start_line: Option<String>,
    pub end_line: Option<String>,
    pub skip_onset: Option<String>,
    pub skip_offset: Option<String>,
    pub skip: Option<String>,
    pub key_sign: Option<String>,
    pub item_sign: Option<String>,
    pub scale_title: Option<String>,
    pub extract_title: Option<String>,
    pub item: Option<String>,
    pub extract_item: Option<String>,
}

impl RawMeasureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| KeyError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| KeyError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fields set here win; anything left unset falls back to `base`.
    pub fn merged_over(self, base: &RawMeasureConfig) -> RawMeasureConfig {
        fn pick(own: Option<String>, base: &Option<String>) -> Option<String> {
            own.or_else(|| base.clone())
        }
        RawMeasureConfig {
            url: pick(self.url, &base.url),
            default_sign: pick(self.default_sign, &base.default_sign),
            start_line: pick(self.start_line, &base.start_line),
            end_line: pick(self.end_line, &base.end_line),
            skip_onset: pick(self.skip_onset, &base.skip_onset),
            skip_offset: pick(self.skip_offset, &base.skip_offset),
            skip: pick(self.skip, &base.skip),
            key_sign: pick(self.key_sign, &base.key_sign),
            item_sign: pick(self.item_sign, &base.item_sign),
            scale_title: pick(self.scale_title, &base.scale_title),
            extract_title: pick(self.extract_title, &base.extract_title),
            item: pick(self.item, &base.item),
            extract_item: pick(self.extract_item, &base.extract_item),
        }
    }
}

/// Block-skip markers: everything from `onset` through `offset` is ignored.
#[derive(Clone, Debug)]
pub struct SkipBlock {
    pub onset: Regex,
    pub offset: Regex,
}

/// Compiled, validated configuration for one measure.
#[derive(Clone, Debug)]
pub struct MeasureConfig {
    pub name: String,
    pub url: String,
    pub default_sign: Sign,
    pub start_line: Regex,
    pub end_line: Regex,
    pub skip_block: Option<SkipBlock>,
    pub skip: Option<Regex>,
    pub key_sign: Option<Regex>,
    pub item_sign: Option<Regex>,
    pub scale_title: Regex,
    pub extract_title: Regex,
    pub item: Regex,
    pub extract_item: Regex,
}

impl MeasureConfig {
    pub fn compile(name: &str, raw: &RawMeasureConfig) -> Result<Self> {
        let p = Patterns { measure: name };

        let default_sign = match raw.default_sign.as_deref() {
            Some(v) => Sign::parse(v).ok_or_else(|| KeyError::InvalidSign {
                measure: s!(name),
                value: s!(v),
            })?,
            None => Sign::Plus,
        };

        let skip_block = match (&raw.skip_onset, &raw.skip_offset) {
            (Some(on), Some(off)) => Some(SkipBlock {
                onset: p.build("skip_onset", on)?,
                offset: p.build("skip_offset", off)?,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(KeyError::config(name, "skip_onset without skip_offset")),
            (None, Some(_)) => return Err(KeyError::config(name, "skip_offset without skip_onset")),
        };

        let cfg = MeasureConfig {
            name: s!(name),
            url: s!(p.required("url", &raw.url)?),
            default_sign,
            start_line: p.build("start_line", p.required("start_line", &raw.start_line)?)?,
            end_line: p.build("end_line", p.required("end_line", &raw.end_line)?)?,
            skip_block,
            skip: p.optional("skip", &raw.skip)?,
            key_sign: p.optional("key_sign", &raw.key_sign)?,
            item_sign: p.optional("item_sign", &raw.item_sign)?,
            scale_title: p.build("scale_title", p.required("scale_title", &raw.scale_title)?)?,
            extract_title: p.build("extract_title", p.required("extract_title", &raw.extract_title)?)?,
            item: p.build("item", p.required("item", &raw.item)?)?,
            extract_item: p.build("extract_item", p.required("extract_item", &raw.extract_item)?)?,
        };

        p.exactly_one_group("extract_title", &cfg.extract_title)?;
        p.exactly_one_group("extract_item", &cfg.extract_item)?;
        if let Some(re) = &cfg.key_sign {
            p.has_group("key_sign", re)?;
        }
        if let Some(re) = &cfg.item_sign {
            p.has_group("item_sign", re)?;
        }
        Ok(cfg)
    }
}

struct Patterns<'a> {
    measure: &'a str,
}

impl<'a> Patterns<'a> {
    fn required<'v>(&self, field: &'static str, value: &'v Option<String>) -> Result<&'v str> {
        value
            .as_deref()
            .ok_or_else(|| KeyError::config(self.measure, format!("missing `{field}`")))
    }

    fn build(&self, field: &'static str, src: &str) -> Result<Regex> {
        RegexBuilder::new(src)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| KeyError::Pattern { measure: s!(self.measure), field, source })
    }

    fn optional(&self, field: &'static str, value: &Option<String>) -> Result<Option<Regex>> {
        value.as_deref().map(|src| self.build(field, src)).transpose()
    }

    // captures_len() counts the implicit whole-match group 0
    fn exactly_one_group(&self, field: &'static str, re: &Regex) -> Result<()> {
        let n = re.captures_len() - 1;
        if n == 1 {
            Ok(())
        } else {
            Err(KeyError::config(
                self.measure,
                format!("`{field}` needs exactly one capture group, found {n}"),
            ))
        }
    }

    fn has_group(&self, field: &'static str, re: &Regex) -> Result<()> {
        if re.captures_len() > 1 {
            Ok(())
        } else {
            Err(KeyError::config(self.measure, format!("`{field}` needs a capture group")))
        }
    }
}

/// Measure name for a config path: the file name up to its first '.'.
pub fn measure_name(path: &Path) -> String {
    let file = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
    s!(file.split('.').next().unwrap_or_default())
}

/// All measure configs in `dir`, sorted by file name, excluding the default config.
pub fn discover(dir: &Path, default_file: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| KeyError::io(dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| KeyError::io(dir, e))?.path();
        if !path.is_file() { continue; }
        if path.extension().and_then(|s| s.to_str()) != Some(CONFIG_EXT) { continue; }
        if path.file_name().and_then(|s| s.to_str()) == Some(default_file) { continue; }
        out.push(path);
    }
    out.sort();
    Ok(out)
}
