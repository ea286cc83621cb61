// src/engine/scanner.rs
//! Measure scanner: walks the ordered cell texts of a scoring-key page and sorts
//! them into scales.
//!
//! ## States
//! ```text
//! SeekingStart --start_line--> Active --skip_onset--> Skipping --skip_offset--> Active
//!                                 \                      |
//!                                  `----end_line-----> Done <--end_line--'
//! ```
//! - The fragment that matches `start_line` is also classified in the same step,
//!   so a page whose first scale title doubles as the start marker still works.
//! - `skip_offset` fragments are consumed; they are not classified.
//!
//! ## Rules in `Active`, first match wins
//! `skip_onset` > `skip` > `key_sign` > `scale_title` > `item`; anything else is dropped.
//!
//! The current sign starts at the measure's `default_sign` and persists until a
//! `key_sign` (or an item's own `item_sign`) changes it.
use regex::Regex;

use crate::config::MeasureConfig;
use crate::core::sanitize::{sanitize, strip_brackets};
use crate::error::{KeyError, Result};
use crate::store::SplitTable;

use super::types::{Scales, Sign};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    SeekingStart,
    Active,
    Skipping,
    Done,
}

pub struct Scanner<'a> {
    config: &'a MeasureConfig,
    split: &'a SplitTable,
    state: ScanState,
    sign: Sign,
    title: Option<String>,
    scales: Scales,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a MeasureConfig, split: &'a SplitTable) -> Self {
        Self {
            config,
            split,
            state: ScanState::SeekingStart,
            sign: config.default_sign,
            title: None,
            scales: Scales::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Process one raw fragment and return the state afterwards.
    pub fn feed(&mut self, raw: &str) -> Result<ScanState> {
        let cfg = self.config;
        let text = sanitize(raw);

        match self.state {
            ScanState::Done => {}
            ScanState::SeekingStart => {
                if cfg.start_line.is_match(&text) {
                    logd!("{}: start at {:?}", cfg.name, text);
                    self.state = ScanState::Active;
                    self.classify(&text)?;
                }
            }
            ScanState::Active => {
                if cfg.end_line.is_match(&text) {
                    logd!("{}: end at {:?}", cfg.name, text);
                    self.state = ScanState::Done;
                } else {
                    self.classify(&text)?;
                }
            }
            ScanState::Skipping => {
                if cfg.end_line.is_match(&text) {
                    logd!("{}: end at {:?} (inside skip block)", cfg.name, text);
                    self.state = ScanState::Done;
                } else if cfg.skip_block.as_ref().is_some_and(|b| b.offset.is_match(&text)) {
                    self.state = ScanState::Active;
                }
            }
        }
        Ok(self.state)
    }

    pub fn finish(self) -> Scales {
        self.scales
    }

    fn classify(&mut self, text: &str) -> Result<()> {
        let cfg = self.config;

        if cfg.skip_block.as_ref().is_some_and(|b| b.onset.is_match(text)) {
            self.state = ScanState::Skipping;
            return Ok(());
        }
        if cfg.skip.as_ref().is_some_and(|re| re.is_match(text)) {
            return Ok(());
        }
        if let Some(re) = &cfg.key_sign {
            if re.is_match(text) {
                self.sign = self.sign_from(re, "key_sign", text)?;
                return Ok(());
            }
        }
        if cfg.scale_title.is_match(text) {
            let title = self.capture(&cfg.extract_title, "extract_title", text)?;
            logd!("{}: scale {:?}", cfg.name, title);
            self.scales.open(&title);
            self.title = Some(title);
            return Ok(());
        }
        if cfg.item.is_match(text) {
            return self.add_item(text);
        }
        Ok(())
    }

    fn add_item(&mut self, text: &str) -> Result<()> {
        let cfg = self.config;
        let Some(title) = self.title.as_deref() else {
            return Err(KeyError::ScanOrder { measure: s!(&cfg.name), text: s!(text) });
        };

        let text = strip_brackets(text);
        let mut item = self.capture(&cfg.extract_item, "extract_item", &text)?;
        if let Some(re) = &cfg.item_sign {
            if re.is_match(&text) {
                self.sign = self.sign_from(re, "item_sign", &text)?;
            }
        }

        let Some(scale) = self.scales.get_mut(title) else {
            return Err(KeyError::ScanOrder { measure: s!(&cfg.name), text });
        };
        if let Some(first) = self.split.first_of(&item) {
            logd!("{}: split {:?} -> {:?} + rest", cfg.name, item, first);
            let rest = s!(item.replacen(first, "", 1).trim());
            scale.push(self.sign, s!(first));
            if rest.is_empty() {
                logw!("{}: split of {:?} leaves nothing after {:?}", cfg.name, item, first);
                return Ok(());
            }
            item = rest;
        }
        scale.push(self.sign, item);
        Ok(())
    }

    fn capture(&self, re: &Regex, field: &'static str, text: &str) -> Result<String> {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| s!(m.as_str()))
            .ok_or_else(|| KeyError::MissingCapture {
                measure: s!(&self.config.name),
                field,
                text: s!(text),
            })
    }

    fn sign_from(&self, re: &Regex, field: &'static str, text: &str) -> Result<Sign> {
        let marker = self.capture(re, field, text)?;
        Sign::parse(&marker).ok_or_else(|| KeyError::InvalidSign {
            measure: s!(&self.config.name),
            value: marker,
        })
    }
}

/// Run the scanner over `fragments` until `end_line` or the end of input.
pub fn scan<S: AsRef<str>>(
    fragments: &[S],
    config: &MeasureConfig,
    split: &SplitTable,
) -> Result<Scales> {
    let mut scanner = Scanner::new(config, split);
    for f in fragments {
        if scanner.feed(f.as_ref())? == ScanState::Done {
            break;
        }
    }
    if scanner.state() == ScanState::SeekingStart {
        logw!("{}: start_line never matched in {} fragments", config.name, fragments.len());
    }
    let scales = scanner.finish();
    logf!("{}: scanned {} scales", config.name, scales.len());
    Ok(scales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawMeasureConfig;

    fn raw() -> RawMeasureConfig {
        RawMeasureConfig {
            url: Some(s!("http://example.org/key.htm")),
            start_line: Some(s!("^Scoring key")),
            end_line: Some(s!("^References")),
            key_sign: Some(s!(r"^([+-]) keyed$")),
            scale_title: Some(s!(":$")),
            extract_title: Some(s!("^(.*?):$")),
            item: Some(s!(r"^[+-]?\s*\d+\.")),
            extract_item: Some(s!(r"^[+-]?\s*\d+\.\s*(.*)$")),
            ..Default::default()
        }
    }

    fn compile(raw: RawMeasureConfig) -> MeasureConfig {
        MeasureConfig::compile("test", &raw).unwrap()
    }

    fn items<'s>(scales: &'s Scales, scale: &str, sign: Sign) -> Vec<&'s str> {
        scales.get(scale).unwrap().items(sign).iter().map(String::as_str).collect()
    }

    #[test]
    fn sign_markers_toggle_current_sign() {
        let cfg = compile(raw());
        let frags = [
            "Scoring key:",
            "Warmth:",
            "+ keyed",
            "1. Item A",
            "- keyed",
            "2. Item B",
            "3. Item C",
        ];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Warmth", Sign::Plus), vec!["Item A"]);
        assert_eq!(items(&scales, "Warmth", Sign::Minus), vec!["Item B", "Item C"]);
    }

    #[test]
    fn inline_sign_prefix_sets_sign_per_item() {
        let cfg = compile(RawMeasureConfig {
            key_sign: None,
            item_sign: Some(s!(r"^([+-])\s")),
            ..raw()
        });
        let frags = ["Scoring key:", "+ 1. Item A", "- 2. Item B"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Scoring key", Sign::Plus), vec!["Item A"]);
        assert_eq!(items(&scales, "Scoring key", Sign::Minus), vec!["Item B"]);
    }

    #[test]
    fn start_fragment_is_also_classified() {
        let cfg = compile(raw());
        let scales = scan(&["Scoring key:", "1. Item A"], &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Scoring key", Sign::Plus), vec!["Item A"]);
    }

    #[test]
    fn fragments_before_start_are_ignored() {
        let cfg = compile(raw());
        let frags = ["Intro:", "9. Not an item", "Scoring key", "Calm:", "1. Item A"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert!(scales.get("Intro").is_none());
        assert_eq!(scales.len(), 1);
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item A"]);
    }

    #[test]
    fn skip_block_hides_everything_until_offset() {
        let cfg = compile(RawMeasureConfig {
            skip_onset: Some(s!("^BEGIN_SKIP")),
            skip_offset: Some(s!("^END_SKIP")),
            ..raw()
        });
        let frags = [
            "Scoring key",
            "Calm:",
            "BEGIN_SKIP",
            "irrelevant line",
            "Bogus title:",
            "8. Bogus item",
            "END_SKIP",
            "3. Item C",
        ];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(scales.len(), 1);
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item C"]);
    }

    #[test]
    fn skip_offset_fragment_is_consumed() {
        let cfg = compile(RawMeasureConfig {
            skip_onset: Some(s!("^BEGIN")),
            skip_offset: Some(s!(r"^4\. END")),
            ..raw()
        });
        let frags = ["Scoring key", "Calm:", "BEGIN", "4. END", "5. Item E"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item E"]);
    }

    #[test]
    fn single_skip_beats_later_rules() {
        let cfg = compile(RawMeasureConfig { skip: Some(s!("^Note")), ..raw() });
        let frags = ["Scoring key", "Calm:", "Note: 1. not an item", "2. Item B"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item B"]);
    }

    #[test]
    fn end_line_stops_the_scan() {
        let cfg = compile(raw());
        let frags = ["Scoring key", "Calm:", "1. Item A", "References", "2. Item B", "Other:"];
        let split = SplitTable::default();
        let mut scanner = Scanner::new(&cfg, &split);
        let states: Vec<ScanState> = frags.iter().map(|f| scanner.feed(f).unwrap()).collect();
        assert_eq!(states[3], ScanState::Done);
        assert_eq!(states[5], ScanState::Done);
        let scales = scanner.finish();
        assert_eq!(scales.len(), 1);
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item A"]);
    }

    #[test]
    fn end_line_applies_inside_skip_block() {
        let cfg = compile(RawMeasureConfig {
            skip_onset: Some(s!("^BEGIN")),
            skip_offset: Some(s!("^END")),
            ..raw()
        });
        let frags = ["Scoring key", "Calm:", "BEGIN", "References", "END", "1. Item A"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert!(scales.get("Calm").unwrap().is_empty());
    }

    #[test]
    fn split_table_turns_one_item_into_two() {
        let cfg = compile(raw());
        let split = SplitTable::from_pairs([(s!("Item D Item E"), s!("Item D"))]);
        let frags = ["Scoring key", "Calm:", "- keyed", "4. Item D Item E", "5. Item F"];
        let scales = scan(&frags, &cfg, &split).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Minus), vec!["Item D", "Item E", "Item F"]);
    }

    #[test]
    fn split_with_nothing_left_adds_only_the_first_part() {
        let cfg = compile(raw());
        let split = SplitTable::from_pairs([(s!("Item D"), s!("Item D"))]);
        let frags = ["Scoring key", "Calm:", "1. Item D", "2. Item E"];
        let scales = scan(&frags, &cfg, &split).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item D", "Item E"]);
    }

    #[test]
    fn brackets_are_stripped_from_items() {
        let cfg = compile(raw());
        let frags = ["Scoring key", "Calm:", "1. Worry about [my] things."];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Worry about my things."]);
    }

    #[test]
    fn reopening_a_title_resets_its_items() {
        let cfg = compile(raw());
        let frags = ["Scoring key", "Calm:", "1. Old", "Warmth:", "2. W", "Calm:", "3. New"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        let names: Vec<&str> = scales.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Calm", "Warmth"]);
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["New"]);
    }

    #[test]
    fn default_sign_applies_until_changed() {
        let cfg = compile(RawMeasureConfig { default_sign: Some(s!("-")), ..raw() });
        let frags = ["Scoring key", "Calm:", "1. Item A", "+ keyed", "2. Item B"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Minus), vec!["Item A"]);
        assert_eq!(items(&scales, "Calm", Sign::Plus), vec!["Item B"]);
    }

    #[test]
    fn sign_persists_across_scales() {
        let cfg = compile(raw());
        let frags = ["Scoring key", "Calm:", "- keyed", "1. A", "Warmth:", "2. B"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Warmth", Sign::Minus), vec!["B"]);
    }

    #[test]
    fn item_before_title_is_scan_order_error() {
        let cfg = compile(raw());
        let err = scan(&["Scoring key", "1. Orphan"], &cfg, &SplitTable::default()).unwrap_err();
        match err {
            KeyError::ScanOrder { measure, text } => {
                assert_eq!(measure, "test");
                assert_eq!(text, "1. Orphan");
            }
            other => panic!("expected scan order error, got {other:?}"),
        }
    }

    #[test]
    fn extractor_without_match_is_missing_capture() {
        // detector accepts "1)" but the extractor only knows "1."
        let cfg = compile(RawMeasureConfig { item: Some(s!(r"^\d+[.)]")), ..raw() });
        let err = scan(&["Scoring key", "Calm:", "1) Item"], &cfg, &SplitTable::default()).unwrap_err();
        assert!(matches!(err, KeyError::MissingCapture { field: "extract_item", .. }));
    }

    #[test]
    fn title_without_extractor_match_is_missing_capture() {
        let cfg = compile(RawMeasureConfig { scale_title: Some(s!("[:;]$")), ..raw() });
        let err = scan(&["Scoring key", "Calm;", "1. Item"], &cfg, &SplitTable::default()).unwrap_err();
        match err {
            KeyError::MissingCapture { field, text, .. } => {
                assert_eq!(field, "extract_title");
                assert_eq!(text, "Calm;");
            }
            other => panic!("expected missing capture, got {other:?}"),
        }
    }

    #[test]
    fn unknown_sign_marker_is_rejected() {
        let cfg = compile(RawMeasureConfig { key_sign: Some(s!(r"^(\S) keyed$")), ..raw() });
        let err = scan(&["Scoring key", "Calm:", "* keyed"], &cfg, &SplitTable::default()).unwrap_err();
        assert!(matches!(err, KeyError::InvalidSign { .. }));
    }

    #[test]
    fn dash_variants_are_sanitized_before_matching() {
        let cfg = compile(raw());
        let frags = ["Scoring key", "Calm:", "\u{2013} keyed", "1. Item A"];
        let scales = scan(&frags, &cfg, &SplitTable::default()).unwrap();
        assert_eq!(items(&scales, "Calm", Sign::Minus), vec!["Item A"]);
    }
}
