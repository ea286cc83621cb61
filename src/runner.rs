// src/runner.rs
use std::path::{Path, PathBuf};

use crate::{
    config::{
        consts::DEFAULT_CONFIG,
        measure::{discover, measure_name},
        MeasureConfig, RawMeasureConfig, RunOptions,
    },
    core::{html::extract_cells, net},
    engine::{build_key, scan, ScoringKey},
    error::{KeyError, Result},
    file::{ensure_directory, write_key},
    progress::Progress,
    store::{SplitTable, Tables},
    xref::cross_reference,
};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    /// (measure, error message) for every measure that produced no file.
    pub failed: Vec<(String, String)>,
}

/// Result of one measure that made it to disk.
struct Written {
    path: PathBuf,
    unmatched: Vec<String>,
}

/// Run every measure config in `opts.config_dir`, one after another.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &RunOptions, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    logf!("Run: configs={} out={} xref={}", opts.config_dir.display(), opts.out_dir.display(), opts.cross_reference);

    let default = RawMeasureConfig::load(&opts.default_config_path())?;
    let tables = Tables::load(opts)?;

    let mut paths = discover(&opts.config_dir, DEFAULT_CONFIG)?;
    if let Some(only) = &opts.only {
        paths.retain(|p| measure_name(p) == *only);
        if paths.is_empty() {
            return Err(KeyError::config(only, format!("no config in {}", opts.config_dir.display())));
        }
    }
    ensure_directory(&opts.out_dir)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(paths.len());
    }

    let mut summary = RunSummary::default();
    for path in paths {
        let name = measure_name(&path);
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Processing {name}..."));
        }

        match process_measure(&name, &path, &default, &tables, opts) {
            Ok(done) => {
                if !done.unmatched.is_empty() {
                    let msg = format!(
                        "{name}: {} items without IPIP id: {}",
                        done.unmatched.len(),
                        done.unmatched.join(" | ")
                    );
                    logw!("{msg}");
                    if let Some(p) = progress.as_deref_mut() {
                        p.log(&msg);
                    }
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&name, &done.path);
                }
                summary.written.push(done.path);
            }
            Err(e) => {
                loge!("{name}: {e}");
                if opts.fail_fast {
                    if let Some(p) = progress.as_deref_mut() {
                        p.finish();
                    }
                    return Err(e);
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&name, &e.to_string());
                }
                summary.failed.push((name, e.to_string()));
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    logf!("Run: {} written, {} failed", summary.written.len(), summary.failed.len());
    Ok(summary)
}

fn process_measure(
    name: &str,
    path: &Path,
    default: &RawMeasureConfig,
    tables: &Tables,
    opts: &RunOptions,
) -> Result<Written> {
    let raw = RawMeasureConfig::load(path)?.merged_over(default);
    let config = MeasureConfig::compile(name, &raw)?;

    logf!("{name}: GET {}", config.url);
    let html = net::http_get(&config.url)?;
    let key = key_from_html(&html, &config, &tables.split)?;

    let xref = tables.ipip.as_ref().map(|ipip| cross_reference(&key, ipip, &tables.remap));
    let path = write_key(&opts.key_path(name), &key, xref.as_ref())?;

    Ok(Written {
        path,
        unmatched: xref.map(|x| x.unmatched).unwrap_or_default(),
    })
}

/// Offline part of a measure: page markup in, scoring key out.
pub fn key_from_html(html: &str, config: &MeasureConfig, split: &SplitTable) -> Result<ScoringKey> {
    let cells = extract_cells(html);
    logd!("{}: {} cells with text", config.name, cells.len());
    let scales = scan(&cells, config, split)?;
    let key = build_key(&scales);
    logf!("{}: {} items x {} scales", config.name, key.rows(), key.scales.len());
    Ok(key)
}
