// src/cli.rs
use std::{env, path::{Path, PathBuf}};

use crate::config::{consts::LOG_NAME, RunOptions, TableSource};
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

/// Prints progress to stderr.
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, measure: &str, path: &Path) {
        self.done += 1;
        eprintln!("[{}/{}] {} -> {}", self.done, self.total, measure, path.display());
    }

    fn item_failed(&mut self, measure: &str, err: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {} FAILED: {}", self.done, self.total, measure, err);
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let opts = parse_args(env::args().skip(1))?;
    crate::log::init(&opts.out_dir.join(LOG_NAME));

    let mut progress = CliProgress { total: 0, done: 0 };
    let summary: RunSummary = runner::run(&opts, Some(&mut progress))?;

    println!("Wrote {} key(s) to {}", summary.written.len(), opts.out_dir.display());
    if !summary.failed.is_empty() {
        let names: Vec<&str> = summary.failed.iter().map(|(n, _)| n.as_str()).collect();
        return Err(format!("{} measure(s) failed: {}", names.len(), names.join(", ")).into());
    }
    Ok(())
}

pub fn parse_args<I: IntoIterator<Item = String>>(
    args: I,
) -> Result<RunOptions, Box<dyn std::error::Error + Send + Sync>> {
    let mut opts = RunOptions::default();
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--configs" => opts.config_dir = PathBuf::from(args.next().ok_or("Missing value for --configs")?),
            "-o" | "--out" => opts.out_dir = PathBuf::from(args.next().ok_or("Missing output directory")?),
            "-m" | "--measure" => opts.only = Some(args.next().ok_or("Missing measure name")?),
            "--xref" => opts.cross_reference = true,
            "--no-xref" => opts.cross_reference = false,
            "--ipip" => {
                let v = args.next().ok_or("Missing value for --ipip")?;
                opts.ipip_table = TableSource::Explicit(PathBuf::from(v));
                opts.cross_reference = true; }
            "--remap" => opts.remap_table = TableSource::Explicit(PathBuf::from(args.next().ok_or("Missing value for --remap")?)),
            "--split" => opts.split_table = TableSource::Explicit(PathBuf::from(args.next().ok_or("Missing value for --split")?)),
            "--fail-fast" => opts.fail_fast = true,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }
    Ok(opts)
}
