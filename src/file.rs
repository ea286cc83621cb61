// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::consts::{ID_COLUMN, ITEM_COLUMN, KEY_SEP};
use crate::csv::write_row;
use crate::engine::ScoringKey;
use crate::error::{KeyError, Result};
use crate::xref::CrossRef;

/// Header + one row per item: `item [ipip_id] scale...`, values as -1/0/1.
pub fn key_rows(key: &ScoringKey, ids: Option<&CrossRef>) -> Vec<Vec<String>> {
    let mut header = vec![s!(ITEM_COLUMN)];
    if ids.is_some() { header.push(s!(ID_COLUMN)); }
    header.extend(key.scales.iter().cloned());

    let mut rows = Vec::with_capacity(key.rows() + 1);
    rows.push(header);
    for (r, item) in key.items.iter().enumerate() {
        let mut row = Vec::with_capacity(key.scales.len() + 2);
        row.push(item.clone());
        if let Some(x) = ids {
            row.push(x.ids.get(r).cloned().flatten().unwrap_or_default());
        }
        row.extend(key.values[r].iter().map(|v| v.to_string()));
        rows.push(row);
    }
    rows
}

/// Write the key as TSV to `path`, creating parent directories. Returns `path`.
/// Either the whole key lands at `path` or `path` is left as it was.
pub fn write_key(path: &Path, key: &ScoringKey, ids: Option<&CrossRef>) -> Result<PathBuf> {
    let rows = key_rows(key, ids);
    write_replacing(path, |out| {
        for row in &rows {
            write_row(&mut *out, &row[..], KEY_SEP)?;
        }
        Ok(())
    })?;
    logf!("Key: wrote {} rows x {} scales -> {}", key.rows(), key.scales.len(), path.display());
    Ok(path.to_path_buf())
}

/// Sibling of `path` that is written first and renamed over it.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Run `fill` against `path.part`, then rename it onto `path`. On any error the
/// part file is removed and `path` is untouched.
fn write_replacing<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let part = part_path(path);

    let written = File::create(&part).and_then(|file| {
        let mut out = BufWriter::new(file);
        fill(&mut out)?;
        out.flush()?;
        out.get_ref().sync_all()
    });
    let done = written.and_then(|()| fs::rename(&part, path));
    if let Err(e) = done {
        let _ = fs::remove_file(&part);
        return Err(KeyError::io(path, e));
    }
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(KeyError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir).map_err(|e| KeyError::io(dir, e))?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ScoringKey {
        ScoringKey {
            items: vec![s!("Feel blue."), s!("Am calm.")],
            scales: vec![s!("N1"), s!("N2")],
            values: vec![vec![1, 0], vec![-1, 1]],
        }
    }

    #[test]
    fn rows_without_ids() {
        let rows = key_rows(&key(), None);
        assert_eq!(rows[0], vec!["item", "N1", "N2"]);
        assert_eq!(rows[1], vec!["Feel blue.", "1", "0"]);
        assert_eq!(rows[2], vec!["Am calm.", "-1", "1"]);
    }

    #[test]
    fn id_column_follows_item_column() {
        let x = CrossRef { ids: vec![Some(s!("N12")), None], unmatched: vec![s!("Am calm.")] };
        let rows = key_rows(&key(), Some(&x));
        assert_eq!(rows[0], vec!["item", "ipip_id", "N1", "N2"]);
        assert_eq!(rows[1], vec!["Feel blue.", "N12", "1", "0"]);
        assert_eq!(rows[2], vec!["Am calm.", "", "-1", "1"]);
    }

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn write_key_replaces_existing_file() {
        let dir = tmp_dir("keyscrape_file_replace");
        let path = dir.join("neo.tsv");
        fs::write(&path, "stale").unwrap();
        write_key(&path, &key(), None).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("item\tN1\tN2\n"));
        assert!(!part_path(&path).exists());
    }

    #[test]
    fn failed_write_leaves_no_new_file() {
        let dir = tmp_dir("keyscrape_file_fail_new");
        let path = dir.join("neo.tsv");
        let err = write_replacing(&path, |out| {
            out.write_all(b"item\tN1\n")?;
            Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"))
        })
        .unwrap_err();
        assert!(matches!(err, KeyError::Io { .. }));
        assert!(!path.exists());
        assert!(!part_path(&path).exists());
    }

    #[test]
    fn failed_write_keeps_previous_key() {
        let dir = tmp_dir("keyscrape_file_fail_old");
        let path = dir.join("neo.tsv");
        write_key(&path, &key(), None).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let result = write_replacing(&path, |out| {
            out.write_all(b"item\n")?;
            Err(std::io::Error::other("write failed"))
        });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(!part_path(&path).exists());
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let p = std::env::temp_dir().join("keyscrape_not_a_dir");
        fs::write(&p, "x").unwrap();
        assert!(ensure_directory(&p).is_err());
    }
}
