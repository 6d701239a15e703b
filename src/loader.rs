//! Data directory loader.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::lexer;

/// One loaded source file: the list name plus its rules in file order.
#[derive(Debug)]
pub struct RawList {
    /// Upper-cased file base name
    pub name: String,
    /// Entries in source order
    pub entries: Vec<Entry>,
}

/// Load every regular file directly under `dir`, in sorted file-name order.
///
/// Subdirectories are skipped. The order only matters for reproducible
/// error reporting; the polisher re-sorts all entries later.
pub fn load_dir(dir: &Path) -> Result<Vec<RawList>> {
    let mut paths = Vec::new();
    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        if dirent.file_type()?.is_file() {
            paths.push(dirent.path());
        }
    }
    paths.sort();

    let mut lists = Vec::with_capacity(paths.len());
    for path in &paths {
        lists.push(load_file(path)?);
    }
    Ok(lists)
}

/// Load a single source file.
pub fn load_file(path: &Path) -> Result<RawList> {
    let name = list_name(path)?;
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match lexer::lex_line(&line) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(source) => {
                return Err(Error::Parse {
                    file: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })
            }
        }
    }

    Ok(RawList { name, entries })
}

/// Derive the list name from the file base name.
fn list_name(path: &Path) -> Result<String> {
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Name(path.display().to_string()))?;
    let name = base.to_ascii_uppercase();
    if !lexer::is_valid_list_name(&name) {
        return Err(Error::Name(base.to_string()));
    }
    Ok(name)
}
