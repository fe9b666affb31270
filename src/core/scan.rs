//! Input file discovery
//!
//! [`scan`] walks a directory tree and returns every file whose extension
//! matches the configured record extension, case-insensitively, optionally
//! bounded in depth. [`collect_inputs`] turns the paths given on the command
//! line into candidates.

use crate::domain::{CandidateFile, Result, ScrublineError};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists record files under `root`
///
/// A file directly inside `root` has depth 0. With `max_depth = Some(n)` only
/// files at depth `<= n` qualify; `None` means unlimited. A missing root
/// yields an empty list, and a root that is itself a matching file yields that
/// file at depth 0. Unreadable entries are logged and skipped. Order is
/// unspecified.
pub fn scan(root: &Path, max_depth: Option<usize>, extension: &str) -> Vec<CandidateFile> {
    if !root.exists() {
        tracing::debug!(root = %root.display(), "Scan root does not exist");
        return Vec::new();
    }

    let root = absolute(root);

    if root.is_file() {
        return if has_extension(&root, extension) {
            vec![CandidateFile::new(root, 0)]
        } else {
            Vec::new()
        };
    }

    let mut walker = WalkDir::new(&root).min_depth(1);
    if let Some(depth) = max_depth {
        // walkdir counts the root as 0 and its direct children as 1
        walker = walker.max_depth(depth.saturating_add(1));
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(CandidateFile::new(
                entry.path().to_path_buf(),
                entry.depth().saturating_sub(1),
            ));
        }
    }

    tracing::debug!(root = %root.display(), found = files.len(), "Scan finished");
    files
}

/// Turns explicit input paths into candidates
///
/// Directories are scanned like a batch root; files are taken as given
/// whatever their extension; `-` reads one path per line from `stdin`.
///
/// # Errors
///
/// A path that does not exist, or a `-` that yields no paths, is a
/// [`ScrublineError::Setup`]; nothing has been dispatched at that point.
pub fn collect_inputs(
    inputs: &[PathBuf],
    max_depth: Option<usize>,
    extension: &str,
    stdin: impl BufRead,
) -> Result<Vec<CandidateFile>> {
    let mut expanded: Vec<PathBuf> = Vec::new();
    let mut stdin = Some(stdin);

    for input in inputs {
        if input.as_os_str() == "-" {
            if let Some(reader) = stdin.take() {
                let before = expanded.len();
                expanded.extend(
                    reader
                        .lines()
                        .map_while(std::result::Result::ok)
                        .map(|line| line.trim().to_string())
                        .filter(|line| !line.is_empty())
                        .map(PathBuf::from),
                );
                if expanded.len() == before {
                    return Err(ScrublineError::Setup(
                        "No input paths read from stdin".to_string(),
                    ));
                }
            }
            continue;
        }
        expanded.push(input.clone());
    }

    let mut files = Vec::new();
    for path in expanded {
        if path.is_dir() {
            files.extend(scan(&path, max_depth, extension));
        } else if path.is_file() {
            files.push(CandidateFile::new(absolute(&path), 0));
        } else {
            return Err(ScrublineError::Setup(format!(
                "Input path does not exist: {}",
                path.display()
            )));
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::env::current_dir().map(|cwd| cwd.join(path)))
        .unwrap_or_else(|_| path.to_path_buf())
}
