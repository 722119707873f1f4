//! Content resolution for a single chapter directory.
//!
//! A chapter directory typically looks like this:
//!
//! ```text
//! chapter-03/
//! ├── content/                       # Only this category is searched
//! │   ├── draft-v1.md
//! │   ├── chapter-03-revised.md
//! │   └── chapter-03-complete.md     # ← resolved
//! ├── drafts/                        # Skipped
//! ├── research/                      # Skipped
//! └── notes/                         # Skipped
//! ```
//!
//! ## Algorithm
//!
//! 1. Classify the immediate subdirectories and keep those classified as
//!    [`DirectoryCategory::Content`]. `master-documents/` is never used at
//!    chapter scope.
//! 2. No content directory means the chapter is unresolved. Draft-only
//!    chapters stay invisible to the reader.
//! 3. Collect the `.md` files inside the content directories.
//! 4. Rank them with [`PRIORITY_TIERS`] and return the best one.
//!
//! Resolution only lists directories; it never reads file contents.

use crate::classify::{DirectoryCategory, classify};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("cannot list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Filename priority tier. Lower variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileTier {
    Complete,
    Enhanced,
    Revised,
    Plain,
}

/// Ordered suffix table, most specific first. Any `.md` file matching none of
/// these is [`FileTier::Plain`].
pub const PRIORITY_TIERS: &[(&str, FileTier)] = &[
    ("complete.md", FileTier::Complete),
    ("enhanced.md", FileTier::Enhanced),
    ("revised.md", FileTier::Revised),
];

/// Tier of a filename. Suffixes compare ASCII case-insensitively.
pub fn tier_of(filename: &str) -> FileTier {
    let lower = filename.to_ascii_lowercase();
    PRIORITY_TIERS
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|&(_, tier)| tier)
        .unwrap_or(FileTier::Plain)
}

/// Pick the highest-priority file from a candidate list.
///
/// Sort key is `(tier, filename, full path)`, so the result does not depend on
/// the order in which the filesystem listed the candidates.
pub fn pick_best(files: &[PathBuf]) -> Option<PathBuf> {
    files
        .iter()
        .min_by(|a, b| rank_key(a).cmp(&rank_key(b)).then_with(|| a.cmp(b)))
        .cloned()
}

fn rank_key(path: &Path) -> (FileTier, String) {
    let name = file_name(path);
    (tier_of(&name), name)
}

/// Resolve the authoritative content file of one chapter directory.
///
/// Returns `Ok(None)` when the chapter has no `content/` directory or no
/// markdown inside it.
pub fn resolve(chapter_dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
    let content_dirs: Vec<PathBuf> = list_entries(chapter_dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter(|p| classify(&file_name(p)) == DirectoryCategory::Content)
        .collect();

    if content_dirs.is_empty() {
        debug!(dir = %chapter_dir.display(), "no content directory");
        return Ok(None);
    }

    let best = resolve_in(&content_dirs)?;
    if best.is_none() {
        debug!(dir = %chapter_dir.display(), "content directory has no markdown");
    }
    Ok(best)
}

/// Rank the markdown files directly inside `dirs`, without any category
/// filtering. Shared by chapter resolution and the root-level overview.
pub fn resolve_in(dirs: &[PathBuf]) -> Result<Option<PathBuf>, ResolveError> {
    let mut candidates = Vec::new();
    for dir in dirs {
        candidates.extend(markdown_files(dir)?);
    }
    Ok(pick_best(&candidates))
}

/// Sorted, non-hidden entries of a directory.
pub(crate) fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let io_err = |source: std::io::Error| ResolveError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !file_name(&path).starts_with('.') {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    Ok(list_entries(dir)?
        .into_iter()
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect())
}
