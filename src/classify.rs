//! Directory category classification.
//!
//! Every directory found inside a chapter directory (or at the book root) is
//! tagged with a [`DirectoryCategory`]. Only `content/` and
//! `master-documents/` may ever contribute a resolved file; everything else
//! exists on disk but is skipped.
//!
//! ## Matching
//!
//! Matching is case-sensitive. A name belongs to a category when it equals the
//! category key, or starts with the key followed by `-` or `_`:
//!
//! - `content` → `Content`
//! - `research-2024` → `Research`
//! - `drafts_old` → `Drafts`
//! - `contents` → `Other` (no separator after the key)
//! - `Content` → `Other` (case-sensitive)
//!
//! Unknown directories classify as `Other` and are never scanned, so incidental
//! files lying around a chapter tree are not picked up by accident.

use serde::Serialize;

/// Category tag attached to a directory by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryCategory {
    Content,
    MasterDocuments,
    Research,
    Drafts,
    ProjectManagement,
    Background,
    Notes,
    Tasks,
    Other,
}

impl DirectoryCategory {
    /// Whether this category may contribute a resolved file.
    pub fn is_included(self) -> bool {
        matches!(self, Self::Content | Self::MasterDocuments)
    }
}

/// Fixed name → category table. `master-documents` and `project-management`
/// contain a dash themselves, so they are listed whole.
const CATEGORY_KEYS: &[(&str, DirectoryCategory)] = &[
    ("content", DirectoryCategory::Content),
    ("master-documents", DirectoryCategory::MasterDocuments),
    ("research", DirectoryCategory::Research),
    ("drafts", DirectoryCategory::Drafts),
    ("project-management", DirectoryCategory::ProjectManagement),
    ("background", DirectoryCategory::Background),
    ("notes", DirectoryCategory::Notes),
    ("tasks", DirectoryCategory::Tasks),
];

/// Classify a directory name. Total: every input maps to exactly one category.
pub fn classify(name: &str) -> DirectoryCategory {
    CATEGORY_KEYS
        .iter()
        .find(|(key, _)| matches_key(name, key))
        .map(|&(_, category)| category)
        .unwrap_or(DirectoryCategory::Other)
}

fn matches_key(name: &str, key: &str) -> bool {
    match name.strip_prefix(key) {
        Some("") => true,
        Some(rest) => rest.starts_with('-') || rest.starts_with('_'),
        None => false,
    }
}
