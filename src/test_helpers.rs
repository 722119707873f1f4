//! Shared test utilities for the chapter-reader test suite.
//!
//! Provides fixture-tree builders and lookup helpers for index data
//! structures (`ChapterIndex`, `ResolvedChapter`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_book();
//! let index = ChapterIndex::build(tmp.path()).unwrap();
//!
//! assert_eq!(chapter_numbers(&index), vec![1, 2, 4]);
//! assert_eq!(find_chapter(&index, 2).title, "Working With Agents");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::index::{ChapterIndex, ResolvedChapter};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Create a directory (and parents).
pub fn make_dir(path: &Path) {
    fs::create_dir_all(path).unwrap();
}

/// Build a small book tree in a temp directory and return it.
///
/// ```text
/// chapter-01/content/chapter-01-complete.md   "# The Augmented Programmer"
/// chapter-01/content/chapter-01-revised.md
/// chapter-01/drafts/chapter-01-complete.md
/// chapter-02/content/chapter-02.md            "# Working With Agents"
/// chapter-03/research/notes.md                → unresolved
/// chapter-04/content/chapter-04-enhanced.md   (no heading → "Chapter 4")
/// master-documents/complete-manuscript.md     "# Complete Manuscript Draft"
/// project-management/plan.md
/// ```
pub fn setup_book() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_file(
        &root.join("chapter-01/content/chapter-01-complete.md"),
        "# The Augmented Programmer\n\n## Why now\n\nText.\n",
    );
    write_file(
        &root.join("chapter-01/content/chapter-01-revised.md"),
        "# Older Title\n",
    );
    write_file(
        &root.join("chapter-01/drafts/chapter-01-complete.md"),
        "# Draft Title\n",
    );
    write_file(
        &root.join("chapter-02/content/chapter-02.md"),
        "# Working With Agents\n",
    );
    write_file(&root.join("chapter-03/research/notes.md"), "# Notes\n");
    write_file(
        &root.join("chapter-04/content/chapter-04-enhanced.md"),
        "No heading here.\n",
    );
    write_file(
        &root.join("master-documents/complete-manuscript.md"),
        "# Complete Manuscript Draft\n",
    );
    write_file(&root.join("project-management/plan.md"), "# Plan\n");

    tmp
}

// =========================================================================
// Index lookups (panic with a clear message on miss)
// =========================================================================

/// Find a chapter by number. Panics if not found.
pub fn find_chapter(index: &ChapterIndex, number: u8) -> &ResolvedChapter {
    index.by_number(number).unwrap_or_else(|| {
        let numbers = chapter_numbers(index);
        panic!("chapter {number} not found. Available: {numbers:?}")
    })
}

/// All chapter numbers in sequence order.
pub fn chapter_numbers(index: &ChapterIndex) -> Vec<u8> {
    index.sequence().iter().map(|c| c.number).collect()
}

/// All chapter titles in sequence order.
pub fn chapter_titles(index: &ChapterIndex) -> Vec<&str> {
    index.sequence().iter().map(|c| c.title.as_str()).collect()
}

/// Filename of a chapter's resolved source.
pub fn source_name(chapter: &ResolvedChapter) -> String {
    chapter
        .source_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string()
}
