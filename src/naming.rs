//! Parsing for the `chapter-NN` directory convention.
//!
//! A book root contains one directory per chapter, named `chapter-` followed
//! by exactly two ASCII digits. The convention is fixed and not configurable.
//!
//! Two questions are asked of every root-level directory name:
//!
//! - Does it match the pattern at all? Any match proves the root is a book
//!   root, even when nothing inside resolves.
//! - Is its number in the readable range `01..=12`? Only those are resolved.
//!   `chapter-00` (the introduction) and anything above 12 are recognized
//!   but never become numbered chapters.

/// Lowest chapter number that can be resolved.
pub const MIN_CHAPTER: u8 = 1;
/// Highest chapter number that can be resolved.
pub const MAX_CHAPTER: u8 = 12;

const CHAPTER_PREFIX: &str = "chapter-";

/// Result of parsing a directory name like `chapter-07`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterDirName {
    /// Two-digit number after the prefix (`7` from `chapter-07`).
    pub number: u8,
}

impl ChapterDirName {
    /// Whether this chapter number is in the readable range.
    pub fn is_readable(&self) -> bool {
        (MIN_CHAPTER..=MAX_CHAPTER).contains(&self.number)
    }
}

/// Parse a directory name following the `chapter-NN` convention.
///
/// - `"chapter-01"` → `Some(number=1)`
/// - `"chapter-12"` → `Some(number=12)`
/// - `"chapter-00"` → `Some(number=0)` (recognized, not readable)
/// - `"chapter-1"` → `None` (one digit)
/// - `"chapter-001"` → `None` (three digits)
/// - `"chapter-01-draft"` → `None`
/// - `"Chapter-01"` → `None`
pub fn parse_chapter_dir(name: &str) -> Option<ChapterDirName> {
    let digits = name.strip_prefix(CHAPTER_PREFIX)?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|number| ChapterDirName { number })
}
