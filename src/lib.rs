//! # Chapter Reader
//!
//! A terminal reader for multi-directory book projects. A book root holds one
//! `chapter-NN` directory per chapter, each mixing final content with drafts,
//! research and notes. The reader works out, for every chapter, the one file
//! that *is* the chapter, and lets you move through the result.
//!
//! # Architecture: Resolve, Index, Navigate
//!
//! ```text
//! 1. Classify   directory name  →  DirectoryCategory   (content? drafts? notes?)
//! 2. Resolve    chapter-NN/     →  one .md file         (filename priority tiers)
//! 3. Index      book root       →  ChapterIndex         (ordered, immutable)
//! 4. Navigate   ChapterIndex    →  NavigationState      (position only)
//! ```
//!
//! Each step is usable and testable on its own. The index is built once per
//! scan and never mutated; navigation borrows it and holds nothing but a
//! position, so a session is simply an index plus a state value. There is no
//! process-wide "current book".
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Directory name → category (`content`, `drafts`, `research`, ...) |
//! | [`naming`] | `chapter-NN` directory name parser |
//! | [`resolve`] | Picks the authoritative file of one chapter directory |
//! | [`title`] | Title and section extraction from markdown text |
//! | [`index`] | Scans the book root into a [`index::ChapterIndex`] |
//! | [`navigation`] | Next / previous / jump over the index |
//! | [`config`] | `reader.toml` loading, merging and validation |
//! | [`session`] | Interactive command grammar |
//! | [`output`] | Pure formatting of the index and markdown for the terminal |
//!
//! # Design Decisions
//!
//! ## Only `content/` Counts
//!
//! A chapter without a `content/` directory does not exist as far as the
//! reader is concerned, however many drafts it has. In-progress material can
//! live next to final text without ever surfacing, and without ever being an
//! error.
//!
//! ## Priority as Data
//!
//! `complete.md` > `enhanced.md` > `revised.md` > any other `.md` is
//! expressed as one ordered table, [`resolve::PRIORITY_TIERS`], rather than a
//! chain of string checks. Ties inside a tier break on filename, so the same
//! tree always resolves the same way.
//!
//! ## Boundaries Are Not Errors
//!
//! `next()` on the last chapter returns that chapter together with
//! [`navigation::Boundary::AtEnd`]. Errors are reserved for requests that
//! cannot be satisfied: a chapter that is not in the index, or a book with no
//! chapters at all.

pub mod classify;
pub mod config;
pub mod index;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod resolve;
pub mod session;
pub mod title;

#[cfg(test)]
pub(crate) mod test_helpers;
