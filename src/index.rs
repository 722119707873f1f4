//! Book scanning and the chapter index.
//!
//! Scans a book root once and produces an immutable [`ChapterIndex`]: the
//! ordered, navigable sequence of chapters that resolved to content, plus the
//! optional [`BookOverview`].
//!
//! ## Book Layout
//!
//! ```text
//! augmented-programmer/              # Book root
//! ├── reader.toml                    # Reader configuration (optional)
//! ├── master-documents/              # Overview (same filename priority)
//! │   └── complete-manuscript.md
//! ├── chapter-01/
//! │   ├── content/
//! │   │   └── chapter-01-complete.md # ← chapter 1
//! │   └── drafts/
//! ├── chapter-02/
//! │   └── research/                  # No content/ → chapter 2 is absent
//! ├── chapter-03/
//! │   └── content/
//! │       └── chapter-03.md          # ← chapter 3
//! └── project-management/            # Ignored
//! ```
//!
//! ## Failure Semantics
//!
//! - A root that is missing, or that has no `chapter-NN` directory at all, is
//!   [`IndexError::RootNotFound`]: the wrong root was supplied.
//! - A chapter directory that resolves to nothing is silently left out of the
//!   sequence. Absent chapters are not placeholder-filled.
//! - A resolved file that cannot be read as UTF-8 aborts the whole build.
//!   Partial indexes are never returned.

use crate::classify::{DirectoryCategory, classify};
use crate::naming::parse_chapter_dir;
use crate::resolve::{self, ResolveError, file_name, list_entries};
use crate::title::{Section, TitleParser, outline};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Title used for the overview when its file has no heading.
pub const OVERVIEW_FALLBACK_TITLE: &str = "Complete Manuscript";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("book root not found or has no chapter-NN directories: {0}")]
    RootNotFound(PathBuf),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One chapter after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedChapter {
    /// Chapter number, 1–12.
    pub number: u8,
    /// The single file chosen as this chapter's content.
    pub source_path: PathBuf,
    /// First top-level heading, or `"Chapter {number}"`.
    pub title: String,
}

impl ResolvedChapter {
    /// Full UTF-8 text of the source file.
    pub fn read_content(&self) -> Result<String, IndexError> {
        read_text(&self.source_path)
    }

    /// Section headings (`##` to `####`) of the chapter.
    pub fn outline(&self) -> Result<Vec<Section>, IndexError> {
        Ok(outline(&self.read_content()?))
    }
}

/// Book-wide entry point resolved from the root-level `master-documents/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookOverview {
    pub source_path: PathBuf,
    pub title: String,
}

impl BookOverview {
    pub fn read_content(&self) -> Result<String, IndexError> {
        read_text(&self.source_path)
    }
}

/// Table-of-contents row: `(number, title)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub number: u8,
    pub title: String,
}

/// Ordered, immutable collection of resolved chapters.
#[derive(Debug, Clone)]
pub struct ChapterIndex {
    root: PathBuf,
    chapters: Vec<ResolvedChapter>,
    overview: Option<BookOverview>,
    titles: TitleParser,
}

impl ChapterIndex {
    /// Scan `root` with the default line-based title extraction.
    pub fn build(root: &Path) -> Result<Self, IndexError> {
        Self::build_with(root, TitleParser::default())
    }

    /// Scan `root`, extracting titles with the given parser.
    pub fn build_with(root: &Path, titles: TitleParser) -> Result<Self, IndexError> {
        if !root.is_dir() {
            return Err(IndexError::RootNotFound(root.to_path_buf()));
        }

        let subdirs: Vec<PathBuf> = list_entries(root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect();

        let chapter_dirs: Vec<_> = subdirs
            .iter()
            .filter_map(|dir| parse_chapter_dir(&file_name(dir)).map(|name| (name, dir)))
            .collect();

        if chapter_dirs.is_empty() {
            return Err(IndexError::RootNotFound(root.to_path_buf()));
        }

        let extractor = titles.extractor();
        let mut chapters = Vec::new();
        for (name, dir) in chapter_dirs {
            if !name.is_readable() {
                debug!(dir = %dir.display(), "chapter number out of range, skipping");
                continue;
            }
            let Some(source_path) = resolve::resolve(dir)? else {
                debug!(chapter = name.number, "unresolved, omitted from sequence");
                continue;
            };
            let text = read_text(&source_path)?;
            let title = extractor
                .extract(&text)
                .unwrap_or_else(|| format!("Chapter {}", name.number));
            chapters.push(ResolvedChapter {
                number: name.number,
                source_path,
                title,
            });
        }
        chapters.sort_by_key(|c| c.number);

        let master_dirs: Vec<PathBuf> = subdirs
            .into_iter()
            .filter(|dir| classify(&file_name(dir)) == DirectoryCategory::MasterDocuments)
            .collect();
        let overview = match resolve::resolve_in(&master_dirs)? {
            Some(source_path) => {
                let text = read_text(&source_path)?;
                let title = extractor
                    .extract(&text)
                    .unwrap_or_else(|| OVERVIEW_FALLBACK_TITLE.to_string());
                Some(BookOverview { source_path, title })
            }
            None => None,
        };

        info!(
            root = %root.display(),
            chapters = chapters.len(),
            overview = overview.is_some(),
            "book indexed"
        );

        Ok(Self {
            root: root.to_path_buf(),
            chapters,
            overview,
            titles,
        })
    }

    /// Build a fresh index from the same root and title parser.
    pub fn rescan(&self) -> Result<Self, IndexError> {
        Self::build_with(&self.root, self.titles)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolved chapters, strictly increasing by number.
    pub fn sequence(&self) -> &[ResolvedChapter] {
        &self.chapters
    }

    pub fn by_number(&self, number: u8) -> Option<&ResolvedChapter> {
        self.position_of(number).map(|pos| &self.chapters[pos])
    }

    /// Position of a chapter number within [`sequence`](Self::sequence).
    pub fn position_of(&self, number: u8) -> Option<usize> {
        self.chapters
            .binary_search_by_key(&number, |c| c.number)
            .ok()
    }

    pub fn overview(&self) -> Option<&BookOverview> {
        self.overview.as_ref()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn table_of_contents(&self) -> Vec<TocEntry> {
        self.chapters
            .iter()
            .map(|c| TocEntry {
                number: c.number,
                title: c.title.clone(),
            })
            .collect()
    }
}

fn read_text(path: &Path) -> Result<String, IndexError> {
    fs::read_to_string(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn build_finds_resolvable_chapters() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        assert_eq!(chapter_numbers(&index), vec![1, 2, 4]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn content_dir_wins_over_drafts() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        let one = find_chapter(&index, 1);
        assert!(one.source_path.ends_with("chapter-01/content/chapter-01-complete.md"));
        assert_eq!(one.title, "The Augmented Programmer");
    }

    #[test]
    fn missing_heading_falls_back_to_chapter_number() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        assert_eq!(find_chapter(&index, 4).title, "Chapter 4");
    }

    #[test]
    fn research_only_chapter_is_absent() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        assert!(index.by_number(3).is_none());
        assert_eq!(index.position_of(3), None);
    }

    #[test]
    fn overview_resolved_from_master_documents() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        let overview = index.overview().unwrap();
        assert_eq!(overview.title, "Complete Manuscript Draft");
        assert!(overview.source_path.ends_with("complete-manuscript.md"));
    }

    #[test]
    fn overview_fallback_title() {
        let tmp = TempDir::new().unwrap();
        make_dir(&tmp.path().join("chapter-01"));
        write_file(&tmp.path().join("master-documents/book.md"), "no heading");

        let index = ChapterIndex::build(tmp.path()).unwrap();
        assert_eq!(index.overview().unwrap().title, OVERVIEW_FALLBACK_TITLE);
    }

    #[test]
    fn no_overview_without_master_documents() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("chapter-01/content/c.md"), "# One");

        let index = ChapterIndex::build(tmp.path()).unwrap();
        assert!(index.overview().is_none());
    }

    #[test]
    fn sequence_strictly_increasing() {
        let tmp = TempDir::new().unwrap();
        for n in [12, 3, 7, 1] {
            write_file(
                &tmp.path().join(format!("chapter-{n:02}/content/c.md")),
                &format!("# Chapter Title {n}"),
            );
        }

        let index = ChapterIndex::build(tmp.path()).unwrap();
        assert_eq!(chapter_numbers(&index), vec![1, 3, 7, 12]);
    }

    #[test]
    fn out_of_range_chapter_dirs_recognized_but_skipped() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("chapter-00/content/intro.md"), "# Intro");
        write_file(&tmp.path().join("chapter-13/content/extra.md"), "# Extra");

        let index = ChapterIndex::build(tmp.path()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn excluded_only_chapter_gives_empty_sequence_not_error() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("chapter-01/research/r.md"), "# R");
        write_file(&tmp.path().join("chapter-01/drafts/d.md"), "# D");

        let index = ChapterIndex::build(tmp.path()).unwrap();
        assert!(index.sequence().is_empty());
    }

    #[test]
    fn root_without_chapter_dirs_is_root_not_found() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("content/c.md"), "# C");
        make_dir(&tmp.path().join("chapter-1"));
        make_dir(&tmp.path().join("Chapter-01"));

        let result = ChapterIndex::build(tmp.path());
        assert!(matches!(result, Err(IndexError::RootNotFound(_))));
    }

    #[test]
    fn chapter_named_file_does_not_count_as_directory() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("chapter-01"), "not a dir");

        let result = ChapterIndex::build(tmp.path());
        assert!(matches!(result, Err(IndexError::RootNotFound(_))));
    }

    #[test]
    fn missing_root_is_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = ChapterIndex::build(&tmp.path().join("missing"));
        assert!(matches!(result, Err(IndexError::RootNotFound(_))));
    }

    #[test]
    fn invalid_utf8_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chapter-01/content/c.md");
        make_dir(path.parent().unwrap());
        std::fs::write(&path, [0x23, 0x20, 0xff, 0xfe, 0x0a]).unwrap();

        let result = ChapterIndex::build(tmp.path());
        assert!(matches!(result, Err(IndexError::Read { .. })));
    }

    #[test]
    fn build_is_idempotent() {
        let tmp = setup_book();
        let first = ChapterIndex::build(tmp.path()).unwrap();
        let second = ChapterIndex::build(tmp.path()).unwrap();

        assert_eq!(first.sequence(), second.sequence());
        assert_eq!(first.overview(), second.overview());
    }

    #[test]
    fn rescan_picks_up_new_chapters() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();
        write_file(
            &tmp.path().join("chapter-03/content/chapter-03.md"),
            "# Late Arrival",
        );

        let fresh = index.rescan().unwrap();
        assert_eq!(chapter_numbers(&fresh), vec![1, 2, 3, 4]);
        // The original index is untouched
        assert_eq!(chapter_numbers(&index), vec![1, 2, 4]);
    }

    #[test]
    fn markdown_title_parser_used_when_requested() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp.path().join("chapter-01/content/c.md"),
            "```sh\n# setup\n```\n\n# Real Title\n",
        );

        let line = ChapterIndex::build(tmp.path()).unwrap();
        assert_eq!(chapter_titles(&line), vec!["setup"]);

        let md = ChapterIndex::build_with(tmp.path(), TitleParser::Markdown).unwrap();
        assert_eq!(chapter_titles(&md), vec!["Real Title"]);
    }

    #[test]
    fn table_of_contents_projects_numbers_and_titles() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        let toc: Vec<(u8, String)> = index
            .table_of_contents()
            .into_iter()
            .map(|e| (e.number, e.title))
            .collect();
        assert_eq!(
            toc,
            vec![
                (1, "The Augmented Programmer".to_string()),
                (2, "Working With Agents".to_string()),
                (4, "Chapter 4".to_string()),
            ]
        );
    }

    #[test]
    fn chapter_outline_reads_sections() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        let sections = find_chapter(&index, 1).outline().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Why now");
    }

    #[test]
    fn read_content_returns_full_text() {
        let tmp = setup_book();
        let index = ChapterIndex::build(tmp.path()).unwrap();

        let body = find_chapter(&index, 2).read_content().unwrap();
        assert_eq!(body, "# Working With Agents\n");
        assert_eq!(source_name(find_chapter(&index, 2)), "chapter-02.md");
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_content_dir_fails_the_build() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = setup_book();
        let content = tmp.path().join("chapter-02/content");
        fs::set_permissions(&content, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        let listable = fs::read_dir(&content).is_ok();
        let result = ChapterIndex::build(tmp.path());
        fs::set_permissions(&content, fs::Permissions::from_mode(0o755)).unwrap();
        if listable {
            return;
        }

        match result {
            Err(IndexError::Resolve(ResolveError::Io { path, .. })) => {
                assert!(path.ends_with("chapter-02/content"));
            }
            other => panic!("expected a resolve error, got {other:?}"),
        }
    }
}
