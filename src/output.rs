//! Terminal output formatting.
//!
//! Every function here is pure: it takes index data and returns display lines
//! (`Vec<String>`), leaving the actual printing to `main.rs`. The engine
//! modules never format or print.
//!
//! # Output Format
//!
//! ## Table of contents
//!
//! ```text
//! The Augmented Programmer
//! Table of Contents
//!
//!     Overview  Complete Manuscript
//!   * 01  The Augmented Programmer
//!     02  Working With Agents
//!     04  Chapter 4
//! ```
//!
//! ## Check
//!
//! ```text
//! Chapters
//! 01 The Augmented Programmer
//!     Source: chapter-01/content/chapter-01-complete.md
//! 02 Working With Agents
//!     Source: chapter-02/content/chapter-02.md
//!
//! Absent
//!     03, 05, 06, 07, 08, 09, 10, 11, 12
//! ```
//!
//! ## Chapter text
//!
//! [`render_markdown`] turns markdown into plain wrapped lines: headings are
//! underlined, list items bulleted, code blocks indented four spaces and
//! block quotes prefixed with `> `. There is no color or styling.

use crate::index::{BookOverview, ChapterIndex, ResolvedChapter};
use crate::naming::{MAX_CHAPTER, MIN_CHAPTER};
use crate::navigation::Boundary;
use crate::title::{Section, markdown_parser};
use pulldown_cmark::{Event, HeadingLevel, Tag, TagEnd};
use std::path::Path;

/// Narrowest text column used when wrapping, whatever the prefix depth.
const MIN_TEXT_WIDTH: usize = 10;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a chapter number as 2-digit zero-padded.
fn format_number(number: u8) -> String {
    format!("{:0>2}", number)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to the book root, for `Source:` lines.
fn relative_source(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

// ============================================================================
// Table of contents, headers, check
// ============================================================================

/// Format the table of contents, marking the `current` chapter with `*`.
pub fn format_toc(index: &ChapterIndex, current: Option<u8>, book_title: &str) -> Vec<String> {
    let mut lines = vec![
        book_title.to_string(),
        "Table of Contents".to_string(),
        String::new(),
    ];

    if let Some(overview) = index.overview() {
        lines.push(format!("    Overview  {}", overview.title));
    }

    if index.is_empty() {
        lines.push(format!("{}(no chapters available)", indent(1)));
    }

    for entry in index.table_of_contents() {
        let marker = if current == Some(entry.number) {
            "  * "
        } else {
            "    "
        };
        lines.push(format!(
            "{}{}  {}",
            marker,
            format_number(entry.number),
            entry.title
        ));
    }

    lines
}

/// Header shown above a chapter: book title, chapter title and position.
pub fn format_chapter_header(
    chapter: &ResolvedChapter,
    position: usize,
    total: usize,
    book_title: &str,
    source_root: Option<&Path>,
) -> Vec<String> {
    let heading = format!("Chapter {}: {}", chapter.number, chapter.title);
    let mut lines = vec![
        book_title.to_string(),
        heading.clone(),
        format!("({} of {})", position + 1, total),
    ];
    if let Some(root) = source_root {
        lines.push(format!(
            "    Source: {}",
            relative_source(&chapter.source_path, root)
        ));
    }
    lines.push("=".repeat(heading.chars().count()));
    lines
}

/// Header shown above the book overview.
pub fn format_overview_header(
    overview: &BookOverview,
    book_title: &str,
    source_root: Option<&Path>,
) -> Vec<String> {
    let heading = format!("Overview: {}", overview.title);
    let mut lines = vec![book_title.to_string(), heading.clone()];
    if let Some(root) = source_root {
        lines.push(format!(
            "    Source: {}",
            relative_source(&overview.source_path, root)
        ));
    }
    lines.push("=".repeat(heading.chars().count()));
    lines
}

/// Format the `check` command: each resolved chapter with its source, then
/// the chapter numbers that did not resolve.
pub fn format_check(index: &ChapterIndex) -> Vec<String> {
    let mut lines = vec!["Chapters".to_string()];

    for chapter in index.sequence() {
        lines.push(format!("{} {}", format_number(chapter.number), chapter.title));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            relative_source(&chapter.source_path, index.root())
        ));
    }

    let absent: Vec<String> = (MIN_CHAPTER..=MAX_CHAPTER)
        .filter(|n| index.by_number(*n).is_none())
        .map(format_number)
        .collect();
    if !absent.is_empty() {
        lines.push(String::new());
        lines.push("Absent".to_string());
        lines.push(format!("{}{}", indent(1), absent.join(", ")));
    }

    if let Some(overview) = index.overview() {
        lines.push(String::new());
        lines.push("Overview".to_string());
        lines.push(format!("{}{}", indent(1), overview.title));
        lines.push(format!(
            "{}Source: {}",
            indent(2),
            relative_source(&overview.source_path, index.root())
        ));
    }

    lines
}

/// Section outline of one chapter, indented by heading depth.
pub fn format_outline(chapter: &ResolvedChapter, sections: &[Section]) -> Vec<String> {
    let mut lines = vec![format!("Chapter {}: {}", chapter.number, chapter.title)];
    if sections.is_empty() {
        lines.push(format!("{}(no sections)", indent(1)));
    }
    for section in sections {
        let depth = usize::from(section.level.saturating_sub(1));
        lines.push(format!("{}{}", indent(depth), section.title));
    }
    lines
}

/// Footer shown under a chapter: where `next` will go.
pub fn format_next_hint(next: Option<&ResolvedChapter>) -> String {
    match next {
        Some(chapter) => format!("Next: Chapter {}: {}", chapter.number, chapter.title),
        None => "End of book".to_string(),
    }
}

/// Message for a move that hit an end of the book.
pub fn boundary_message(boundary: Boundary) -> &'static str {
    match boundary {
        Boundary::AtStart => "You're at the first chapter",
        Boundary::AtEnd => "You're at the last chapter",
    }
}

// ============================================================================
// Markdown to plain text
// ============================================================================

/// Render markdown as plain text lines wrapped at `width` columns.
pub fn render_markdown(body: &str, width: usize) -> Vec<String> {
    let mut renderer = Renderer::new(width);
    for event in markdown_parser(body) {
        renderer.handle(event);
    }
    renderer.finish()
}

struct Renderer {
    width: usize,
    lines: Vec<String>,
    buf: String,
    quote_depth: usize,
    /// One entry per open list: next ordinal for ordered lists.
    lists: Vec<Option<u64>>,
    /// Bullet waiting for the first line of the current item.
    bullet: Option<String>,
    in_code: bool,
    /// Inside YAML frontmatter, which is never shown.
    in_metadata: bool,
    links: Vec<String>,
}

impl Renderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            buf: String::new(),
            quote_depth: 0,
            lists: Vec::new(),
            bullet: None,
            in_code: false,
            in_metadata: false,
            links: Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => self.in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => self.in_metadata = false,
            _ if self.in_metadata => {}
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.in_code => {
                let prefix = format!("{}    ", self.continuation_prefix());
                for line in text.lines() {
                    self.lines.push(format!("{prefix}{line}").trim_end().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => self.buf.push_str(&text),
            Event::SoftBreak => self.buf.push(' '),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push("-".repeat(self.width.min(40)));
                self.blank();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } | Tag::Paragraph => self.flush(),
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush();
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let b = format!("{n}. ");
                        *n += 1;
                        b
                    }
                    _ => "- ".to_string(),
                };
                self.bullet = Some(bullet);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code = true;
            }
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                self.blank();
            }
            TagEnd::Heading(level) => {
                let text = std::mem::take(&mut self.buf).trim().to_string();
                let prefix = self.continuation_prefix();
                let underline = match level {
                    HeadingLevel::H1 => Some('='),
                    HeadingLevel::H2 => Some('-'),
                    _ => None,
                };
                match underline {
                    Some(c) => {
                        self.lines.push(format!("{prefix}{text}"));
                        self.lines
                            .push(format!("{prefix}{}", c.to_string().repeat(text.chars().count())));
                    }
                    None => self.lines.push(format!("{prefix}{text}")),
                }
                self.blank();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::Item => self.flush(),
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::CodeBlock => {
                self.in_code = false;
                self.blank();
            }
            TagEnd::Link => {
                if let Some(url) = self.links.pop()
                    && !self.buf.ends_with(url.as_str())
                {
                    self.buf.push_str(&format!(" ({url})"));
                }
            }
            _ => {}
        }
    }

    fn quote_prefix(&self) -> String {
        "> ".repeat(self.quote_depth)
    }

    /// Prefix for wrapped lines inside the current block.
    fn continuation_prefix(&self) -> String {
        format!("{}{}", self.quote_prefix(), "  ".repeat(self.lists.len()))
    }

    /// Wrap and emit the buffered inline text.
    fn flush(&mut self) {
        let text = std::mem::take(&mut self.buf);
        if text.trim().is_empty() {
            return;
        }
        let rest = self.continuation_prefix();
        let first = match self.bullet.take() {
            Some(bullet) => format!(
                "{}{}{}",
                self.quote_prefix(),
                "  ".repeat(self.lists.len().saturating_sub(1)),
                bullet
            ),
            None => rest.clone(),
        };
        let avail = self
            .width
            .saturating_sub(rest.chars().count())
            .max(MIN_TEXT_WIDTH);
        for (i, line) in wrap(text.trim(), avail).into_iter().enumerate() {
            let prefix = if i == 0 { &first } else { &rest };
            self.lines.push(format!("{prefix}{line}"));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
