//! Title and section-heading extraction from chapter text.
//!
//! Kept apart from [`crate::resolve`]: resolution decides *which* file is a
//! chapter, this module decides what the chapter is *called*. Both strategies
//! implement [`TitleExtractor`], so the index can be built with either.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Derives a display title from the full text of a markdown file.
pub trait TitleExtractor {
    /// First top-level heading, or `None` if the text has none.
    fn extract(&self, text: &str) -> Option<String>;
}

/// Line-based extraction: the first line that starts with a single `# `.
///
/// Fast and forgiving, but it cannot tell a heading from a `# comment`
/// inside a fenced code block. A leading YAML frontmatter block is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstHeading;

impl TitleExtractor for FirstHeading {
    fn extract(&self, text: &str) -> Option<String> {
        strip_frontmatter(text)
            .lines()
            .filter_map(|line| line.trim().strip_prefix("# "))
            .map(strip_closing_hashes)
            .find(|title| !title.is_empty())
            .map(str::to_string)
    }
}

/// Drop an optional closing ATX sequence: `Title ##` → `Title`. The run only
/// counts when it is preceded by a space, so `C#` keeps its hash.
fn strip_closing_hashes(title: &str) -> &str {
    let title = title.trim();
    let without = title.trim_end_matches('#');
    if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        title
    }
}

/// Text after a leading `---` ... `---` (or `...`) YAML frontmatter block.
///
/// Returns `text` unchanged when it does not open with `---` or the block is
/// never closed.
pub fn strip_frontmatter(text: &str) -> &str {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return text;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return &rest[offset..];
        }
    }
    text
}

/// CommonMark parser with YAML metadata blocks recognized, so frontmatter
/// surfaces as [`Tag::MetadataBlock`] instead of a rule and a setext heading.
pub(crate) fn markdown_parser(text: &str) -> Parser<'_> {
    Parser::new_ext(text, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS)
}

/// Markdown-aware extraction using pulldown-cmark.
///
/// Understands setext headings (`Title\n=====`), ignores code blocks, and
/// flattens inline markup (`# The *Augmented* Programmer` → "The Augmented
/// Programmer").
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownHeading;

impl TitleExtractor for MarkdownHeading {
    fn extract(&self, text: &str) -> Option<String> {
        headings(text)
            .into_iter()
            .find(|(level, title)| *level == 1 && !title.is_empty())
            .map(|(_, title)| title)
    }
}

/// Which extractor the index uses. Selected by `[titles] parser` in
/// `reader.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleParser {
    #[default]
    Line,
    Markdown,
}

impl TitleParser {
    pub fn extractor(self) -> &'static dyn TitleExtractor {
        match self {
            Self::Line => &FirstHeading,
            Self::Markdown => &MarkdownHeading,
        }
    }
}

/// One in-chapter section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading depth: 2 for `##`, 3 for `###`, 4 for `####`.
    pub level: u8,
    pub title: String,
}

/// Section headings at levels 2–4, in document order.
pub fn outline(text: &str) -> Vec<Section> {
    headings(text)
        .into_iter()
        .filter(|(level, title)| (2..=4).contains(level) && !title.is_empty())
        .map(|(level, title)| Section { level, title })
        .collect()
}

/// All headings with their level and flattened text.
fn headings(text: &str) -> Vec<(u8, String)> {
    let mut found = Vec::new();
    let mut current: Option<(u8, String)> = None;
    let mut in_metadata = false;

    for event in markdown_parser(text) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => in_metadata = false,
            _ if in_metadata => {}
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level_number(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    found.push((level, title.trim().to_string()));
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, title)) = current.as_mut() {
                    title.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, title)) = current.as_mut() {
                    title.push(' ');
                }
            }
            _ => {}
        }
    }
    found
}

fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
