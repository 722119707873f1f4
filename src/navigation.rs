//! Reading position over a [`ChapterIndex`].
//!
//! [`NavigationState`] borrows the index and holds nothing but a position into
//! its sequence, so it is `Copy`: duplicate it to peek ahead without
//! disturbing the real reading position.
//!
//! Positions are sequence indices, not chapter numbers. With chapters 1, 2
//! and 4 resolved, chapter 4 sits at position 2, and `next()` from chapter 2
//! goes straight to it.
//!
//! Hitting either end is not an error: `next()` at the last chapter returns
//! the same chapter with [`Boundary::AtEnd`]. Failed operations never move
//! the position.

use crate::index::{ChapterIndex, ResolvedChapter, TocEntry};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("chapter {0} not found")]
    ChapterNotFound(u8),
    #[error("no chapters available")]
    EmptyBook,
}

/// Which end of the book a move ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    AtStart,
    AtEnd,
}

/// Outcome of a sequential move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    /// Current chapter after the move (unchanged at a boundary).
    pub chapter: &'a ResolvedChapter,
    /// Set when the move was refused because the position is at an end.
    pub boundary: Option<Boundary>,
}

impl Step<'_> {
    pub fn moved(&self) -> bool {
        self.boundary.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NavigationState<'a> {
    index: &'a ChapterIndex,
    position: usize,
}

impl<'a> NavigationState<'a> {
    /// Start at `start` if given, otherwise at the first chapter.
    ///
    /// A requested start chapter that is not in a non-empty index is
    /// [`NavError::ChapterNotFound`] rather than a silent fallback.
    pub fn new(index: &'a ChapterIndex, start: Option<u8>) -> Result<Self, NavError> {
        let position = match start {
            Some(n) if !index.is_empty() => {
                index.position_of(n).ok_or(NavError::ChapterNotFound(n))?
            }
            _ => 0,
        };
        Ok(Self { index, position })
    }

    pub fn index(&self) -> &'a ChapterIndex {
        self.index
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Result<&'a ResolvedChapter, NavError> {
        self.index
            .sequence()
            .get(self.position)
            .ok_or(NavError::EmptyBook)
    }

    pub fn next(&mut self) -> Result<Step<'a>, NavError> {
        let chapter = self.current()?;
        if self.position + 1 >= self.index.len() {
            return Ok(Step {
                chapter,
                boundary: Some(Boundary::AtEnd),
            });
        }
        self.position += 1;
        trace!(position = self.position, "next");
        Ok(Step {
            chapter: self.current()?,
            boundary: None,
        })
    }

    pub fn previous(&mut self) -> Result<Step<'a>, NavError> {
        let chapter = self.current()?;
        if self.position == 0 {
            return Ok(Step {
                chapter,
                boundary: Some(Boundary::AtStart),
            });
        }
        self.position -= 1;
        trace!(position = self.position, "previous");
        Ok(Step {
            chapter: self.current()?,
            boundary: None,
        })
    }

    /// Move to chapter `number`. Gaps left by unresolved chapters are
    /// [`NavError::ChapterNotFound`].
    pub fn jump(&mut self, number: u8) -> Result<&'a ResolvedChapter, NavError> {
        let position = self
            .index
            .position_of(number)
            .ok_or(NavError::ChapterNotFound(number))?;
        self.position = position;
        trace!(position, number, "jump");
        self.current()
    }

    /// Chapter after the current one, without moving.
    pub fn peek_next(&self) -> Option<&'a ResolvedChapter> {
        let mut ahead = *self;
        ahead.next().ok().filter(|s| s.moved()).map(|s| s.chapter)
    }

    pub fn table_of_contents(&self) -> Vec<TocEntry> {
        self.index.table_of_contents()
    }
}
