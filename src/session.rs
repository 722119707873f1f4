//! Interactive reading commands.
//!
//! Parses one line of user input into a [`ReaderCommand`]. The read loop in
//! `main.rs` owns the terminal; this module only turns text into intent so the
//! command grammar can be tested without a terminal.
//!
//! | Input | Command |
//! |-------|---------|
//! | *(empty)*, `n`, `next` | next chapter |
//! | `p`, `prev`, `previous` | previous chapter |
//! | `toc`, `table` | table of contents |
//! | `j 4`, `jump 4`, `4` | jump to chapter 4 |
//! | `o`, `overview` | book overview |
//! | `outline` | sections of the current chapter |
//! | `r`, `rescan` | rebuild the index from disk |
//! | `h`, `help`, `?` | command help |
//! | `q`, `quit`, `exit` | quit |

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for commands)")]
    Unknown(String),
    #[error("jump needs a chapter number")]
    MissingChapter,
    #[error("invalid chapter number '{0}'")]
    InvalidChapter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    Next,
    Previous,
    TableOfContents,
    Jump(u8),
    Overview,
    Outline,
    Rescan,
    Help,
    Quit,
}

impl ReaderCommand {
    /// Parse a line of input. Matching is case-insensitive; surrounding
    /// whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Next);
        };
        let arg = words.next();

        let command = match head {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "toc" | "table" => Self::TableOfContents,
            "j" | "jump" => {
                let arg = arg.ok_or(CommandError::MissingChapter)?;
                Self::Jump(parse_chapter_number(arg)?)
            }
            "o" | "overview" => Self::Overview,
            "outline" => Self::Outline,
            "r" | "rescan" => Self::Rescan,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other if other.starts_with(|c: char| c.is_ascii_digit()) => {
                Self::Jump(parse_chapter_number(other)?)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn parse_chapter_number(text: &str) -> Result<u8, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidChapter(text.to_string()))
}

/// Help lines for the interactive loop.
pub fn help_lines() -> Vec<String> {
    [
        "n, next        next chapter (also: empty line)",
        "p, previous    previous chapter",
        "toc            table of contents",
        "j N, jump N    jump to chapter N (or just type N)",
        "o, overview    book overview",
        "outline        sections of the current chapter",
        "r, rescan      re-read the book from disk",
        "q, quit        quit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
