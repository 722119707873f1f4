use chapter_reader::config::{self, ReaderConfig};
use chapter_reader::index::{BookOverview, ChapterIndex, ResolvedChapter, TocEntry};
use chapter_reader::navigation::{NavError, NavigationState};
use chapter_reader::output;
use chapter_reader::session::{self, ReaderCommand};
use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "chapter-reader")]
#[command(about = "Terminal reader for multi-directory book projects")]
#[command(long_about = "\
Terminal reader for multi-directory book projects

Each chapter lives in its own directory. Only files under content/ are ever
shown; drafts, research and notes are skipped.

Book structure:

  book/
  ├── reader.toml                      # Reader config (optional)
  ├── master-documents/                # Book overview
  │   └── complete-manuscript.md
  ├── chapter-01/
  │   ├── content/
  │   │   ├── chapter-01-complete.md   # ← shown (complete > enhanced > revised > other)
  │   │   └── chapter-01-revised.md
  │   ├── drafts/                      # Skipped
  │   └── research/                    # Skipped
  └── chapter-02/
      └── drafts/                      # No content/ = chapter not listed

Run 'chapter-reader gen-config' to generate a documented reader.toml.")]
#[command(version)]
struct Cli {
    /// Book root directory
    #[arg(long, short, env = "BOOK_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the table of contents
    Toc {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print one chapter (a number, or "overview")
    Show { target: String },
    /// List resolved chapters with their source files
    Check,
    /// Read interactively (default)
    Read {
        /// Chapter to start at
        #[arg(long, short)]
        chapter: Option<u8>,
    },
    /// Print a stock reader.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct TocJson<'a> {
    title: &'a str,
    overview: Option<&'a BookOverview>,
    chapters: Vec<TocEntry>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Read { chapter: None }) {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Toc { json: true } => {
            let (config, index) = load_book(&cli.root)?;
            let toc = TocJson {
                title: &config.title,
                overview: index.overview(),
                chapters: index.table_of_contents(),
            };
            println!("{}", serde_json::to_string_pretty(&toc)?);
        }
        Command::Toc { json: false } => {
            let (config, index) = load_book(&cli.root)?;
            print_lines(output::format_toc(&index, None, &config.title));
        }
        Command::Show { target } => {
            let (config, index) = load_book(&cli.root)?;
            if target.eq_ignore_ascii_case("overview") {
                let overview = index.overview().ok_or("book has no overview")?;
                display_overview(&index, overview, &config)?;
            } else {
                let number: u8 = target
                    .parse()
                    .map_err(|_| format!("invalid chapter number '{target}'"))?;
                let mut nav = NavigationState::new(&index, None)?;
                nav.jump(number)?;
                display_current(&nav, &config)?;
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.root.display());
            let (_, index) = load_book(&cli.root)?;
            print_lines(output::format_check(&index));
        }
        Command::Read { chapter } => {
            let (config, index) = load_book(&cli.root)?;
            run_reader(index, &config, chapter)?;
        }
    }

    Ok(())
}

/// Load `reader.toml` and scan the book root.
fn load_book(root: &Path) -> CliResult<(ReaderConfig, ChapterIndex)> {
    let config = config::load_config(root)?;
    let index = ChapterIndex::build_with(root, config.titles.parser)?;
    Ok((config, index))
}

enum Flow {
    Quit,
    /// Rebuild the index, then resume at this chapter if it still exists.
    Rescan(Option<u8>),
}

/// Interactive loop. Owns the index so a rescan can replace it.
fn run_reader(mut index: ChapterIndex, config: &ReaderConfig, start: Option<u8>) -> CliResult<()> {
    let mut editor = DefaultEditor::new()?;
    // An explicit starting chapter that is missing is an error; a chapter
    // that disappears during a rescan is not.
    let mut nav_start = NavigationState::new(&index, start).map(|_| start)?;

    loop {
        match read_loop(&mut editor, &index, config, nav_start)? {
            Flow::Quit => break,
            Flow::Rescan(at) => {
                index = index.rescan()?;
                nav_start = match NavigationState::new(&index, at) {
                    Ok(_) => at,
                    Err(e) => {
                        warn!("{e} after rescan, returning to the first chapter");
                        None
                    }
                };
                println!("Rescanned: {} chapters", index.len());
            }
        }
    }

    println!("Thank you for reading {}!", config.title);
    Ok(())
}

fn read_loop(
    editor: &mut DefaultEditor,
    index: &ChapterIndex,
    config: &ReaderConfig,
    start: Option<u8>,
) -> CliResult<Flow> {
    let mut nav = NavigationState::new(index, start)?;
    report(display_current(&nav, config));
    println!("Type 'help' for commands.");

    loop {
        let prompt = match nav.current() {
            Ok(chapter) => format!("[Chapter {}] > ", chapter.number),
            Err(_) => "> ".to_string(),
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => return Ok(Flow::Quit),
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = editor.add_history_entry(line.as_str()) {
            warn!("history not updated: {e}");
        }

        let command = match ReaderCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        debug!(?command, "parsed command");

        match command {
            ReaderCommand::Next => report(advance(&mut nav, true, config)),
            ReaderCommand::Previous => report(advance(&mut nav, false, config)),
            ReaderCommand::Jump(number) => report(jump(&mut nav, number, config)),
            ReaderCommand::TableOfContents => {
                let current = nav.current().ok().map(|c| c.number);
                print_lines(output::format_toc(index, current, &config.title));
            }
            ReaderCommand::Overview => match index.overview() {
                Some(overview) => report(display_overview(index, overview, config)),
                None => println!("This book has no overview"),
            },
            ReaderCommand::Outline => report(print_outline(&nav)),
            ReaderCommand::Rescan => {
                return Ok(Flow::Rescan(nav.current().ok().map(|c| c.number)));
            }
            ReaderCommand::Help => print_lines(session::help_lines()),
            ReaderCommand::Quit => return Ok(Flow::Quit),
        }
    }
}

/// Move one chapter forward or back and show where we landed.
fn advance(nav: &mut NavigationState<'_>, forward: bool, config: &ReaderConfig) -> CliResult<()> {
    let step = if forward { nav.next()? } else { nav.previous()? };
    match step.boundary {
        Some(boundary) => {
            println!("{}", output::boundary_message(boundary));
            Ok(())
        }
        None => display_current(nav, config),
    }
}

fn jump(nav: &mut NavigationState<'_>, number: u8, config: &ReaderConfig) -> CliResult<()> {
    nav.jump(number)?;
    display_current(nav, config)
}

fn display_current(nav: &NavigationState<'_>, config: &ReaderConfig) -> CliResult<()> {
    let chapter = match nav.current() {
        Ok(chapter) => chapter,
        Err(NavError::EmptyBook) => {
            println!("No chapters available");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    display_chapter(nav, chapter, config)
}

fn display_chapter(
    nav: &NavigationState<'_>,
    chapter: &ResolvedChapter,
    config: &ReaderConfig,
) -> CliResult<()> {
    let index = nav.index();
    let body = chapter.read_content()?;
    let source_root = config.display.show_sources.then(|| index.root());
    print_lines(output::format_chapter_header(
        chapter,
        nav.position(),
        index.len(),
        &config.title,
        source_root,
    ));
    println!();
    print_lines(output::render_markdown(&body, config.display.width));
    println!();
    println!("{}", output::format_next_hint(nav.peek_next()));
    Ok(())
}

fn display_overview(
    index: &ChapterIndex,
    overview: &BookOverview,
    config: &ReaderConfig,
) -> CliResult<()> {
    let body = overview.read_content()?;
    let source_root = config.display.show_sources.then(|| index.root());
    print_lines(output::format_overview_header(
        overview,
        &config.title,
        source_root,
    ));
    println!();
    print_lines(output::render_markdown(&body, config.display.width));
    println!();
    Ok(())
}

fn print_outline(nav: &NavigationState<'_>) -> CliResult<()> {
    let chapter = nav.current()?;
    let sections = chapter.outline()?;
    print_lines(output::format_outline(chapter, &sections));
    Ok(())
}

/// Print a recoverable error and keep the session going.
fn report(result: CliResult<()>) {
    if let Err(e) = result {
        eprintln!("{e}");
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
