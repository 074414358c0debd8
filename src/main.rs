//! # reelshelf
//!
//! A terminal shelf for a movie watchlist and a Top 5.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reelshelf::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use reelshelf::app_core::lists::Shelf;
use reelshelf::app_core::reducer;
use reelshelf::app_core::render::ViewTree;
use reelshelf::app_core::state::AppState;
use reelshelf::model::{ListKind, Movie, normalize_poster_path};
use reelshelf::runtime::native::{self, logging, storage::FileStorage};
use reelshelf::{theme, ui};

use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Upper bound on how long the loop sleeps waiting for input.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "reelshelf: keep a movie watchlist and a Top 5 in the terminal.\n\
                  Lists are stored as JSON files in the data directory."
)]
struct Args {
    /// UI theme (dracula, solarized, gruvbox, everforest_light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Directory holding the stored lists
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Append a movie with this title to the watchlist and exit
    #[arg(short, long, value_name = "TITLE")]
    add: Option<String>,

    /// Overview for --add
    #[arg(long, requires = "add")]
    overview: Option<String>,

    /// Poster path for --add (e.g. /d.jpg)
    #[arg(long, requires = "add")]
    poster: Option<String>,

    /// Print both lists and exit
    #[arg(short, long)]
    list: bool,

    /// Empty both lists and exit
    #[arg(long)]
    clear: bool,

    /// Show all paths used by the application (data, logs)
    #[arg(long)]
    config: bool,
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let super_key = modifiers.contains(KeyModifiers::SUPER);

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Tab if shift => AppKeyCode::BackTab,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: ctrl || super_key,
        shift,
    })
}

fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        _ => return None,
    };
    Some(AppMouseEvent::new(kind, mouse.column, mouse.row))
}

// ---------------------------------------------------------------------------
// One-shot commands
// ---------------------------------------------------------------------------

fn print_lists(storage: FileStorage) {
    let shelf = Shelf::new(storage, ViewTree::page());
    for list in ListKind::ALL {
        let movies = shelf.list(list);
        println!("{} ({}):", list.label(), movies.len());
        if movies.is_empty() {
            println!("  (empty)");
        }
        for movie in movies {
            match movie.poster_url() {
                Some(url) => println!("  - {}  [{}]", movie.title, url),
                None => println!("  - {}", movie.title),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    // Theme selection
    let theme_name = args.theme.as_deref().unwrap_or("dracula");
    let theme_enum = theme::Theme::from_str(theme_name).map_err(anyhow::Error::msg)?;
    let theme = theme_enum.config();

    let data_dir = native::get_data_dir(args.data_dir.as_deref())?;
    let log_dir = native::get_log_dir(&data_dir);
    let storage = FileStorage::new(&data_dir);

    if args.config {
        println!("App Paths:");
        println!("  Data:      {}", data_dir.display());
        println!("  Watchlist: {}", storage.path_for(ListKind::Watchlist.storage_key()).display());
        println!("  Top 5:     {}", storage.path_for(ListKind::TopFive.storage_key()).display());
        println!("  Logs:      {}", log_dir.display());
        return Ok(());
    }

    logging::init_logging(&log_dir)?;
    tracing::info!(version = %app_version, data_dir = %data_dir.display(), "starting");

    if args.clear {
        let mut shelf = Shelf::new(storage, ViewTree::page());
        shelf.clear_all().context("failed to clear lists")?;
        println!("Both lists cleared.");
        return Ok(());
    }

    if let Some(title) = &args.add {
        anyhow::ensure!(!title.trim().is_empty(), "--add needs a non-empty title");
        let movie = Movie::new(
            title.trim(),
            args.overview.clone().unwrap_or_default(),
            args.poster.as_deref().and_then(normalize_poster_path),
        );
        let mut shelf = Shelf::new(storage, ViewTree::page());
        shelf
            .add_to_watchlist(movie)
            .context("failed to add movie")?;
        println!("Added \"{title}\" to the watchlist.");
        return Ok(());
    }

    if args.list {
        print_lists(storage);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(Box::new(storage), theme, app_version);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "terminal loop failed");
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;

    terminal.draw(|f| ui::ui(f, app))?;

    loop {
        if app.should_quit {
            break;
        }

        // Wake up for a pending notice dismissal even without input.
        let timeout = app
            .shelf
            .notifier()
            .time_to_dismiss(now_ms())
            .map(Duration::from_millis)
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));

        if !event::poll(timeout)? {
            if app.tick(now_ms()) {
                terminal.draw(|f| ui::ui(f, app))?;
            }
            continue;
        }

        let redraw = match event::read()? {
            Event::Key(key) => {
                match crossterm_to_app_key_event(key.code, key.modifiers, key.kind) {
                    Some(event) => {
                        reducer::handle_key_event(app, event, now_ms());
                        true
                    }
                    None => false,
                }
            }
            Event::Mouse(mouse) => crossterm_to_app_mouse_event(&mouse)
                .is_some_and(|event| reducer::handle_mouse_event(app, event, now_ms())),
            Event::Resize(_, _) => true,
            _ => false,
        };

        let dismissed = app.tick(now_ms());
        if redraw || dismissed {
            terminal.draw(|f| ui::ui(f, app))?;
        }
    }
    Ok(())
}
