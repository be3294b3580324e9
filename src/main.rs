mod api;
mod app;
mod config;
mod favorites;
mod logging;
mod paginate;
mod store;
mod ui;

use api::MovieApi;
use app::{App, DisplayMode, EntryAction, InputMode};
use clap::{Parser, Subcommand};
use config::{Config, DEFAULT_PAGE_SIZE};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use favorites::{FavoritesStore, FileStorage};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use store::{DataStore, SearchOutcome};

/// Browse, search and bookmark movies from the movie-list API
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the movie-list API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Movies per page
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Directory holding the favorites storage
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Write logs to this file (or set MOVIE_BROWSER_LOG)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive browser (default)
    Run {
        /// Initial layout
        #[arg(short, long, value_enum, default_value_t = DisplayMode::Card)]
        mode: DisplayMode,
    },
    /// Print one page of movies and exit
    List {
        /// Only movies whose title contains this keyword
        #[arg(short, long)]
        search: Option<String>,
        /// Page to print (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Layout of the printed page
        #[arg(short, long, value_enum, default_value_t = DisplayMode::List)]
        mode: DisplayMode,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_file.as_deref());

    let config = match Config::resolve(cli.base_url, cli.page_size, cli.data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let command = cli.command.unwrap_or(Commands::Run {
        mode: DisplayMode::Card,
    });

    match command {
        Commands::List { search, page, mode } => {
            if let Err(e) = print_page(&config, search.as_deref(), page, mode).await {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Run { mode } => {
            tracing::info!(base_url = %config.base_url, data_dir = %config.data_dir.display(), "starting");
            let api = MovieApi::new(&config.base_url);
            let favorites = FavoritesStore::new(Box::new(FileStorage::new(&config.data_dir)));
            let mut app = App::new(api, favorites, config.page_size, mode);
            app.start_loading();

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app);

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Fetch once, apply the search and page, and print the page as text.
async fn print_page(
    config: &Config,
    search: Option<&str>,
    page: usize,
    mode: DisplayMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = MovieApi::new(&config.base_url);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Fetching {}", api.index_url()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let fetched = api.list_movies().await;
    spinner.finish_and_clear();

    let movies = fetched.map_err(|e| e.user_message())?;
    let mut store = DataStore::new();
    store.load(movies);

    if let Some(keyword) = search {
        if let SearchOutcome::NoMatch { keyword } = store.search(keyword) {
            return Err(format!("No movies match the keyword \"{}\"", keyword).into());
        }
    }

    let active = store.active_set();
    let page = paginate::clamp_page(page, active.len(), config.page_size);
    let movies = paginate::page(active, page, config.page_size);

    print!("{}", ui::plain::render_page(movies, mode, |image| api.poster_url(image)));
    println!(
        "{}",
        ui::plain::pager_line(
            page,
            paginate::page_count(active.len(), config.page_size),
            active.len()
        )
    );
    Ok(())
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_events();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so background results show up promptly
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key);
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // A notice swallows the next key
    if app.notice.is_some() {
        app.dismiss_notice();
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.detail.is_some() {
        handle_detail_key(app, key);
    } else {
        handle_browse_key(app, key);
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.submit_search();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
            app.close_detail();
        }
        KeyCode::Char('+') | KeyCode::Char('f') => {
            if let Some(id) = app.detail.as_ref().map(|d| d.movie_id) {
                app.dispatch(EntryAction::Favorite, id);
            }
        }
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Esc => {
            app.clear_search();
        }
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::PageDown | KeyCode::Char('n') => app.next_page(),
        KeyCode::PageUp | KeyCode::Char('p') => app.prev_page(),
        KeyCode::Char('g') => app.first_page(),
        KeyCode::Char('G') => app.last_page(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(n) = c.to_digit(10) {
                app.go_to_page(n as usize);
            }
        }
        KeyCode::Char('c') => app.set_mode(DisplayMode::Card),
        KeyCode::Char('v') => app.set_mode(DisplayMode::List),
        KeyCode::Tab => app.toggle_mode(),
        KeyCode::Enter => app.dispatch_selected(EntryAction::Details),
        KeyCode::Char('+') | KeyCode::Char('f') => app.dispatch_selected(EntryAction::Favorite),
        _ => {}
    }
}
