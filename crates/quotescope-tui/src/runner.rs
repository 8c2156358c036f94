// TUI event loop and terminal management
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quotescope_core::{search_quotes, Config, ControllerHandle, FilterCatalog, QuoteSource};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::app::{App, InputMode, Screen};

/// How long to wait for input before redrawing with fresh controller state
const TICK: Duration = Duration::from_millis(50);

/// What the event loop talks to besides the terminal
pub struct Session {
    pub source: Arc<dyn QuoteSource>,
    pub handle: ControllerHandle,
    pub config: Config,
}

pub async fn run_tui(mut app: App, mut session: Session) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if session.config.ui.mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut session).await;

    if let Err(e) = session.handle.dispose() {
        warn!("Controller already gone at shutdown: {}", e);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    session: &mut Session,
) -> anyhow::Result<()> {
    session.handle.set_filters(app.filters)?;
    reload_catalog(app, session).await;

    loop {
        app.view = session.handle.view();
        terminal.draw(|f| crate::ui::render(f, app))?;

        if let Some(term) = app.search_debouncer.poll(Instant::now()) {
            run_search(app, session, term).await;
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, session, key).await?,
                Event::Mouse(mouse) => handle_mouse(app, session, mouse)?,
                _ => {}
            }
        }

        if app.sync_list_query() {
            refresh_list(app, session).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_key(app: &mut App, session: &mut Session, key: KeyEvent) -> anyhow::Result<()> {
    match app.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Enter => {
                // Don't wait out the debounce
                app.search_debouncer.cancel();
                app.enter_normal_mode();
                let term = app.search_input.clone();
                run_search(app, session, term).await;
            }
            KeyCode::Esc => {
                app.clear_search();
                app.enter_normal_mode();
                run_search(app, session, String::new()).await;
            }
            KeyCode::Char(c) => app.push_search_char(c, Instant::now()),
            KeyCode::Backspace => app.pop_search_char(Instant::now()),
            _ => {}
        },
        InputMode::Normal => {
            app.clear_error();
            match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('/') => app.enter_search_mode(),
                KeyCode::Tab => {
                    app.toggle_screen();
                    app.reset_selection();
                }
                KeyCode::Char('t') => {
                    let filters = app.cycle_type();
                    change_filters(app, session, filters).await?;
                }
                KeyCode::Char('o') => {
                    let filters = app.cycle_topic();
                    change_filters(app, session, filters).await?;
                }
                KeyCode::Char('c') => {
                    let filters = app.clear_filters();
                    change_filters(app, session, filters).await?;
                }
                KeyCode::Char('d') => {
                    let theme = app.toggle_theme();
                    session.config.ui.theme = Some(theme);
                    if let Err(e) = session.config.save() {
                        warn!("Failed to save theme: {}", e);
                        app.error_message = Some(format!("Failed to save theme: {}", e));
                    }
                }
                _ => match app.screen {
                    Screen::Quote => handle_quote_key(app, session, key)?,
                    Screen::List => handle_list_key(app, session, key).await,
                },
            }
        }
    }

    Ok(())
}

fn handle_quote_key(app: &mut App, session: &Session, key: KeyEvent) -> anyhow::Result<()> {
    // Search results replace the quote; arrows scroll them
    if app.is_searching() {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.next_row(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => session.handle.step_previous()?,
        KeyCode::Right | KeyCode::Char('l') => session.handle.step_next()?,
        KeyCode::Home => session.handle.jump_to(1)?,
        KeyCode::End if app.view.total > 0 => session.handle.jump_to(app.view.total)?,
        // Same filters again means a fresh random pick
        KeyCode::Char('r') => session.handle.set_filters(app.filters)?,
        _ => {}
    }
    Ok(())
}

async fn handle_list_key(app: &mut App, session: &Session, key: KeyEvent) {
    let reload = match key.code {
        KeyCode::Right | KeyCode::Char('n') => app.list.go_next(),
        KeyCode::Left | KeyCode::Char('p') => app.list.go_previous(),
        KeyCode::Home => app.list.go_to_page(1),
        KeyCode::End => app.list.go_to_page(app.list.total_pages()),
        KeyCode::Down | KeyCode::Char('j') => {
            app.next_row();
            return;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.previous_row();
            return;
        }
        _ => return,
    };

    app.reset_selection();
    if reload {
        app.list.load_page(session.source.as_ref()).await;
    }
}

fn handle_mouse(app: &mut App, session: &Session, mouse: MouseEvent) -> anyhow::Result<()> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let on_track = app
                .slider
                .is_some_and(|track| track.contains(mouse.column, mouse.row));
            if on_track {
                if let Some(position) = app.position_at_column(mouse.column) {
                    session.handle.press()?;
                    session.handle.drag_to(position)?;
                    app.mouse_dragging = true;
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.mouse_dragging => {
            if let Some(position) = app.position_at_column(mouse.column) {
                session.handle.drag_to(position)?;
            }
        }
        MouseEventKind::Up(MouseButton::Left) if app.mouse_dragging => {
            app.mouse_dragging = false;
            session.handle.release()?;
        }
        MouseEventKind::ScrollDown => app.next_row(),
        MouseEventKind::ScrollUp => app.previous_row(),
        _ => {}
    }
    Ok(())
}

async fn change_filters(
    app: &mut App,
    session: &Session,
    filters: quotescope_api::QuoteFilters,
) -> anyhow::Result<()> {
    info!("Filters changed: type={:?} topic={:?}", filters.type_id, filters.topic_id);
    session.handle.set_filters(filters)?;
    reload_catalog(app, session).await;

    // Keep an active search in step with the filters
    if !app.active_search.is_empty() {
        let term = app.active_search.clone();
        run_search(app, session, term).await;
    }
    Ok(())
}

async fn reload_catalog(app: &mut App, session: &Session) {
    match FilterCatalog::load(session.source.as_ref(), &app.filters).await {
        Ok(catalog) => app.catalog = catalog,
        Err(e) => {
            warn!("Failed to load filter options: {}", e);
            app.error_message = Some("Failed to load filter options".to_string());
        }
    }
}

async fn run_search(app: &mut App, session: &Session, term: String) {
    app.active_search = term.trim().to_string();
    app.search = search_quotes(session.source.as_ref(), &app.active_search, &app.filters).await;
    app.reset_selection();
}

async fn refresh_list(app: &mut App, session: &Session) {
    app.list.refresh(session.source.as_ref()).await;
    app.list_stale = false;
}
