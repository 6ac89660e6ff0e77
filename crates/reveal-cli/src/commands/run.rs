use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use reveal_core::page::PageSpec;
use reveal_core::AppConfig;
use reveal_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    load_theme,
    widgets::{PageWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, page: PageSpec, immediate: bool) -> Result<()> {
    let keymap = Keymap::from_config(&config.keymap);
    let theme = load_theme(&config.ui.theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Reveal"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let rows = terminal.size()?.height.saturating_sub(1);
    let mut app = App::new(config.clone(), theme, &page, immediate, rows);

    let mut events =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    let result = main_loop(&mut terminal, &mut app, &mut events, &keymap).await;
    // Stops the reader before the terminal leaves raw mode
    drop(events);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

async fn main_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
    keymap: &Keymap,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        let rows = terminal.size()?.height.saturating_sub(1);
        app.resize(rows);
        app.update(dt);

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            PageWidget::render(frame.buffer_mut(), chunks[0], app);
            StatusBarWidget::render(frame.buffer_mut(), chunks[1], app);
        })?;

        // Faster polling while scrolling or while any entrance is playing
        let event = if app.needs_frame() {
            events.next_animation().await?
        } else {
            events.next().await?
        };

        match event {
            AppEvent::Key(key) => {
                let action = handle_key_event(key, app.pending_key, keymap);
                app.handle_action(action);
            }
            AppEvent::Scroll(rows) => app.scroll_rows(rows),
            AppEvent::Resize(_, height) => app.resize(height.saturating_sub(1)),
            AppEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
