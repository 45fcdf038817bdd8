pub mod commands;
pub mod events;
pub mod state;
pub mod ui;
pub mod utils;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sqlplay_session::GenerationParams;
use tracing::info;

use crate::CliError;
use crate::logging::init_file_logging;
use crate::workspace::PlaygroundSettings;
use events::handle_key;
use state::App;
use ui::draw_ui;

/// Run the interactive playground until the user quits.
///
/// The initial dataset comes from `upload` when given, otherwise it is
/// generated from `params`.
pub fn run(
    settings: PlaygroundSettings,
    params: GenerationParams,
    upload: Option<(PathBuf, Option<String>)>,
) -> Result<(), CliError> {
    init_file_logging(&settings.log_file)?;
    info!(log_file = %settings.log_file.display(), "playground started");

    let mut app = App::new(settings, params)?;
    let loaded = match upload {
        Some((path, table)) => app.upload(path, table),
        None => {
            let params = app.params.clone();
            app.regenerate(params)
        }
    };
    if let Err(err) = loaded {
        app.push_message(format!("error: {err}"));
    }
    app.push_message("Type SQL and press Enter, or /help for commands.");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(history = app.session.history().len(), "playground closed");
    result
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), CliError> {
    while !app.should_quit {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                event::Event::Key(key) => handle_key(app, key)?,
                event::Event::Mouse(mouse) => match mouse.kind {
                    event::MouseEventKind::ScrollDown => {
                        app.scroll_offset = app.scroll_offset.saturating_sub(1);
                    }
                    event::MouseEventKind::ScrollUp => {
                        app.scroll_offset = app.scroll_offset.saturating_add(1);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
    Ok(())
}
