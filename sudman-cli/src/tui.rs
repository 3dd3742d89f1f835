//! Terminal session and the interactive event loop.

use std::io::{self, Stdout};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use sudman_core::config::SudmanConfig;
use sudman_core::control::UnitControlService;
use sudman_core::dashboard::{DashboardEngine, Flow, Key};
use sudman_core::query::UnitQueryService;
use sudman_core::{Result, SudmanError};

use crate::ui;

type Backend = CrosstermBackend<Stdout>;

/// Raw mode plus alternate screen for as long as the value lives.
///
/// Dropping it restores the terminal, on error paths and panics included.
pub struct TerminalSession {
    terminal: Terminal<Backend>,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        match Self::setup() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }

    fn setup() -> io::Result<Terminal<Backend>> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(terminal)
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "failed to leave raw mode");
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show) {
            warn!(error = %e, "failed to leave alternate screen");
        }
    }
}

/// Decode a crossterm key into a dashboard key
pub fn map_key(event: KeyEvent) -> Key {
    match (event.code, event.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        // Other chords must not reach the single-letter bindings
        (KeyCode::Char(_), m) if m.contains(KeyModifiers::CONTROL) => Key::Other,
        (KeyCode::Up, _) => Key::Up,
        (KeyCode::Down, _) => Key::Down,
        (KeyCode::Enter, _) => Key::Enter,
        (KeyCode::Esc, _) => Key::Esc,
        (KeyCode::Backspace, _) => Key::Backspace,
        (KeyCode::Char(c), _) => Key::Char(c),
        _ => Key::Other,
    }
}

/// Run the dashboard until the user quits.
pub fn run_dashboard(
    mut session: TerminalSession,
    query: UnitQueryService,
    control: UnitControlService,
    config: &SudmanConfig,
) -> Result<()> {
    let (_, height) = session.size().map_err(terminal_error)?;
    let mut engine = DashboardEngine::start(query, control, config, height);

    loop {
        session
            .terminal
            .draw(|f| {
                let area = f.area();
                let screen = engine.frame(area.width, area.height);
                ui::draw(f, &screen);
            })
            .map_err(terminal_error)?;

        let key = match event::read().map_err(terminal_error)? {
            Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                engine.resize(height);
                continue;
            }
            _ => continue,
        };

        if engine.handle_key(key) == Flow::Quit {
            break;
        }
    }

    Ok(())
}

fn terminal_error(source: io::Error) -> SudmanError {
    SudmanError::Terminal { source }
}
