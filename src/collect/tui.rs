//! Full-screen manifest browser.
mod state;
mod view;

use crate::manifest::{Answers, ManifestGroups};
use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use state::Browser;
use std::io;
use std::time::Duration;

const EVENT_POLL_MS: u64 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Up,
    Down,
    PageUp,
    PageDown,
    NextSection,
    PrevSection,
    Yes,
    No,
    Toggle,
    Digit(u8),
    Backspace,
    Skip,
    ToggleHelp,
    Confirm,
    Abort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Confirm,
    Abort,
}

pub(super) fn run(title: &str, groups: ManifestGroups) -> Result<Option<Answers>> {
    let mut browser = Browser::new(title, groups);

    let guard = TerminalGuard::enter()?;
    let mut terminal = {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        ratatui::Terminal::new(backend).context("init terminal")?
    };

    let step = loop {
        terminal
            .draw(|frame| browser.draw(frame))
            .context("draw manifest browser")?;

        if !event::poll(Duration::from_millis(EVENT_POLL_MS)).context("poll event")? {
            continue;
        }
        let Event::Key(key) = event::read().context("read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(action) = action_from_key(key) {
            match browser.apply(action) {
                Step::Continue => {}
                done => break done,
            }
        }
    };

    drop(guard);
    terminal.show_cursor().ok();

    match step {
        Step::Confirm => Ok(Some(browser.into_answers())),
        _ => {
            tracing::info!("manifest browser closed without confirmation");
            Ok(None)
        }
    }
}

fn action_from_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
            .then_some(Action::Abort);
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Tab => Some(Action::NextSection),
        KeyCode::BackTab => Some(Action::PrevSection),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::No),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Toggle),
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            ch.to_digit(10).map(|digit| Action::Digit(digit as u8))
        }
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('s') | KeyCode::Delete => Some(Action::Skip),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Action::Confirm),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Abort),
        _ => None,
    }
}

/// Raw mode plus alternate screen, undone on drop so a panic or early
/// return leaves the terminal usable.
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut guard = Self { active: true };
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            guard.leave();
            return Err(err).context("enter alt screen");
        }
        Ok(guard)
    }

    fn leave(&mut self) {
        if self.active {
            disable_raw_mode().ok();
            execute!(io::stdout(), LeaveAlternateScreen, Show).ok();
            self.active = false;
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.leave();
    }
}
