use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::runtime::SessionEvent;
use crate::session::{Score, Session};

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
pub enum AppState {
    Typing,
    /// score dialog is open
    Score,
}

/// What the event loop should do after an event has been handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Redraw,
    Quit,
}

/// The typing view: a session plus what is currently on screen
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub state: AppState,
    pub score: Option<Score>,
}

impl App {
    pub fn new(sample: impl Into<String>) -> Self {
        let mut app = Self {
            session: Session::new(sample),
            state: AppState::Typing,
            score: None,
        };
        // an empty sample is already complete
        app.check_completion();
        app
    }

    pub fn on_event(&mut self, event: SessionEvent) -> Flow {
        match event {
            SessionEvent::Tick => {
                if self.check_completion() {
                    Flow::Redraw
                } else {
                    Flow::Continue
                }
            }
            SessionEvent::Resize => Flow::Redraw,
            SessionEvent::Key(key) => self.on_key(key),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Quit;
        }

        match self.state {
            AppState::Typing => match typed_char(&key) {
                Some(c) => {
                    if let Some(score) = self.session.handle_keystroke(c) {
                        self.show_score(score);
                    }
                    Flow::Redraw
                }
                None => {
                    debug!(code = ?key.code, "ignored key");
                    Flow::Continue
                }
            },
            AppState::Score => match key.code {
                KeyCode::Enter => Flow::Quit,
                _ => Flow::Continue,
            },
        }
    }

    /// Tick-driven completion check; true when the score dialog just opened
    pub fn check_completion(&mut self) -> bool {
        match self.session.poll_completion() {
            Some(score) => {
                self.show_score(score);
                true
            }
            None => false,
        }
    }

    fn show_score(&mut self, score: Score) {
        self.score = Some(score);
        self.state = AppState::Score;
    }
}

/// The character a key press types, if any. Modified presses other than
/// shift are shortcuts, not keystrokes.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some('\n'),
        KeyCode::Tab => Some('\t'),
        _ => None,
    }
}
