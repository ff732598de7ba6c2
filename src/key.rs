use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

/// The kind of a key event, without its payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum KeyKind {
    Char,
    Space,
    Backspace,
    Enter,
    Escape,
}

/// One normalized input action fed into a typing session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Char(char),
    Space,
    Backspace,
    Enter,
    Escape,
}

impl KeyEvent {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyEvent::Char(_) => KeyKind::Char,
            KeyEvent::Space => KeyKind::Space,
            KeyEvent::Backspace => KeyKind::Backspace,
            KeyEvent::Enter => KeyKind::Enter,
            KeyEvent::Escape => KeyKind::Escape,
        }
    }

    pub fn char(&self) -> Option<char> {
        match self {
            KeyEvent::Char(c) => Some(*c),
            KeyEvent::Space => Some(' '),
            _ => None,
        }
    }

    /// Re-maps a `Char` carrying a control code point onto its dedicated kind
    pub fn normalized(self) -> Self {
        match self {
            KeyEvent::Char(c) => KeyEvent::from(c),
            other => other,
        }
    }

    /// Translates a crossterm key event.
    ///
    /// Navigation keys, key releases and control chords have no meaning
    /// inside a typing test and are dropped here.
    pub fn from_crossterm(key: &crossterm::event::KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match key.code {
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                None
            }
            KeyCode::Char(c) => Some(KeyEvent::from(c)),
            KeyCode::Backspace => Some(KeyEvent::Backspace),
            KeyCode::Enter => Some(KeyEvent::Enter),
            KeyCode::Esc => Some(KeyEvent::Escape),
            _ => None,
        }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        match c {
            ' ' => KeyEvent::Space,
            '\r' | '\n' => KeyEvent::Enter,
            '\x1b' => KeyEvent::Escape,
            '\x7f' | '\x08' => KeyEvent::Backspace,
            c => KeyEvent::Char(c),
        }
    }
}

/// Builds the key sequence for typing `text` verbatim
pub fn keys_for(text: &str) -> Vec<KeyEvent> {
    text.chars().map(KeyEvent::from).collect()
}
