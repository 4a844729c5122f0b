// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{KeyEventResult, PinnedInputStream};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt as _;
use std::str::FromStr;
use strum_macros::EnumString;

/// Name of a key, as decoded by the terminal driver. Anything that isn't one of the
/// editing keys ends up in [`KeyName::Other`], including single letters (`"a"`) and the
/// empty string that a malformed descriptor falls back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum KeyName {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Backspace,
    Delete,
    Return,
    Tab,
    Escape,
    Space,
    #[strum(default)]
    Other(String),
}

impl Default for KeyName {
    fn default() -> Self { KeyName::Other(String::new()) }
}

impl KeyName {
    /// Parsing never fails, unknown names are kept verbatim in [`KeyName::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        KeyName::from_str(name).unwrap_or_else(|_| KeyName::Other(name.to_owned()))
    }

    /// `true` if this is the single-letter key `letter` (used for `ctrl+<letter>`).
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        match self {
            KeyName::Other(name) => {
                let mut chars = name.chars();
                chars.next() == Some(letter) && chars.next().is_none()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub name: KeyName,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

/// One raw key event: the printable character it produced (if any) plus the key
/// descriptor. Consumed exactly once, either by the dispatcher or by the pause queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub ch: Option<char>,
    pub key: KeyDescriptor,
}

impl KeyEvent {
    /// A plain character key, e.g. `KeyEvent::character('a')`.
    #[must_use]
    pub fn character(ch: char) -> Self {
        let name = if ch == ' ' {
            KeyName::Space
        } else {
            KeyName::Other(ch.to_lowercase().collect())
        };
        Self {
            ch: Some(ch),
            key: KeyDescriptor {
                name,
                shift: ch.is_uppercase(),
                ..Default::default()
            },
        }
    }

    /// A named key with no character and no modifiers, e.g. `KeyName::Left`.
    #[must_use]
    pub fn named(name: KeyName) -> Self {
        Self {
            ch: None,
            key: KeyDescriptor {
                name,
                ..Default::default()
            },
        }
    }

    /// `ctrl+<letter>`.
    #[must_use]
    pub fn ctrl(letter: char) -> Self {
        Self {
            ch: None,
            key: KeyDescriptor {
                name: KeyName::Other(letter.to_string()),
                ctrl: true,
                ..Default::default()
            },
        }
    }

    /// Ctrl+C is never queued, it has to reach the dispatcher even while paused.
    #[must_use]
    pub fn is_interrupt(&self) -> bool { self.key.ctrl && self.key.name.is_letter('c') }

    /// Translate a crossterm event. Only key presses (and auto repeats) produce a
    /// [`KeyEvent`]; releases, mouse, focus, paste and resize events are dropped.
    #[must_use]
    pub fn from_crossterm(event: &Event) -> Option<Self> {
        let Event::Key(key_event) = event else {
            return None;
        };
        if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return None;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        let meta = key_event.modifiers.contains(KeyModifiers::ALT);
        let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);

        let (ch, name) = match key_event.code {
            KeyCode::Left => (None, KeyName::Left),
            KeyCode::Right => (None, KeyName::Right),
            KeyCode::Up => (None, KeyName::Up),
            KeyCode::Down => (None, KeyName::Down),
            KeyCode::Home => (None, KeyName::Home),
            KeyCode::End => (None, KeyName::End),
            KeyCode::Backspace => (None, KeyName::Backspace),
            KeyCode::Delete => (None, KeyName::Delete),
            KeyCode::Enter => (Some('\r'), KeyName::Return),
            KeyCode::Tab => (Some('\t'), KeyName::Tab),
            KeyCode::Esc => (None, KeyName::Escape),
            KeyCode::Char(' ') if !ctrl && !meta => (Some(' '), KeyName::Space),
            KeyCode::Char(c) if ctrl || meta => {
                (None, KeyName::Other(c.to_lowercase().collect()))
            }
            KeyCode::Char(c) => (Some(c), KeyName::Other(c.to_lowercase().collect())),
            _ => (None, KeyName::default()),
        };

        Some(Self {
            ch,
            key: KeyDescriptor {
                name,
                ctrl,
                meta,
                shift,
            },
        })
    }
}

/// Characters that may be typed into the entry buffer.
#[must_use]
pub fn is_insertable_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '.' | '?' | ':' | '/' | '_' | '-')
}

/// What a key event asks the editor to do. Decoding is pure, applying it is the job of
/// [`crate::Editor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    Backspace,
    Delete,
    Submit,
    HistoryPrevious,
    HistoryNext,
    Complete,
    Interrupt,
    Insert(char),
    Ignore,
}

impl From<&KeyEvent> for EditAction {
    fn from(event: &KeyEvent) -> Self {
        let KeyDescriptor {
            name, ctrl, meta, ..
        } = &event.key;

        match name {
            KeyName::Left => EditAction::MoveLeft,
            KeyName::Right => EditAction::MoveRight,
            KeyName::Home => EditAction::MoveHome,
            KeyName::End => EditAction::MoveEnd,
            KeyName::Backspace => EditAction::Backspace,
            KeyName::Delete => EditAction::Delete,
            KeyName::Return => EditAction::Submit,
            KeyName::Up => EditAction::HistoryPrevious,
            KeyName::Down => EditAction::HistoryNext,
            KeyName::Tab => EditAction::Complete,
            KeyName::Escape => EditAction::Ignore,
            KeyName::Space | KeyName::Other(_) => {
                if *ctrl {
                    if name.is_letter('a') {
                        EditAction::MoveHome
                    } else if name.is_letter('e') {
                        EditAction::MoveEnd
                    } else if name.is_letter('c') {
                        EditAction::Interrupt
                    } else {
                        EditAction::Ignore
                    }
                } else {
                    match event.ch {
                        Some(ch) if !*meta && is_insertable_char(ch) => EditAction::Insert(ch),
                        _ => EditAction::Ignore,
                    }
                }
            }
        }
    }
}

/// Key events from the real terminal. The terminal must already be in raw mode, see
/// [`crate::RawModeGuard`].
#[must_use]
pub fn crossterm_key_stream() -> PinnedInputStream<KeyEventResult> {
    let stream = EventStream::new().filter_map(|result| {
        std::future::ready(match result {
            Ok(event) => KeyEvent::from_crossterm(&event).map(Ok),
            Err(err) => Some(Err(err)),
        })
    });
    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent as CrosstermKeyEvent;
    use test_case::test_case;

    #[test_case("left", KeyName::Left)]
    #[test_case("return", KeyName::Return)]
    #[test_case("backspace", KeyName::Backspace)]
    #[test_case("a", KeyName::Other("a".into()))]
    #[test_case("", KeyName::Other(String::new()))]
    #[test_case("pagedown", KeyName::Other("pagedown".into()))]
    fn test_parse_key_name(input: &str, expected: KeyName) {
        pretty_assertions::assert_eq!(KeyName::parse(input), expected);
    }

    #[test]
    fn test_malformed_descriptor_is_ignored() {
        let event = KeyEvent::default();
        assert_eq!(event.key.name, KeyName::Other(String::new()));
        assert_eq!(EditAction::from(&event), EditAction::Ignore);
    }

    #[test_case('a', EditAction::Insert('a'))]
    #[test_case('Z', EditAction::Insert('Z'))]
    #[test_case('7', EditAction::Insert('7'))]
    #[test_case(' ', EditAction::Insert(' '))]
    #[test_case('/', EditAction::Insert('/'))]
    #[test_case('-', EditAction::Insert('-'))]
    #[test_case('*', EditAction::Ignore)]
    #[test_case('é', EditAction::Ignore)]
    #[test_case('"', EditAction::Ignore)]
    fn test_decode_character(ch: char, expected: EditAction) {
        assert_eq!(EditAction::from(&KeyEvent::character(ch)), expected);
    }

    #[test_case('a', EditAction::MoveHome)]
    #[test_case('e', EditAction::MoveEnd)]
    #[test_case('c', EditAction::Interrupt)]
    #[test_case('x', EditAction::Ignore)]
    fn test_decode_ctrl(letter: char, expected: EditAction) {
        assert_eq!(EditAction::from(&KeyEvent::ctrl(letter)), expected);
    }

    #[test]
    fn test_from_crossterm() {
        let press = Event::Key(CrosstermKeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        let event = KeyEvent::from_crossterm(&press).unwrap();
        assert_eq!(event.key.name, KeyName::Return);
        assert_eq!(EditAction::from(&event), EditAction::Submit);

        let ctrl_c = Event::Key(CrosstermKeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ));
        let event = KeyEvent::from_crossterm(&ctrl_c).unwrap();
        assert!(event.is_interrupt());
        assert_eq!(event.ch, None);

        let upper = Event::Key(CrosstermKeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT));
        let event = KeyEvent::from_crossterm(&upper).unwrap();
        assert_eq!(event.ch, Some('Q'));
        assert!(event.key.shift);

        let mut release = CrosstermKeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(KeyEvent::from_crossterm(&Event::Key(release)), None);

        assert_eq!(KeyEvent::from_crossterm(&Event::Resize(10, 10)), None);
    }
}
