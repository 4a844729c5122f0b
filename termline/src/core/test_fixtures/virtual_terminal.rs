// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FALLBACK_TERMINAL_WIDTH, StdMutex, TerminalControl, ok};
use std::{io, sync::Arc};

/// A screen model for tests: the finished rows (scrollback), the row the cursor is on,
/// and the cursor column. It applies [`TerminalControl`] operations the way a raw-mode
/// terminal would, so tests can assert on what the user actually sees.
///
/// Clones share the same screen.
#[derive(Clone, Debug)]
pub struct VirtualTerminal {
    pub screen: Arc<StdMutex<VirtualScreen>>,
    pub width: u16,
}

#[derive(Debug, Default)]
pub struct VirtualScreen {
    pub scrollback: Vec<String>,
    pub row: Vec<char>,
    pub column: usize,
    /// Set if anything tried to move left of column 0.
    pub moved_past_column_zero: bool,
}

impl Default for VirtualTerminal {
    fn default() -> Self { Self::new(FALLBACK_TERMINAL_WIDTH) }
}

#[allow(clippy::missing_panics_doc)]
impl VirtualTerminal {
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self {
            screen: Arc::new(StdMutex::new(VirtualScreen::default())),
            width,
        }
    }

    /// The row under the cursor, with trailing blanks removed.
    #[must_use]
    pub fn current_row(&self) -> String {
        let screen = self.screen.lock().unwrap();
        screen.row.iter().collect::<String>().trim_end().to_owned()
    }

    #[must_use]
    pub fn cursor_column(&self) -> usize { self.screen.lock().unwrap().column }

    #[must_use]
    pub fn scrollback(&self) -> Vec<String> { self.screen.lock().unwrap().scrollback.clone() }

    #[must_use]
    pub fn moved_past_column_zero(&self) -> bool {
        self.screen.lock().unwrap().moved_past_column_zero
    }

    /// Scrollback rows followed by the current row.
    #[must_use]
    pub fn all_rows(&self) -> Vec<String> {
        let mut rows = self.scrollback();
        rows.push(self.current_row());
        rows
    }
}

impl TerminalControl for VirtualTerminal {
    fn move_left(&mut self, n: usize) -> io::Result<()> {
        let mut screen = self.screen.lock().map_err(|_| io::Error::other("poisoned"))?;
        if n > screen.column {
            screen.moved_past_column_zero = true;
        }
        screen.column = screen.column.saturating_sub(n);
        ok!()
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut screen = self.screen.lock().map_err(|_| io::Error::other("poisoned"))?;
        for ch in text.chars() {
            let column = screen.column;
            if column < screen.row.len() {
                screen.row[column] = ch;
            } else {
                screen.row.resize(column, ' ');
                screen.row.push(ch);
            }
            screen.column += 1;
        }
        ok!()
    }

    fn new_line(&mut self) -> io::Result<()> {
        let mut screen = self.screen.lock().map_err(|_| io::Error::other("poisoned"))?;
        let finished = screen.row.iter().collect::<String>().trim_end().to_owned();
        screen.scrollback.push(finished);
        screen.row.clear();
        screen.column = 0;
        ok!()
    }

    fn width(&self) -> u16 { self.width }

    fn flush(&mut self) -> io::Result<()> { ok!() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_and_cursor() {
        let mut term = VirtualTerminal::default();
        term.write_text("$ hello").unwrap();
        term.move_left(5).unwrap();
        term.write_text("J").unwrap();

        pretty_assertions::assert_eq!(term.current_row(), "$ Jello");
        assert_eq!(term.cursor_column(), 3);
        assert!(!term.moved_past_column_zero());
    }

    #[test]
    fn test_new_line_moves_row_to_scrollback() {
        let mut term = VirtualTerminal::default();
        term.write_text("one  ").unwrap();
        term.new_line().unwrap();
        term.write_text("two").unwrap();

        pretty_assertions::assert_eq!(term.all_rows(), vec!["one", "two"]);
        assert_eq!(term.cursor_column(), 3);
    }

    #[test]
    fn test_move_past_column_zero_is_flagged() {
        let mut term = VirtualTerminal::default();
        term.write_text("a").unwrap();
        term.move_left(2).unwrap();

        assert!(term.moved_past_column_zero());
        assert_eq!(term.cursor_column(), 0);
    }
}
