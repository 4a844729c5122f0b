// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// The entry being edited and the cursor inside it. The cursor counts `char`s, not
/// bytes, and always satisfies `0 <= cursor <= len()`.
///
/// Only the buffer bookkeeping lives here. Working out what to send to the terminal for
/// each edit is the job of [`crate::Editor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    buffer: String,
    cursor: usize,
}

impl LineState {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn buffer(&self) -> &str { &self.buffer }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    /// Length in `char`s.
    #[must_use]
    pub fn len(&self) -> usize { self.buffer.chars().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    #[must_use]
    pub fn is_cursor_at_end(&self) -> bool { self.cursor == self.len() }

    /// Everything from the cursor to the end of the buffer.
    #[must_use]
    pub fn tail(&self) -> &str { &self.buffer[self.byte_offset(self.cursor)..] }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map_or(self.buffer.len(), |(offset, _)| offset)
    }

    /// Insert `ch` at the cursor and step over it.
    pub fn insert(&mut self, ch: char) {
        let offset = self.byte_offset(self.cursor);
        self.buffer.insert(offset, ch);
        self.cursor += 1;
    }

    /// Remove the character before the cursor. Returns `false` at column 0.
    pub fn remove_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let offset = self.byte_offset(self.cursor);
        self.buffer.remove(offset);
        true
    }

    /// Remove the character under the cursor. Returns `false` at end of line.
    pub fn remove_at_cursor(&mut self) -> bool {
        if self.is_cursor_at_end() {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        self.buffer.remove(offset);
        true
    }

    /// Returns `false` if the cursor was already at column 0.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step right over one character and return it, or `None` at end of line.
    pub fn move_right(&mut self) -> Option<char> {
        let crossed = self.tail().chars().next()?;
        self.cursor += 1;
        Some(crossed)
    }

    /// Returns how many columns the cursor moved back.
    pub fn move_home(&mut self) -> usize { std::mem::take(&mut self.cursor) }

    /// Returns the text the cursor stepped over.
    pub fn move_end(&mut self) -> String {
        let crossed = self.tail().to_owned();
        self.cursor = self.len();
        crossed
    }

    /// Replace the whole line, with the cursor at the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.len();
    }

    /// Take the line out, leaving an empty buffer with the cursor at 0.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }
}
