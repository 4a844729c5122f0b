// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FALLBACK_TERMINAL_WIDTH, ok};
use crossterm::{QueueableCommand as _, cursor, terminal};
use std::io::{self, Write};

/// The only way the editor talks to the terminal. Everything the editor draws is built
/// out of "move the cursor left `n` columns" and "write this text at the cursor", so
/// the editor never reasons about control bytes.
///
/// The terminal is expected to be in raw, non-canonical, no-echo mode. Text is assumed
/// to occupy one column per `char`.
pub trait TerminalControl {
    /// Move the cursor `n` columns to the left. `n == 0` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn move_left(&mut self, n: usize) -> io::Result<()>;

    /// Write `text` at the cursor, advancing the cursor past it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Move to column 0 of the next row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn new_line(&mut self) -> io::Result<()>;

    /// Width of the terminal in columns.
    fn width(&self) -> u16;

    /// # Errors
    ///
    /// Returns an error if flushing the terminal fails.
    fn flush(&mut self) -> io::Result<()>;

    /// Blank out an entry of `len` characters whose cursor sits at `cursor`, leaving the
    /// terminal cursor where the entry started: cursor-left × `cursor`, space × `len`,
    /// cursor-left × `len`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn erase_visible_line(&mut self, cursor: usize, len: usize) -> io::Result<()> {
        self.move_left(cursor)?;
        self.write_text(&" ".repeat(len))?;
        self.move_left(len)?;
        ok!()
    }
}

/// [`TerminalControl`] for a real terminal, usually [`std::io::Stdout`]. Cursor motion
/// is queued as crossterm commands and goes out on [`TerminalControl::flush`].
#[derive(Debug)]
pub struct CrosstermTerminal<W: Write> {
    pub writer: W,
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(writer: W) -> Self { Self { writer } }
}

impl<W: Write> TerminalControl for CrosstermTerminal<W> {
    fn move_left(&mut self, n: usize) -> io::Result<()> {
        // CSI 0 D moves one column on most terminals, so never emit it.
        if n == 0 {
            return ok!();
        }
        let n = u16::try_from(n).unwrap_or(u16::MAX);
        self.writer.queue(cursor::MoveLeft(n))?;
        ok!()
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    fn new_line(&mut self) -> io::Result<()> {
        // Raw mode turns off output post processing, so `\n` alone won't return the
        // carriage.
        self.writer.write_all(b"\r\n")
    }

    fn width(&self) -> u16 {
        terminal::size().map_or(FALLBACK_TERMINAL_WIDTH, |(columns, _)| columns)
    }

    fn flush(&mut self) -> io::Result<()> { self.writer.flush() }
}

/// Puts the terminal in raw mode for as long as this value is alive.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// # Errors
    ///
    /// Returns an error if raw mode can't be enabled (e.g. stdin isn't a tty).
    pub fn try_new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) { _ = terminal::disable_raw_mode(); }
}
