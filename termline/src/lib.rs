// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # termline
//!
//! A character-accurate line editor that runs on top of a raw, non-canonical terminal.
//! There is no line discipline to lean on, so every keystroke is turned into the exact
//! sequence of "move left", "write text" operations that keeps the visible line and the
//! in-memory buffer identical.
//!
//! # Components
//!
//! | Module                            | Responsibility                                      |
//! |-----------------------------------|-----------------------------------------------------|
//! | [`core::terminal_control`]        | Cursor-left, write, erase idiom against a terminal  |
//! | [`core::key_event`]               | Decoded key events and the [`EditAction`] decoder   |
//! | [`readline::line_state`]          | Entry buffer and cursor offset                      |
//! | [`readline::history`]             | Submitted lines, browse index, saved draft          |
//! | [`readline::completion`]          | Async candidate source and prefix completion policy |
//! | [`readline::pause_gate`]          | Buffers key events between submission and resume   |
//! | [`readline::editor`]              | Key dispatcher that owns all of the above           |
//! | [`readline::line_editor`]         | Async session loop and the application handle       |
//!
//! # Data flow
//!
//! ```text
//! key events ─▶ PauseGate ─▶ Editor::dispatch ─▶ LineState | HistoryRing | completion
//!                   ▲                                  │
//!                   │                                  ▼
//!      EditorHandle::request_next_line         TerminalControl (redraw)
//! ```
//!
//! When a line is submitted, the gate flips to paused and the line is handed to the
//! application, either through a one-shot reply ([`EditorHandle::read_line`]) or through
//! the broadcast channel ([`LineEditor::subscribe`]). Keys typed while the application
//! is busy are queued and replayed, in order, on the next
//! [`EditorHandle::request_next_line`].
//!
//! # Example
//!
//! ```no_run
//! use termline::{CrosstermTerminal, EditorConfig, LineEditor, RawModeGuard,
//!                crossterm_key_stream};
//!
//! # async fn run() -> miette::Result<()> {
//! let _raw_mode = RawModeGuard::try_new().map_err(|e| miette::miette!("{e}"))?;
//! let mut line_editor =
//!     LineEditor::new(CrosstermTerminal::new(std::io::stdout()), EditorConfig::default());
//! let mut submissions = line_editor.subscribe();
//! let handle = line_editor.handle();
//!
//! tokio::select! {
//!     _ = line_editor.run(crossterm_key_stream()) => {}
//!     _ = async {
//!         handle.request_next_line(None).ok();
//!         while let Ok(line) = submissions.recv().await {
//!             // Do the work, then ask for the next line.
//!             let _ = line;
//!             handle.request_next_line(None).ok();
//!         }
//!     } => {}
//! }
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod core;
pub mod readline;

// Re-export.
#[allow(ambiguous_glob_reexports)]
pub use core::*;
#[allow(ambiguous_glob_reexports)]
pub use readline::*;

// Type aliases.
use futures_core::Stream;
use std::pin::Pin;

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;

/// Item type of the stream that feeds [`LineEditor::run`].
pub type KeyEventResult = std::io::Result<KeyEvent>;

// Constants.
pub const CHANNEL_CAPACITY: usize = 1_000;
pub const DEFAULT_PROMPT: &str = "$ ";
/// Submitting this text lists the history locally instead of handing it to the
/// application.
pub const HISTORY_COMMAND: &str = "history";
/// Extra columns added to the longest candidate when laying out a completion listing.
pub const COMPLETION_COLUMN_GUTTER: usize = 5;
/// Used when the terminal can't report its size.
pub const FALLBACK_TERMINAL_WIDTH: u16 = 80;

/// Shorthand for `Ok(())` or `Ok(value)`.
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}
