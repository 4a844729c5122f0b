// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # syncsh
//!
//! A small interactive shell over a sync root directory, built on [`termline`]. It
//! shows how an owning application drives the line editor:
//!
//! 1. Register a [`termline::CompletionSource`], here [`DirectoryCompletionSource`],
//!    which lists the files under the root on every tab press.
//! 2. Subscribe to submitted lines and handle each one in [`Shell`].
//! 3. Call [`termline::EditorHandle::request_next_line`] when done with a line. Keys
//!    typed while a command runs are queued until then.
//!
//! The `exit` command asks for confirmation with a one-shot
//! [`termline::EditorHandle::read_line`] request.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
pub mod clap_config;
pub mod commands;
pub mod completion_source;
pub mod launcher;
pub mod shell;
pub mod ui_str;

// Re-export.
pub use clap_config::*;
pub use commands::*;
pub use completion_source::*;
pub use launcher::*;
pub use shell::*;

/// File names listed in this file, at the sync root, are never offered for completion.
pub const SYNC_IGNORE_FILE_NAME: &str = ".file_syncignore";
