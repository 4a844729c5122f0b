// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::io;

/// Errors from [`crate::LineEditor::run`] and [`crate::EditorHandle`]. Ending a session,
/// either with Ctrl+C or because input ran out, is not an error, see
/// [`crate::SessionExit`].
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum EditorError {
    /// Reading key events or drawing to the terminal failed.
    #[error(transparent)]
    #[diagnostic(code(termline::editor::io))]
    IO(#[from] io::Error),

    /// The session loop is gone, so it can't receive a request for the next line.
    #[error("line editor session has ended")]
    #[diagnostic(
        code(termline::editor::request_channel_closed),
        help("keep `LineEditor::run` polled while requesting lines")
    )]
    RequestChannelClosed,

    /// A one-shot request was dropped before a line was submitted.
    #[error("line editor ended before the line was submitted")]
    #[diagnostic(code(termline::editor::reply_dropped))]
    ReplyDropped,
}
