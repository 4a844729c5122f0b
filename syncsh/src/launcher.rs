// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CLIArg, DirectoryCompletionSource, Shell};
use miette::IntoDiagnostic as _;
use std::io::{IsTerminal as _, Write};
use termline::{CrosstermTerminal, EditorConfig, KeyEventResult, LineEditor, PinnedInputStream,
               RawModeGuard, SessionExit, TerminalControl, crossterm_key_stream};
use tokio::sync::broadcast;

/// How the app ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppExit {
    /// The user confirmed `exit`.
    UserExit,
    /// Ctrl+C.
    Interrupted,
    /// The terminal stopped sending key events.
    InputClosed,
}

impl From<SessionExit> for AppExit {
    fn from(session_exit: SessionExit) -> Self {
        match session_exit {
            SessionExit::Interrupted => AppExit::Interrupted,
            SessionExit::InputClosed => AppExit::InputClosed,
        }
    }
}

#[must_use]
pub fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Take over the terminal and run the shell until it exits. Raw mode is restored before
/// this returns.
///
/// # Errors
///
/// Returns an error if raw mode can't be enabled, or if the session fails.
pub async fn run_app(cli_arg: CLIArg) -> miette::Result<AppExit> {
    let CLIArg {
        root,
        recursive,
        prompt,
        ..
    } = cli_arg;

    let _raw_mode = RawModeGuard::try_new().into_diagnostic()?;

    let mut line_editor = LineEditor::new(
        CrosstermTerminal::new(std::io::stdout()),
        EditorConfig {
            default_prompt: prompt,
        },
    );
    line_editor.register_completion_source(DirectoryCompletionSource::new(&root, recursive));
    let submissions = line_editor.subscribe();
    let mut shell = Shell::new(root, recursive, std::io::stdout(), line_editor.handle());

    run_shell_session(
        &mut line_editor,
        &mut shell,
        submissions,
        crossterm_key_stream(),
    )
    .await
}

/// Drive the editor and the shell together until one of them ends.
///
/// # Errors
///
/// Returns an error if the editor or the shell fails.
pub async fn run_shell_session<T: TerminalControl, W: Write>(
    line_editor: &mut LineEditor<T>,
    shell: &mut Shell<W>,
    submissions: broadcast::Receiver<String>,
    input_stream: PinnedInputStream<KeyEventResult>,
) -> miette::Result<AppExit> {
    tokio::select! {
        result = line_editor.run(input_stream) => Ok(AppExit::from(result?)),
        result = shell.run(submissions) => {
            result?;
            Ok(AppExit::UserExit)
        }
    }
}
