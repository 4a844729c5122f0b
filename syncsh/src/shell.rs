// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, list_files, stat_file,
            ui_str::{EXIT_CONFIRMATION_PROMPT, EXIT_DECLINED_MSG, HELP_ROWS,
                     UNRECOGNIZED_COMMAND_MSG, no_such_file_msg, stat_usage_msg}};
use miette::IntoDiagnostic as _;
use std::{io::Write, ops::ControlFlow, path::PathBuf};
use termline::EditorHandle;
use tokio::sync::broadcast::{self, error::RecvError};

/// Handles each submitted line, then asks the editor for the next one.
///
/// While a command runs the editor is paused, so output written here never interleaves
/// with the prompt or with echoed keys. Rows end in `\r\n` because the terminal is in
/// raw mode.
#[derive(Debug)]
pub struct Shell<W: Write> {
    pub root: PathBuf,
    pub recursive: bool,
    output: W,
    handle: EditorHandle,
}

impl<W: Write> Shell<W> {
    pub fn new(root: impl Into<PathBuf>, recursive: bool, output: W, handle: EditorHandle) -> Self {
        Self {
            root: root.into(),
            recursive,
            output,
            handle,
        }
    }

    /// Ask for the first line, then handle submissions until the user confirms `exit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor goes away or output can't be written.
    pub async fn run(&mut self, mut submissions: broadcast::Receiver<String>) -> miette::Result<()> {
        self.handle.request_next_line(None)?;
        loop {
            let line = match submissions.recv().await {
                Ok(line) => line,
                Err(RecvError::Lagged(skipped)) => {
                    // % is Display, ? is Debug.
                    tracing::warn!(message = "submissions skipped", skipped = %skipped);
                    continue;
                }
                Err(RecvError::Closed) => return Ok(()),
            };
            if self.process_line(&line).await?.is_break() {
                return Ok(());
            }
        }
    }

    /// Run one command. Every path that doesn't exit ends with a request for the next
    /// line, which also replays anything typed while the command ran.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor goes away or output can't be written.
    pub async fn process_line(&mut self, line: &str) -> miette::Result<ControlFlow<()>> {
        let command = Command::parse(line);
        tracing::debug!(message = "processing command", command = ?command);

        match command {
            Command::Empty => {}
            Command::Help => {
                for row in HELP_ROWS {
                    self.write_row(row)?;
                }
            }
            Command::Ls(names) => self.ls(names).await?,
            Command::Stat(names) => self.stat(names).await?,
            Command::Exit => {
                let answer = self
                    .handle
                    .read_line(Some(EXIT_CONFIRMATION_PROMPT))
                    .await?;
                if matches!(answer.as_str(), "y" | "Y") {
                    return Ok(ControlFlow::Break(()));
                }
                self.write_row(EXIT_DECLINED_MSG)?;
            }
            Command::Unrecognized(_) => self.write_row(UNRECOGNIZED_COMMAND_MSG)?,
        }

        self.output.flush().into_diagnostic()?;
        self.handle.request_next_line(None)?;
        Ok(ControlFlow::Continue(()))
    }

    async fn ls(&mut self, names: Vec<String>) -> miette::Result<()> {
        let names = if names.is_empty() {
            match list_files(&self.root, self.recursive).await {
                Ok(names) => names,
                Err(err) => return self.write_row(&format!("ls: {err}")),
            }
        } else {
            names
        };

        for name in names {
            let row = match stat_file(&self.root, &name).await {
                Ok(info) => info.listing_row(),
                Err(_) => no_such_file_msg(&name),
            };
            self.write_row(&row)?;
        }
        Ok(())
    }

    async fn stat(&mut self, names: Vec<String>) -> miette::Result<()> {
        if names.is_empty() {
            return self.write_row(&stat_usage_msg());
        }
        for name in names {
            let row = match stat_file(&self.root, &name).await {
                Ok(info) => info.stat_row(),
                Err(_) => no_such_file_msg(&name),
            };
            self.write_row(&row)?;
        }
        Ok(())
    }

    fn write_row(&mut self, row: &str) -> miette::Result<()> {
        write!(self.output, "{row}\r\n").into_diagnostic()
    }
}
