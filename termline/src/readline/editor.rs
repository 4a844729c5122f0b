// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CHANNEL_CAPACITY, CompletionCandidateSet, CompletionError, CompletionFuture,
            CompletionOutcome, CompletionSource, DEFAULT_PROMPT, EditAction, GateState,
            HISTORY_COMMAND, HistoryRing, KeyEvent, LineState, PauseGate, SubmissionTarget,
            TerminalControl, format_columns, ok, resolve_completion};
use futures_util::{StreamExt as _, stream::FuturesOrdered};
use std::{io, sync::Arc};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Written when a request for a line doesn't bring its own prompt, and after the
    /// history listing or a completion listing.
    pub default_prompt: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_prompt: DEFAULT_PROMPT.into(),
        }
    }
}

/// Whether the session keeps going after a key event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    /// Ctrl+C was pressed.
    Terminate,
}

/// All of the editor's mutable state, and the key dispatcher that drives it.
///
/// Every mutating key leaves the terminal row showing `prompt + buffer` with the
/// terminal cursor at `prompt + cursor`. Nothing here awaits: completion lookups are
/// queued in [`Self::next_completion`] and their results come back through
/// [`Self::apply_completion`], which is how [`crate::LineEditor`] drives it.
pub struct Editor<T: TerminalControl> {
    config: EditorConfig,
    terminal: T,
    line: LineState,
    history: HistoryRing,
    gate: PauseGate,
    active_prompt: String,
    tab_repeat_count: usize,
    completion_source: Option<Arc<dyn CompletionSource>>,
    in_flight_completions: FuturesOrdered<CompletionFuture>,
    submission_sender: broadcast::Sender<String>,
}

impl<T: TerminalControl> std::fmt::Debug for Editor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("line", &self.line)
            .field("history", &self.history)
            .field("gate", &self.gate)
            .field("tab_repeat_count", &self.tab_repeat_count)
            .field("in_flight_completions", &self.in_flight_completions.len())
            .finish_non_exhaustive()
    }
}

impl<T: TerminalControl> Editor<T> {
    pub fn new(terminal: T, config: EditorConfig) -> Self {
        let (submission_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            active_prompt: config.default_prompt.clone(),
            config,
            terminal,
            line: LineState::new(),
            history: HistoryRing::new(),
            gate: PauseGate::new(),
            tab_repeat_count: 0,
            completion_source: None,
            in_flight_completions: FuturesOrdered::new(),
            submission_sender,
        }
    }

    pub fn line(&self) -> &LineState { &self.line }

    pub fn history(&self) -> &HistoryRing { &self.history }

    pub fn gate_state(&self) -> GateState { self.gate.state() }

    pub fn pending_len(&self) -> usize { self.gate.pending_len() }

    pub fn tab_repeat_count(&self) -> usize { self.tab_repeat_count }

    pub fn terminal(&self) -> &T { &self.terminal }

    /// Lines submitted without a one-shot target are sent here.
    pub fn subscribe(&self) -> broadcast::Receiver<String> { self.submission_sender.subscribe() }

    pub fn register_completion_source(&mut self, source: impl CompletionSource + 'static) {
        self.completion_source = Some(Arc::new(source));
    }

    pub fn has_pending_completions(&self) -> bool { !self.in_flight_completions.is_empty() }

    /// Result of the oldest in-flight completion lookup, or `None` if there is none.
    pub async fn next_completion(
        &mut self,
    ) -> Option<Result<CompletionCandidateSet, CompletionError>> {
        self.in_flight_completions.next().await
    }

    /// Feed one key event through the gate. While paused the event is queued.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub fn handle_key(&mut self, event: KeyEvent) -> io::Result<KeyOutcome> {
        let Some(event) = self.gate.admit(event) else {
            return ok!(KeyOutcome::Continue);
        };
        let outcome = self.dispatch(&event)?;
        self.terminal.flush()?;
        ok!(outcome)
    }

    /// Open the gate, write the prompt, and replay queued keys in arrival order. Replay
    /// stops as soon as a replayed `return` submits a line; the rest stays queued.
    ///
    /// Asking again while a request is already open only swaps the submission target.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub fn request_next_line(
        &mut self,
        prompt: Option<&str>,
        target: SubmissionTarget,
    ) -> io::Result<KeyOutcome> {
        if self.gate.is_ready() {
            tracing::debug!(message = "next line already requested, replacing target");
            self.gate.resume(target);
            return ok!(KeyOutcome::Continue);
        }

        self.active_prompt = prompt.unwrap_or(&self.config.default_prompt).to_owned();
        self.gate.resume(target);
        self.terminal.write_text(&self.active_prompt)?;

        // % is Display, ? is Debug.
        tracing::debug!(message = "replaying queued keys", count = %self.gate.pending_len());
        while let Some(event) = self.gate.next_pending() {
            if self.dispatch(&event)? == KeyOutcome::Terminate {
                self.terminal.flush()?;
                return ok!(KeyOutcome::Terminate);
            }
        }

        self.terminal.flush()?;
        ok!(KeyOutcome::Continue)
    }

    fn dispatch(&mut self, event: &KeyEvent) -> io::Result<KeyOutcome> {
        let action = EditAction::from(event);
        if action != EditAction::Complete {
            self.tab_repeat_count = 0;
        }

        match action {
            EditAction::MoveLeft => {
                if self.line.move_left() {
                    self.terminal.move_left(1)?;
                }
            }
            EditAction::MoveRight => {
                if let Some(crossed) = self.line.move_right() {
                    self.terminal.write_text(crossed.encode_utf8(&mut [0; 4]))?;
                }
            }
            EditAction::MoveHome => {
                let columns = self.line.move_home();
                self.terminal.move_left(columns)?;
            }
            EditAction::MoveEnd => {
                let crossed = self.line.move_end();
                self.terminal.write_text(&crossed)?;
            }
            EditAction::Backspace => {
                if self.line.remove_before_cursor() {
                    self.terminal.move_left(1)?;
                    self.redraw_tail_after_removal()?;
                }
            }
            EditAction::Delete => {
                if self.line.remove_at_cursor() {
                    self.redraw_tail_after_removal()?;
                }
            }
            EditAction::Insert(ch) => {
                self.line.insert(ch);
                self.terminal.write_text(ch.encode_utf8(&mut [0; 4]))?;
                if !self.line.is_cursor_at_end() {
                    let tail = self.line.tail().to_owned();
                    self.terminal.write_text(&tail)?;
                    self.terminal.move_left(tail.chars().count())?;
                }
            }
            EditAction::HistoryPrevious => {
                let live_line = self.line.buffer().to_owned();
                if let Some(entry) = self.history.recall_previous(&live_line).map(str::to_owned) {
                    self.replace_visible_line(entry)?;
                }
            }
            EditAction::HistoryNext => {
                if let Some(entry) = self.history.recall_next() {
                    self.replace_visible_line(entry)?;
                }
            }
            EditAction::Complete => self.start_completion(),
            EditAction::Submit => self.submit()?,
            EditAction::Interrupt => {
                tracing::debug!(message = "interrupted");
                return ok!(KeyOutcome::Terminate);
            }
            EditAction::Ignore => {}
        }

        ok!(KeyOutcome::Continue)
    }

    /// The tail shifted one column left; rewrite it plus one blank over the stale last
    /// character, then step back to the cursor.
    fn redraw_tail_after_removal(&mut self) -> io::Result<()> {
        let tail = self.line.tail().to_owned();
        self.terminal.write_text(&format!("{tail} "))?;
        self.terminal.move_left(tail.chars().count() + 1)?;
        ok!()
    }

    fn replace_visible_line(&mut self, text: String) -> io::Result<()> {
        self.terminal
            .erase_visible_line(self.line.cursor(), self.line.len())?;
        self.terminal.write_text(&text)?;
        self.line.replace(text);
        ok!()
    }

    fn start_completion(&mut self) {
        if self.line.is_empty() {
            return;
        }
        if let Some(source) = &self.completion_source {
            let source = Arc::clone(source);
            self.in_flight_completions
                .push_back(Box::pin(async move { source.fetch_candidates().await }));
        }
    }

    fn submit(&mut self) -> io::Result<()> {
        self.history.clear_draft();
        let text = self.line.take();
        self.terminal.new_line()?;

        if text.is_empty() {
            self.terminal.write_text(&self.active_prompt)?;
            return ok!();
        }

        if text == HISTORY_COMMAND {
            self.history.push(text);
            for row in self.history.listing() {
                self.terminal.write_text(&row)?;
                self.terminal.new_line()?;
            }
            self.active_prompt.clone_from(&self.config.default_prompt);
            self.terminal.write_text(&self.active_prompt)?;
            return ok!();
        }

        self.history.push(text.clone());
        tracing::debug!(message = "line submitted", line = %text);

        match self.gate.pause() {
            SubmissionTarget::OneShot(reply) => {
                if reply.send(text).is_err() {
                    tracing::debug!(message = "one-shot reply was dropped");
                }
            }
            SubmissionTarget::Broadcast => {
                if self.submission_sender.send(text).is_err() {
                    tracing::debug!(message = "no subscribers for submitted line");
                }
            }
        }
        ok!()
    }

    /// Apply the result of the oldest completion lookup to the line as it is now.
    /// Failures are dropped without touching the line.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub fn apply_completion(
        &mut self,
        result: Result<CompletionCandidateSet, CompletionError>,
    ) -> io::Result<()> {
        let candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::debug!(message = "completion source failed", error = ?err);
                return ok!();
            }
        };
        if self.line.is_empty() || !self.gate.is_ready() {
            return ok!();
        }

        let outcome = resolve_completion(self.line.buffer(), &candidates);
        tracing::debug!(message = "completion", outcome = ?outcome);
        match outcome {
            CompletionOutcome::NoMatch => self.tab_repeat_count = 0,
            CompletionOutcome::Complete(new_line) | CompletionOutcome::Extend(new_line) => {
                self.rewrite_line(new_line)?;
                self.tab_repeat_count = 0;
            }
            CompletionOutcome::Ambiguous(matches) => {
                self.tab_repeat_count += 1;
                if self.tab_repeat_count >= 2 {
                    self.print_listing(&matches)?;
                    self.tab_repeat_count = 0;
                }
            }
        }

        self.terminal.flush()
    }

    /// Redraw only what differs between the current line and `new_line`, leaving the
    /// cursor at the end.
    fn rewrite_line(&mut self, new_line: String) -> io::Result<()> {
        let old: Vec<char> = self.line.buffer().chars().collect();
        let new: Vec<char> = new_line.chars().collect();
        let cursor = self.line.cursor();
        let shared = old.iter().zip(&new).take_while(|(a, b)| a == b).count();

        if cursor > shared {
            self.terminal.move_left(cursor - shared)?;
        } else {
            self.terminal
                .write_text(&old[cursor..shared].iter().collect::<String>())?;
        }
        self.terminal
            .write_text(&new[shared..].iter().collect::<String>())?;

        let stale = old.len().saturating_sub(new.len());
        if stale > 0 {
            self.terminal.write_text(&" ".repeat(stale))?;
            self.terminal.move_left(stale)?;
        }

        self.line.replace(new_line);
        ok!()
    }

    /// Print `matches` in columns below the line, then the default prompt and the
    /// unchanged line with the cursor at the end.
    fn print_listing(&mut self, matches: &[String]) -> io::Result<()> {
        self.terminal.new_line()?;
        for row in format_columns(matches, self.terminal.width()) {
            self.terminal.write_text(&row)?;
            self.terminal.new_line()?;
        }
        self.active_prompt.clone_from(&self.config.default_prompt);
        self.terminal.write_text(&self.active_prompt)?;
        self.terminal.write_text(self.line.buffer())?;
        self.line.move_end();
        ok!()
    }
}
