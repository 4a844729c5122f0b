// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CompletionSource, Editor, EditorConfig, EditorError, KeyEventResult, KeyOutcome,
            PinnedInputStream, SubmissionTarget, TerminalControl};
use futures_util::StreamExt as _;
use tokio::sync::{broadcast,
                  mpsc::{self, UnboundedReceiver, UnboundedSender},
                  oneshot};

/// Requests that an [`EditorHandle`] sends to the session loop.
#[derive(Debug)]
pub enum EditorRequest {
    NextLine {
        prompt: Option<String>,
        target: SubmissionTarget,
    },
}

/// Why [`LineEditor::run`] returned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionExit {
    /// The user pressed Ctrl+C.
    Interrupted,
    /// The key event stream ended.
    InputClosed,
}

/// How the owning application talks to a running [`LineEditor`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EditorHandle {
    request_sender: UnboundedSender<EditorRequest>,
}

impl EditorHandle {
    /// Ask for the next line. It is delivered to [`LineEditor::subscribe`] receivers.
    /// This is also how the application says it is ready again after handling a line,
    /// which replays anything typed in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RequestChannelClosed`] if the editor is gone.
    pub fn request_next_line(&self, prompt: Option<&str>) -> Result<(), EditorError> {
        self.send(prompt, SubmissionTarget::Broadcast)
    }

    /// Ask for the next line and wait for it. Subscribers don't see this line.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor is gone before the line is submitted.
    pub async fn read_line(&self, prompt: Option<&str>) -> Result<String, EditorError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.send(prompt, SubmissionTarget::OneShot(reply_sender))?;
        reply_receiver.await.map_err(|_| EditorError::ReplyDropped)
    }

    fn send(&self, prompt: Option<&str>, target: SubmissionTarget) -> Result<(), EditorError> {
        self.request_sender
            .send(EditorRequest::NextLine {
                prompt: prompt.map(str::to_owned),
                target,
            })
            .map_err(|_| EditorError::RequestChannelClosed)
    }
}

/// Owns the [`Editor`] and runs it against a stream of key events.
///
/// Everything happens on the task that awaits [`Self::run`]: key events, requests from
/// [`EditorHandle`]s and finished completion lookups are handled one at a time.
#[derive(Debug)]
pub struct LineEditor<T: TerminalControl> {
    editor: Editor<T>,
    request_sender: UnboundedSender<EditorRequest>,
    request_receiver: UnboundedReceiver<EditorRequest>,
}

impl<T: TerminalControl> LineEditor<T> {
    pub fn new(terminal: T, config: EditorConfig) -> Self {
        let (request_sender, request_receiver) = mpsc::unbounded_channel();
        Self {
            editor: Editor::new(terminal, config),
            request_sender,
            request_receiver,
        }
    }

    pub fn handle(&self) -> EditorHandle {
        EditorHandle {
            request_sender: self.request_sender.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> { self.editor.subscribe() }

    pub fn register_completion_source(&mut self, source: impl CompletionSource + 'static) {
        self.editor.register_completion_source(source);
    }

    pub fn editor(&self) -> &Editor<T> { &self.editor }

    /// Process input until Ctrl+C or the end of `input_stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading key events or drawing to the terminal fails.
    pub async fn run(
        &mut self,
        mut input_stream: PinnedInputStream<KeyEventResult>,
    ) -> Result<SessionExit, EditorError> {
        loop {
            let outcome = tokio::select! {
                biased;

                // Poll for next-line requests.
                // This branch is cancel safe because recv is cancel safe.
                Some(request) = self.request_receiver.recv() => {
                    let EditorRequest::NextLine { prompt, target } = request;
                    self.editor.request_next_line(prompt.as_deref(), target)?
                }

                // Poll for finished completion lookups, oldest tab press first.
                // This branch is cancel safe because FuturesOrdered::next is cancel safe.
                Some(result) = self.editor.next_completion(),
                    if self.editor.has_pending_completions() =>
                {
                    self.editor.apply_completion(result)?;
                    KeyOutcome::Continue
                }

                // Poll for key events.
                // This branch is cancel safe because no state is declared inside the
                // future, if it is dropped no event is lost.
                maybe_key_event = input_stream.next() => {
                    match maybe_key_event {
                        Some(Ok(key_event)) => self.editor.handle_key(key_event)?,
                        Some(Err(err)) => return Err(err.into()),
                        None => {
                            tracing::debug!(message = "key event stream ended");
                            return Ok(SessionExit::InputClosed);
                        }
                    }
                }
            };

            if outcome == KeyOutcome::Terminate {
                return Ok(SessionExit::Interrupted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionCandidateSet, CompletionError, KeyEvent, VirtualTerminal,
                gen_input_stream, key_results_for_line};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Key events that never end, so the session only stops on Ctrl+C or when the test
    /// stops polling it.
    fn input_then_pending(key_events: Vec<KeyEventResult>) -> PinnedInputStream<KeyEventResult> {
        Box::pin(gen_input_stream(key_events).chain(futures_util::stream::pending()))
    }

    fn lines(texts: &[&str]) -> Vec<KeyEventResult> {
        texts
            .iter()
            .flat_map(|text| key_results_for_line(text))
            .collect()
    }

    #[tokio::test]
    async fn test_broadcast_submissions_in_order() {
        let term = VirtualTerminal::default();
        let mut line_editor = LineEditor::new(term.clone(), EditorConfig::default());
        let mut submissions = line_editor.subscribe();
        let handle = line_editor.handle();

        let app = async {
            let mut received = vec![];
            handle.request_next_line(None).unwrap();
            for _ in 0..2 {
                received.push(submissions.recv().await.unwrap());
                // Simulate a slow command; typed keys are queued meanwhile.
                tokio::time::sleep(Duration::from_millis(5)).await;
                handle.request_next_line(None).unwrap();
            }
            received
        };

        let received = tokio::select! {
            _ = line_editor.run(input_then_pending(lines(&["ls", "pwd"]))) => {
                panic!("session ended early")
            }
            received = app => received,
        };

        assert_eq!(received, vec!["ls", "pwd"]);
        assert_eq!(term.scrollback(), vec!["$ ls", "$ pwd"]);
    }

    #[tokio::test]
    async fn test_read_line_is_one_shot() {
        let mut line_editor =
            LineEditor::new(VirtualTerminal::default(), EditorConfig::default());
        let mut submissions = line_editor.subscribe();
        let handle = line_editor.handle();

        let answer = tokio::select! {
            _ = line_editor.run(input_then_pending(lines(&["y"]))) => {
                panic!("session ended early")
            }
            answer = handle.read_line(Some("Do you wish to exit? (y/n): ")) => answer.unwrap(),
        };

        assert_eq!(answer, "y");
        assert!(submissions.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_completion_lands_before_next_key() {
        let mut line_editor =
            LineEditor::new(VirtualTerminal::default(), EditorConfig::default());
        line_editor.register_completion_source(|| async {
            Ok::<_, CompletionError>(
                CompletionCandidateSet::new().with_command("build", Vec::<String>::new()),
            )
        });
        let mut submissions = line_editor.subscribe();
        let handle = line_editor.handle();
        handle.request_next_line(None).unwrap();

        let keys = vec![
            Ok(KeyEvent::character('b')),
            Ok(KeyEvent::named(crate::KeyName::Tab)),
            Ok(KeyEvent::named(crate::KeyName::Return)),
        ];

        let line = tokio::select! {
            _ = line_editor.run(input_then_pending(keys)) => panic!("session ended early"),
            line = submissions.recv() => line.unwrap(),
        };

        assert_eq!(line, "build");
    }

    #[tokio::test]
    async fn test_ctrl_c_ends_session() {
        let mut line_editor =
            LineEditor::new(VirtualTerminal::default(), EditorConfig::default());
        let keys = vec![Ok(KeyEvent::character('a')), Ok(KeyEvent::ctrl('c'))];

        let exit = line_editor.run(input_then_pending(keys)).await.unwrap();

        assert_eq!(exit, SessionExit::Interrupted);
        // The gate was never opened, so 'a' is still queued.
        assert_eq!(line_editor.editor().pending_len(), 1);
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let mut line_editor =
            LineEditor::new(VirtualTerminal::default(), EditorConfig::default());

        let exit = line_editor.run(gen_input_stream(vec![])).await.unwrap();

        assert_eq!(exit, SessionExit::InputClosed);
    }

    #[tokio::test]
    async fn test_input_error_is_returned() {
        let mut line_editor =
            LineEditor::new(VirtualTerminal::default(), EditorConfig::default());
        let keys: Vec<KeyEventResult> = vec![Err(std::io::Error::other("tty gone"))];

        let result = line_editor.run(gen_input_stream(keys)).await;

        assert!(matches!(result, Err(EditorError::IO(_))));
    }

    #[tokio::test]
    async fn test_handle_outliving_editor() {
        let line_editor = LineEditor::new(VirtualTerminal::default(), EditorConfig::default());
        let handle = line_editor.handle();
        drop(line_editor);

        assert!(matches!(
            handle.request_next_line(None),
            Err(EditorError::RequestChannelClosed)
        ));
        assert!(matches!(
            handle.read_line(None).await,
            Err(EditorError::RequestChannelClosed)
        ));
    }
}
