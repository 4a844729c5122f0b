// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::KeyEvent;
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// Whether key events are dispatched as they arrive or queued.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Key events are dispatched immediately.
    Ready,
    /// A line was submitted and the application hasn't asked for the next one yet. Key
    /// events are queued.
    Paused,
}

/// Where the next submitted line goes, chosen by each request for a line.
#[derive(Debug, Default)]
pub enum SubmissionTarget {
    /// Resolve this one-shot reply with the line.
    OneShot(oneshot::Sender<String>),
    /// Send the line to every subscriber of the submission channel.
    #[default]
    Broadcast,
}

/// Single-slot flow control between line submission and the application's next
/// request. Ctrl+C is never queued.
#[derive(Debug)]
pub struct PauseGate {
    state: GateState,
    pending: VecDeque<KeyEvent>,
    target: SubmissionTarget,
}

impl Default for PauseGate {
    fn default() -> Self { Self::new() }
}

impl PauseGate {
    /// Starts paused: nothing is dispatched until the application asks for a line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GateState::Paused,
            pending: VecDeque::new(),
            target: SubmissionTarget::Broadcast,
        }
    }

    #[must_use]
    pub fn state(&self) -> GateState { self.state }

    #[must_use]
    pub fn is_ready(&self) -> bool { self.state == GateState::Ready }

    #[must_use]
    pub fn pending_len(&self) -> usize { self.pending.len() }

    /// Hand `event` back for immediate dispatch, or queue it while paused.
    pub fn admit(&mut self, event: KeyEvent) -> Option<KeyEvent> {
        if self.is_ready() || event.is_interrupt() {
            return Some(event);
        }
        // % is Display, ? is Debug.
        tracing::trace!(message = "queued key event", event = ?event);
        self.pending.push_back(event);
        None
    }

    /// Start accepting input again. The caller drains [`Self::next_pending`] right away.
    pub fn resume(&mut self, target: SubmissionTarget) {
        self.state = GateState::Ready;
        self.target = target;
    }

    /// The oldest queued event, only while ready. Once a replayed `return` pauses the
    /// gate again this yields `None` and the rest stays queued.
    pub fn next_pending(&mut self) -> Option<KeyEvent> {
        if self.is_ready() {
            self.pending.pop_front()
        } else {
            None
        }
    }

    /// Pause and hand out the submission target of the request that just completed.
    pub fn pause(&mut self) -> SubmissionTarget {
        self.state = GateState::Paused;
        std::mem::take(&mut self.target)
    }
}
