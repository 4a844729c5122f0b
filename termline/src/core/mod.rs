// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod key_event;
pub mod log;
pub mod terminal_control;
pub mod test_fixtures;

// Re-export.
pub use key_event::*;
pub use log::*;
pub use terminal_control::*;
pub use test_fixtures::*;
