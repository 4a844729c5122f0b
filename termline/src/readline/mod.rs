// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod completion;
pub mod editor;
pub mod editor_error;
pub mod history;
pub mod line_editor;
pub mod line_state;
pub mod pause_gate;

// Re-export.
pub use completion::*;
pub use editor::*;
pub use editor_error::*;
pub use history::*;
pub use line_editor::*;
pub use line_state::*;
pub use pause_gate::*;
