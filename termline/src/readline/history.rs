// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Submitted lines in submission order, plus the state needed to browse them with the
/// up and down keys.
///
/// - `browse_index` is in `0..=entries.len()`; `entries.len()` means "not browsing".
/// - `saved_draft` holds the line that was being typed when browsing started, and is
///   only meaningful while browsing.
///
/// Entries are never removed or de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRing {
    entries: Vec<String>,
    browse_index: usize,
    saved_draft: Option<String>,
}

impl HistoryRing {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn entries(&self) -> &[String] { &self.entries }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn browse_index(&self) -> usize { self.browse_index }

    #[must_use]
    pub fn is_browsing(&self) -> bool { self.browse_index < self.entries.len() }

    #[must_use]
    pub fn saved_draft(&self) -> Option<&str> { self.saved_draft.as_deref() }

    /// Append a submitted line and stop browsing.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.browse_index = self.entries.len();
    }

    pub fn clear_draft(&mut self) { self.saved_draft = None; }

    /// Step back one entry. When browsing starts, `live_line` is saved so that
    /// [`Self::recall_next`] can bring it back. Returns `None` at the oldest entry.
    pub fn recall_previous(&mut self, live_line: &str) -> Option<&str> {
        if self.browse_index == 0 {
            return None;
        }
        if !self.is_browsing() {
            self.saved_draft = Some(live_line.to_owned());
        }
        self.browse_index -= 1;
        Some(&self.entries[self.browse_index])
    }

    /// Step forward one entry. Stepping past the newest entry ends browsing and returns
    /// the saved draft. Returns `None` when not browsing.
    pub fn recall_next(&mut self) -> Option<String> {
        if !self.is_browsing() {
            return None;
        }
        self.browse_index += 1;
        if self.is_browsing() {
            Some(self.entries[self.browse_index].clone())
        } else {
            Some(self.saved_draft.take().unwrap_or_default())
        }
    }

    /// 1-indexed listing of every entry, one formatted row per entry.
    #[must_use]
    pub fn listing(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| format!(" {:>3}  {entry}", index + 1))
            .collect()
    }
}
