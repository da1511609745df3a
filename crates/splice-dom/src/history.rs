//! History API
//!
//! Session history for pushState/replaceState, back, forward and go.

use url::Url;

/// History entry
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub url: Url,
    pub title: String,
    /// JSON-serialized state
    pub state: Option<String>,
}

/// Session history
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl History {
    pub fn new(initial_url: Url) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url,
                title: String::new(),
                state: None,
            }],
            current: 0,
        }
    }

    /// Push a new history entry, dropping forward history
    pub fn push_state(&mut self, state: Option<String>, title: &str, url: Url) {
        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry {
            url,
            title: title.to_string(),
            state,
        });
        self.current = self.entries.len() - 1;
    }

    /// Replace current entry
    pub fn replace_state(&mut self, state: Option<String>, title: &str, url: Url) {
        let entry = &mut self.entries[self.current];
        entry.url = url;
        entry.title = title.to_string();
        entry.state = state;
    }

    /// Go back
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.go(-1)
    }

    /// Go forward
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        self.go(1)
    }

    /// Go to a relative offset; out-of-range offsets are ignored
    pub fn go(&mut self, delta: isize) -> Option<&HistoryEntry> {
        let index = self.current.checked_add_signed(delta)?;
        if index >= self.entries.len() {
            return None;
        }
        self.current = index;
        Some(&self.entries[index])
    }

    /// Get current entry
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Get history length
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
