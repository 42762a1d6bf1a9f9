//! Location and history integration.

use crate::domain::model::LineNumber;

/// Capability for reading and writing the page's navigable location.
pub trait Navigator {
    fn current_fragment(&self) -> &str;

    /// Replace the fragment without a full navigation, recording a history entry.
    fn push_fragment(&mut self, fragment: &str);

    fn scroll_into_view(&mut self, line: LineNumber);
}

/// In-memory session history with back/forward traversal.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
    scrolled_to: Option<LineNumber>,
}

impl History {
    /// Start a session whose initial location carries `fragment` (possibly empty).
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            entries: vec![fragment.into()],
            cursor: 0,
            scrolled_to: None,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Last line scrolled into view, if any.
    pub fn scrolled_to(&self) -> Option<LineNumber> {
        self.scrolled_to
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back one entry and return the fragment now current.
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current_fragment())
    }

    /// Step forward one entry and return the fragment now current.
    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current_fragment())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Navigator for History {
    fn current_fragment(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn push_fragment(&mut self, fragment: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(fragment.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn scroll_into_view(&mut self, line: LineNumber) {
        self.scrolled_to = Some(line);
    }
}
