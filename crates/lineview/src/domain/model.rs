//! Domain models for line numbers, ranges, selections, and the per-line display elements.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// One-based source line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineNumber(NonZeroUsize);

impl LineNumber {
    /// Returns `None` for zero.
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Absolute distance in lines.
    pub fn distance(self, other: LineNumber) -> usize {
        self.get().abs_diff(other.get())
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive, ordered span of lines. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRange {
    start: LineNumber,
    end: LineNumber,
}

impl LineRange {
    /// Build a range from two endpoints given in either order.
    pub fn new(a: LineNumber, b: LineNumber) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn single(line: LineNumber) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn start(&self) -> LineNumber {
        self.start
    }

    pub fn end(&self) -> LineNumber {
        self.end
    }

    /// Lines in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = LineNumber> + use<> {
        (self.start.get()..=self.end.get()).filter_map(LineNumber::new)
    }
}

/// The current line selection of a page.
///
/// Endpoints are stored as recorded and may be out of order; anything that renders or serializes
/// the selection goes through [`Selection::normalized`] first. An unset `end` means a single-line
/// selection at `start`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    start: Option<LineNumber>,
    end: Option<LineNumber>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(line: LineNumber) -> Self {
        Self {
            start: Some(line),
            end: None,
        }
    }

    /// Record both endpoints exactly as given.
    pub fn between(start: LineNumber, end: LineNumber) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn start(&self) -> Option<LineNumber> {
        self.start
    }

    pub fn end(&self) -> Option<LineNumber> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    pub fn normalized(&self) -> Option<LineRange> {
        let start = self.start?;
        Some(match self.end {
            Some(end) => LineRange::new(start, end),
            None => LineRange::single(start),
        })
    }
}

/// Clickable line-number marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAnchor {
    pub id: String,
    pub line: LineNumber,
    pub highlighted: bool,
}

/// Rendered code text of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine {
    pub id: String,
    pub line: LineNumber,
    pub highlighted: bool,
}

/// Naming convention for the element identifiers of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    pub anchor_prefix: String,
    pub code_prefix: String,
}

impl IdScheme {
    pub fn new(anchor_prefix: impl Into<String>, code_prefix: impl Into<String>) -> Self {
        Self {
            anchor_prefix: anchor_prefix.into(),
            code_prefix: code_prefix.into(),
        }
    }

    pub fn anchor_id(&self, line: LineNumber) -> String {
        format!("{}{}", self.anchor_prefix, line)
    }

    pub fn code_id(&self, line: LineNumber) -> String {
        format!("{}{}", self.code_prefix, line)
    }

    /// Parse an anchor identifier back into its line number.
    ///
    /// Only the canonical spelling is accepted: `L7` resolves, `L07`, `L+7` and `l7` do not.
    pub fn parse_anchor(&self, id: &str) -> Option<LineNumber> {
        let digits = id.strip_prefix(self.anchor_prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let line = LineNumber::new(digits.parse().ok()?)?;
        (self.anchor_id(line) == id).then_some(line)
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        Self::new("L", "codeline-")
    }
}

/// Keyboard modifiers held during a click.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    /// Ctrl or Cmd: the browser opens the link elsewhere and the page must not react.
    pub fn opens_new_context(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A click on a line-number anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClick {
    pub line: LineNumber,
    pub modifiers: Modifiers,
}

impl LineClick {
    pub fn plain(line: LineNumber) -> Self {
        Self {
            line,
            modifiers: Modifiers::none(),
        }
    }

    pub fn with_shift(line: LineNumber) -> Self {
        Self {
            line,
            modifiers: Modifiers::shift(),
        }
    }
}
