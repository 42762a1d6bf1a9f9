//! Line-range selection driven by clicks on line-number anchors and by the URL fragment.

use tracing::debug;

use crate::app::fragment::{self, Fragment};
use crate::app::navigation::Navigator;
use crate::app::registry::LineRegistry;
use crate::domain::model::{LineClick, LineNumber, LineRange, Modifiers, Selection};

/// Result of handling a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A new-context modifier was held; the host keeps its default link behaviour.
    PassThrough,
    /// The click target was not a line on the page.
    Ignored,
    /// The selection changed and `fragment` was written to the location.
    Updated { fragment: String },
}

/// Owns the page's line selection and keeps the registry's highlight flags in step with it.
#[derive(Debug)]
pub struct RangeSelector<R, N> {
    selection: Selection,
    registry: R,
    navigator: N,
}

impl<R: LineRegistry, N: Navigator> RangeSelector<R, N> {
    /// Create a selector with an empty selection.
    pub fn new(registry: R, navigator: N) -> Self {
        Self {
            selection: Selection::empty(),
            registry,
            navigator,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn into_parts(self) -> (R, N) {
        (self.registry, self.navigator)
    }

    /// Canonical fragment for the current selection, if any.
    pub fn fragment(&self) -> Option<String> {
        let range = self.selection.normalized()?;
        let scheme = self.registry.scheme();
        Some(match self.selection.end() {
            None => fragment::line_fragment(scheme, range.start()),
            Some(_) => fragment::range_fragment(scheme, range),
        })
    }

    /// Apply a `#L<a>-L<b>` fragment read from the location on page load.
    ///
    /// Anything that is not exactly a two-part range of known anchors is ignored without touching
    /// the current state. Returns whether the fragment was applied.
    pub fn init_from_fragment(&mut self, fragment: &str) -> bool {
        let (first_id, last_id) = match fragment::parse_range(fragment) {
            Ok(ids) => ids,
            Err(err) => {
                debug!(fragment, error = %err, "ignoring fragment");
                return false;
            }
        };

        let (Some(first), Some(last)) = (
            self.registry.resolve(first_id),
            self.registry.resolve(last_id),
        ) else {
            debug!(fragment, "fragment references unknown lines");
            return false;
        };

        self.selection = Selection::between(first, last);
        let range = LineRange::new(first, last);
        self.registry.clear_highlights();
        self.highlight_range(range.start(), range.end());
        self.navigator.scroll_into_view(range.start());
        debug!(start = %range.start(), end = %range.end(), "selection restored from fragment");
        true
    }

    /// React to the location's fragment changing underneath the page (history traversal or a
    /// manually edited address).
    pub fn on_fragment_change(&mut self, fragment: &str) {
        self.clear();
        if self.init_from_fragment(fragment) {
            return;
        }
        match fragment::parse(fragment, self.registry.scheme()) {
            Ok(Fragment::Line(line)) => {
                if self.highlight_range(line, line) {
                    self.selection = Selection::single(line);
                    self.navigator.scroll_into_view(line);
                }
            }
            Ok(Fragment::Range(..)) => {}
            Err(err) => debug!(fragment, error = %err, "fragment carries no line selection"),
        }
    }

    /// Handle a click on the anchor with the given identifier.
    pub fn on_anchor_click(&mut self, anchor_id: &str, modifiers: Modifiers) -> ClickOutcome {
        if modifiers.opens_new_context() {
            return ClickOutcome::PassThrough;
        }
        match self.registry.resolve(anchor_id) {
            Some(line) => self.on_line_click(LineClick { line, modifiers }),
            None => {
                debug!(anchor_id, "click outside line anchors");
                ClickOutcome::Ignored
            }
        }
    }

    /// Update the selection for a click on `click.line`.
    ///
    /// A plain click starts a new single-line selection. A shift-click extends the range when the
    /// line lies outside it, or pulls the nearer boundary in when it lies inside (ties move the
    /// end).
    pub fn on_line_click(&mut self, click: LineClick) -> ClickOutcome {
        if click.modifiers.opens_new_context() {
            return ClickOutcome::PassThrough;
        }
        let clicked = click.line;
        if self.registry.lookup_mut(clicked).is_none() {
            debug!(line = %clicked, "click on a line outside the page");
            return ClickOutcome::Ignored;
        }

        self.registry.clear_highlights();

        let fragment = match self.selection.start() {
            Some(start) if click.modifiers.shift => {
                let range = extend_range(start, self.selection.end().unwrap_or(start), clicked);
                self.selection = Selection::between(range.start(), range.end());
                self.highlight_range(range.start(), range.end());
                fragment::range_fragment(self.registry.scheme(), range)
            }
            _ => {
                self.selection = Selection::single(clicked);
                self.highlight_range(clicked, clicked);
                fragment::line_fragment(self.registry.scheme(), clicked)
            }
        };

        self.navigator.push_fragment(&fragment);
        debug!(line = %clicked, shift = click.modifiers.shift, %fragment, "selection updated");
        ClickOutcome::Updated { fragment }
    }

    /// Mark every anchor and code line in `first..=last` as highlighted.
    ///
    /// Does nothing when either endpoint is missing from the registry. Returns whether anything
    /// was marked.
    pub fn highlight_range(&mut self, first: LineNumber, last: LineNumber) -> bool {
        debug_assert!(first <= last, "highlight range {first}..={last} is reversed");
        if self.registry.lookup_mut(first).is_none() || self.registry.lookup_mut(last).is_none() {
            return false;
        }
        for line in LineRange::new(first, last).lines() {
            if let Some(mut pair) = self.registry.lookup_mut(line) {
                pair.set_highlighted(true);
            }
        }
        true
    }

    /// Drop the selection and every highlight.
    pub fn clear(&mut self) {
        self.selection = Selection::empty();
        self.registry.clear_highlights();
    }
}

/// Compute the range after a shift-click on `clicked`, given the recorded endpoints in any order.
fn extend_range(start: LineNumber, end: LineNumber, clicked: LineNumber) -> LineRange {
    let current = LineRange::new(start, end);
    let (mut start, mut end) = (current.start(), current.end());

    if clicked < start {
        start = clicked;
    } else if clicked > end {
        end = clicked;
    } else if clicked.distance(start) < clicked.distance(end) {
        start = clicked;
    } else {
        end = clicked;
    }

    LineRange::new(start, end)
}
