//! Line registry: maps line numbers to their anchor and code elements.

use crate::domain::model::{CodeLine, IdScheme, LineAnchor, LineNumber};

/// Mutable view of the two display elements belonging to one line.
#[derive(Debug)]
pub struct LinePair<'a> {
    pub anchor: &'a mut LineAnchor,
    pub code: &'a mut CodeLine,
}

impl LinePair<'_> {
    /// Set both elements to the same highlight state.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.anchor.highlighted = highlighted;
        self.code.highlighted = highlighted;
    }
}

/// Capability supplied by the host page.
pub trait LineRegistry {
    /// Identifier convention used for anchors and code lines.
    fn scheme(&self) -> &IdScheme;

    /// Resolve an anchor identifier by exact match.
    fn resolve(&self, anchor_id: &str) -> Option<LineNumber>;

    fn lookup_mut(&mut self, line: LineNumber) -> Option<LinePair<'_>>;

    /// Reset every element to the unhighlighted state.
    fn clear_highlights(&mut self);

    /// Lines whose anchor is currently highlighted, ascending.
    fn highlighted_lines(&self) -> Vec<LineNumber>;
}

/// Dense registry for lines `1..=N` of a rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageLines {
    scheme: IdScheme,
    anchors: Vec<LineAnchor>,
    code: Vec<CodeLine>,
}

impl PageLines {
    pub fn new(line_count: usize, scheme: IdScheme) -> Self {
        let mut anchors = Vec::with_capacity(line_count);
        let mut code = Vec::with_capacity(line_count);
        for line in (1..=line_count).filter_map(LineNumber::new) {
            anchors.push(LineAnchor {
                id: scheme.anchor_id(line),
                line,
                highlighted: false,
            });
            code.push(CodeLine {
                id: scheme.code_id(line),
                line,
                highlighted: false,
            });
        }
        Self {
            scheme,
            anchors,
            code,
        }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn anchor(&self, line: LineNumber) -> Option<&LineAnchor> {
        self.anchors.get(line.get() - 1)
    }

    pub fn code(&self, line: LineNumber) -> Option<&CodeLine> {
        self.code.get(line.get() - 1)
    }

    /// Iterate over `(anchor, code)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (&LineAnchor, &CodeLine)> {
        self.anchors.iter().zip(self.code.iter())
    }
}

impl LineRegistry for PageLines {
    fn scheme(&self) -> &IdScheme {
        &self.scheme
    }

    fn resolve(&self, anchor_id: &str) -> Option<LineNumber> {
        let line = self.scheme.parse_anchor(anchor_id)?;
        self.anchor(line).map(|anchor| anchor.line)
    }

    fn lookup_mut(&mut self, line: LineNumber) -> Option<LinePair<'_>> {
        let index = line.get() - 1;
        let anchor = self.anchors.get_mut(index)?;
        let code = self.code.get_mut(index)?;
        debug_assert_eq!(anchor.line, code.line, "registry elements out of step");
        Some(LinePair { anchor, code })
    }

    fn clear_highlights(&mut self) {
        for anchor in &mut self.anchors {
            anchor.highlighted = false;
        }
        for code in &mut self.code {
            code.highlighted = false;
        }
    }

    fn highlighted_lines(&self) -> Vec<LineNumber> {
        self.anchors
            .iter()
            .filter(|anchor| anchor.highlighted)
            .map(|anchor| anchor.line)
            .collect()
    }
}
