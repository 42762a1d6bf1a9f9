//! Syntax colouring of source lines into inline-styled HTML, built on top of syntect.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const DEFAULT_THEME: &str = "base16-ocean.dark";

static DEFAULT_ASSETS: Lazy<(Arc<SyntaxSet>, Arc<ThemeSet>)> = Lazy::new(|| {
    (
        Arc::new(SyntaxSet::load_defaults_newlines()),
        Arc::new(ThemeSet::load_defaults()),
    )
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One rendered line: either trusted markup produced by syntect or raw text still to be escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightLine {
    Markup(String),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    Highlighted,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightResult {
    pub lines: Vec<HighlightLine>,
    pub language: Option<String>,
    pub theme: String,
    pub background: Option<RgbColor>,
    pub mode: HighlightMode,
}

impl HighlightResult {
    pub fn plain(lines: &[String], theme: String) -> Self {
        HighlightResult {
            lines: lines.iter().cloned().map(HighlightLine::Text).collect(),
            language: None,
            theme,
            background: None,
            mode: HighlightMode::Plain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    syntax_set: Arc<SyntaxSet>,
    theme_set: Arc<ThemeSet>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        let assets = &*DEFAULT_ASSETS;
        Self {
            syntax_set: Arc::clone(&assets.0),
            theme_set: Arc::clone(&assets.1),
        }
    }

    pub fn highlight(&self, path: &Path, lines: &[String], theme: &str) -> HighlightResult {
        let Some(resolved) = self.resolve_theme(theme) else {
            tracing::warn!(requested = theme, "no themes available");
            return HighlightResult::plain(lines, theme.to_string());
        };
        let theme_name = resolved.name.to_string();

        let Some((syntax, language)) = self.syntax_for_path(path) else {
            return HighlightResult::plain(lines, theme_name);
        };

        match self.highlight_with_syntax(lines, resolved.theme, syntax) {
            Ok(highlighted) => HighlightResult {
                lines: highlighted,
                language: Some(language),
                theme: theme_name,
                background: resolved.theme.settings.background.and_then(convert_color),
                mode: HighlightMode::Highlighted,
            },
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "highlight failed");
                HighlightResult::plain(lines, theme_name)
            }
        }
    }

    fn highlight_with_syntax(
        &self,
        lines: &[String],
        theme: &Theme,
        syntax: &SyntaxReference,
    ) -> Result<Vec<HighlightLine>> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut result = Vec::with_capacity(lines.len());
        for line in lines {
            // The newline-aware syntax set expects terminated lines.
            let terminated = format!("{line}\n");
            let regions: Vec<_> = highlighter
                .highlight_line(&terminated, &self.syntax_set)?
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches('\n')))
                .filter(|(_, text)| !text.is_empty())
                .collect();
            let html = styled_line_to_highlighted_html(&regions, IncludeBackground::No)?;
            result.push(HighlightLine::Markup(html));
        }
        Ok(result)
    }

    fn syntax_for_path(&self, path: &Path) -> Option<(&SyntaxReference, String)> {
        match self.syntax_set.find_syntax_for_file(path) {
            Ok(Some(syntax)) => Some((syntax, syntax.name.clone())),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "syntax lookup failed");
                None
            }
        }
    }

    fn resolve_theme<'a>(&'a self, requested: &'a str) -> Option<ResolvedTheme<'a>> {
        if let Some(theme) = self.theme_set.themes.get(requested) {
            return Some(ResolvedTheme {
                name: Cow::Borrowed(requested),
                theme,
            });
        }

        if let Some((name, theme)) = self
            .theme_set
            .themes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(requested))
        {
            return Some(ResolvedTheme {
                name: Cow::Owned(name.clone()),
                theme,
            });
        }

        let (fallback_name, theme) = self
            .theme_set
            .themes
            .get_key_value(DEFAULT_THEME)
            .or_else(|| self.theme_set.themes.iter().next())?;

        tracing::warn!(
            requested,
            fallback = %fallback_name,
            "theme not found"
        );

        Some(ResolvedTheme {
            name: Cow::Owned(fallback_name.clone()),
            theme,
        })
    }
}

#[derive(Debug, Clone)]
struct ResolvedTheme<'a> {
    name: Cow<'a, str>,
    theme: &'a Theme,
}

fn convert_color(color: syntect::highlighting::Color) -> Option<RgbColor> {
    if color.a == 0 {
        None
    } else {
        Some(RgbColor {
            r: color.r,
            g: color.g,
            b: color.b,
        })
    }
}
