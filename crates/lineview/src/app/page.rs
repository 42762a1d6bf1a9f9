//! Static HTML rendering of a line-numbered source page.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use minijinja::Environment;
use serde::Serialize;

use crate::app::registry::PageLines;
use crate::app::source::SourceFile;
use crate::infra::config::Config;
use crate::infra::highlight::{HighlightLine, HighlightResult, Highlighter};

const PAGE_TEMPLATE_NAME: &str = "page.html";
const EXTERNAL_TEMPLATE_NAME: &str = "external.html";

/// Runtime options controlling page rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub theme: String,
    pub syntax: bool,
    pub highlight_class: String,
    /// Template file used instead of the built-in page.
    pub template: Option<PathBuf>,
}

impl RenderOptions {
    /// Build options from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.render.title().map(str::to_owned),
            theme: config.render.theme(),
            syntax: config.render.syntax(),
            highlight_class: config.highlight.class().to_owned(),
            template: None,
        }
    }
}

/// Renders sources together with the highlight state of their line registry.
pub struct PageRenderer {
    env: Environment<'static>,
    highlighter: Highlighter,
}

impl PageRenderer {
    /// Create a renderer with the built-in page template loaded.
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
            highlighter: Highlighter::new(),
        })
    }

    pub fn render(
        &self,
        source: &SourceFile,
        lines: &PageLines,
        options: &RenderOptions,
    ) -> Result<String> {
        if source.line_count() != lines.len() {
            bail!(
                "registry has {} lines but {} has {}",
                lines.len(),
                source.path.display(),
                source.line_count()
            );
        }

        let highlighted = if options.syntax && !source.lossy {
            self.highlighter
                .highlight(&source.path, &source.lines, &options.theme)
        } else {
            HighlightResult::plain(&source.lines, options.theme.clone())
        };

        let context = build_page_context(source, lines, &highlighted, options);
        match &options.template {
            Some(path) => render_external(path, &context),
            None => self
                .env
                .get_template(PAGE_TEMPLATE_NAME)
                .and_then(|template| template.render(&context))
                .map_err(|err| anyhow!("failed to render page: {err}")),
        }
    }

    /// Render and write the page to `path`, creating parent directories as needed.
    pub fn write(
        &self,
        source: &SourceFile,
        lines: &PageLines,
        options: &RenderOptions,
        path: &Path,
    ) -> Result<String> {
        let rendered = self.render(source, lines, options)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
        fs::write(path, &rendered)
            .with_context(|| format!("failed to write page to {}", path.display()))?;
        Ok(rendered)
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(PAGE_TEMPLATE_NAME, DEFAULT_PAGE_TEMPLATE)
        .map_err(|err| anyhow!("failed to register page template: {err}"))?;
    Ok(env)
}

fn render_external(path: &Path, context: &PageContext) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to load template from path {}", path.display()))?;
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(EXTERNAL_TEMPLATE_NAME, &source)
        .map_err(|err| anyhow!("invalid template '{}': {err}", path.display()))?;
    env.get_template(EXTERNAL_TEMPLATE_NAME)
        .and_then(|template| template.render(context))
        .map_err(|err| anyhow!("failed to render template '{}': {err}", path.display()))
}

fn build_page_context(
    source: &SourceFile,
    lines: &PageLines,
    highlighted: &HighlightResult,
    options: &RenderOptions,
) -> PageContext {
    let rendered_lines = lines
        .iter()
        .zip(&highlighted.lines)
        .map(|((anchor, code), markup)| {
            let (html, text) = match markup {
                HighlightLine::Markup(html) => (Some(html.clone()), None),
                HighlightLine::Text(text) => (None, Some(text.clone())),
            };
            PageLine {
                number: anchor.line.get(),
                anchor_id: anchor.id.clone(),
                code_id: code.id.clone(),
                anchor_highlighted: anchor.highlighted,
                code_highlighted: code.highlighted,
                html,
                text,
            }
        })
        .collect();

    PageContext {
        title: options.title.clone().unwrap_or_else(|| source.file_name()),
        path: source.path.display().to_string(),
        highlight_class: options.highlight_class.clone(),
        language: highlighted.language.clone(),
        background: highlighted.background.map(|color| color.to_css()),
        notice: source.notice.clone(),
        lines: rendered_lines,
    }
}

#[derive(Serialize)]
struct PageContext {
    title: String,
    path: String,
    highlight_class: String,
    language: Option<String>,
    background: Option<String>,
    notice: Option<String>,
    lines: Vec<PageLine>,
}

#[derive(Serialize)]
struct PageLine {
    number: usize,
    anchor_id: String,
    code_id: String,
    anchor_highlighted: bool,
    code_highlighted: bool,
    html: Option<String>,
    text: Option<String>,
}

const DEFAULT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
.linenodiv a { color: inherit; text-decoration: none; }
.{{ highlight_class }} { background-color: rgba(255, 214, 102, 0.25); }
</style>
</head>
<body>
{% if notice %}
<p class="notice">{{ notice }}</p>
{% endif %}
<div class="lxrcode"{% if language %} data-language="{{ language }}"{% endif %}{% if background %} style="background-color: {{ background }}"{% endif %}>
<table class="highlighttable">
<tr>
<td class="linenos"><div class="linenodiv"><pre>
{% for line in lines %}
<span{% if line.anchor_highlighted %} class="{{ highlight_class }}"{% endif %}><a href="#{{ line.anchor_id }}" id="{{ line.anchor_id }}" name="{{ line.anchor_id }}">{{ line.number }}</a></span>
{% endfor %}
</pre></div></td>
<td class="code"><div class="highlight"><pre>
{% for line in lines %}
<span id="{{ line.code_id }}"{% if line.code_highlighted %} class="{{ highlight_class }}"{% endif %}>{% if line.html %}{{ line.html|safe }}{% else %}{{ line.text }}{% endif %}</span>
{% endfor %}
</pre></div></td>
</tr>
</table>
</div>
</body>
</html>
"##;
