//! Command line interface.

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::app::navigation::History;
use crate::app::page::{PageRenderer, RenderOptions};
use crate::app::registry::{LineRegistry, PageLines};
use crate::app::selector::{ClickOutcome, RangeSelector};
use crate::app::source::SourceFile;
use crate::domain::errors::ClickParseError;
use crate::domain::model::Modifiers;
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "lineview",
    author,
    version,
    about = "Render line-numbered source pages with shareable line-range highlights"
)]
pub struct Cli {
    /// Extra config file layered over the user and workspace config
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a source file as a static HTML page
    Render(RenderArgs),
    /// Replay a fragment and clicks against a page of N lines and print the selection
    Select(SelectArgs),
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, clap::Args)]
struct InteractionArgs {
    /// Location fragment present when the page loads, e.g. '#L10-L25'
    #[arg(long, value_name = "FRAGMENT")]
    fragment: Option<String>,

    /// Click on a line anchor, e.g. 'L7', 'shift+L12' or 'ctrl+L3'; repeatable
    #[arg(long = "click", value_name = "CLICK")]
    clicks: Vec<ClickSpec>,

    /// Navigate back this many history entries after the clicks
    #[arg(long, default_value_t = 0)]
    back: usize,

    /// Then navigate forward this many history entries
    #[arg(long, default_value_t = 0)]
    forward: usize,
}

#[derive(Debug, clap::Args)]
struct RenderArgs {
    file: PathBuf,

    #[command(flatten)]
    interaction: InteractionArgs,

    /// Write the page here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Disable syntax colouring
    #[arg(long)]
    no_syntax: bool,

    #[arg(long)]
    theme: Option<String>,

    /// Template file used instead of the built-in page
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct SelectArgs {
    /// Number of lines on the page
    #[arg(long)]
    lines: usize,

    #[command(flatten)]
    interaction: InteractionArgs,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// A click on a line anchor as written on the command line: `[modifier+]...<anchor id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickSpec {
    pub anchor_id: String,
    pub modifiers: Modifiers,
}

impl FromStr for ClickSpec {
    type Err = ClickParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = value.trim().split('+').collect();
        let anchor_id = parts.pop().unwrap_or_default().trim();
        if anchor_id.is_empty() {
            return Err(ClickParseError::InvalidAnchor(value.to_string()));
        }

        let mut modifiers = Modifiers::none();
        for part in parts {
            match part.trim().to_ascii_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                other => return Err(ClickParseError::UnknownModifier(other.to_string())),
            }
        }

        Ok(Self {
            anchor_id: anchor_id.to_string(),
            modifiers,
        })
    }
}

/// Selection state reported by `lineview select`.
#[derive(Debug, Serialize)]
struct SelectionReport {
    fragment: Option<String>,
    start: Option<usize>,
    end: Option<usize>,
    highlighted: Vec<usize>,
    history: Vec<String>,
}

/// Parse arguments from the process and run the requested command.
pub fn run() -> Result<()> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_with_file(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Render(args) => render(&config, args),
        Commands::Select(args) => select(&config, args),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "lineview", &mut io::stdout());
            Ok(())
        }
    }
}

fn render(config: &Config, args: RenderArgs) -> Result<()> {
    let source = SourceFile::load(&args.file)?;
    let registry = PageLines::new(source.line_count(), config.ids.scheme());
    let selector = interact(registry, &args.interaction);
    let (registry, _) = selector.into_parts();

    let mut options = RenderOptions::from_config(config);
    if args.no_syntax {
        options.syntax = false;
    }
    if let Some(theme) = args.theme {
        options.theme = theme;
    }
    options.template = args.template;

    let renderer = PageRenderer::new()?;
    match &args.output {
        Some(path) => {
            renderer.write(&source, &registry, &options, path)?;
            tracing::info!(path = %path.display(), "page written");
        }
        None => {
            let rendered = renderer.render(&source, &registry, &options)?;
            io::stdout()
                .write_all(rendered.as_bytes())
                .context("failed to write page to stdout")?;
        }
    }
    Ok(())
}

fn select(config: &Config, args: SelectArgs) -> Result<()> {
    let registry = PageLines::new(args.lines, config.ids.scheme());
    let selector = interact(registry, &args.interaction);

    let range = selector.selection().normalized();
    let report = SelectionReport {
        fragment: selector.fragment(),
        start: range.map(|range| range.start().get()),
        end: range.map(|range| range.end().get()),
        highlighted: selector
            .registry()
            .highlighted_lines()
            .into_iter()
            .map(|line| line.get())
            .collect(),
        history: selector.navigator().entries().to_vec(),
    };

    let mut stdout = io::stdout().lock();
    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialize selection")?;
        writeln!(stdout, "{json}")?;
    } else {
        match (&report.fragment, range) {
            (Some(fragment), Some(range)) => writeln!(
                stdout,
                "{fragment} (lines {}-{})",
                range.start(),
                range.end()
            )?,
            _ => writeln!(stdout, "no selection")?,
        }
    }
    Ok(())
}

/// Load the page with the given fragment, then replay clicks and back/forward traversal.
fn interact(registry: PageLines, args: &InteractionArgs) -> RangeSelector<PageLines, History> {
    let initial = args.fragment.clone().unwrap_or_default();
    let mut selector = RangeSelector::new(registry, History::new(initial.clone()));
    selector.init_from_fragment(&initial);

    for click in &args.clicks {
        match selector.on_anchor_click(&click.anchor_id, click.modifiers) {
            ClickOutcome::Updated { fragment } => {
                tracing::debug!(click = %click.anchor_id, %fragment, "click applied")
            }
            ClickOutcome::PassThrough => {
                tracing::info!(click = %click.anchor_id, "new-context click left to the browser")
            }
            ClickOutcome::Ignored => {
                tracing::warn!(click = %click.anchor_id, "click target is not a line anchor")
            }
        }
    }

    for _ in 0..args.back {
        let Some(fragment) = selector.navigator_mut().back().map(str::to_owned) else {
            break;
        };
        selector.on_fragment_change(&fragment);
    }
    for _ in 0..args.forward {
        let Some(fragment) = selector.navigator_mut().forward().map(str::to_owned) else {
            break;
        };
        selector.on_fragment_change(&fragment);
    }

    selector
}
