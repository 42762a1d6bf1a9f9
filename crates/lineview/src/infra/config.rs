//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::IdScheme;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".lineview/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
/// Every field is optional so that a layer only overrides the settings it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ids: Ids,
    #[serde(default)]
    pub highlight: Highlight,
    #[serde(default)]
    pub render: Render,
}

/// Element identifier prefixes shared by the renderer and the fragment grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ids {
    #[serde(default)]
    anchor_prefix: Option<String>,
    #[serde(default)]
    code_prefix: Option<String>,
}

impl Ids {
    pub fn anchor_prefix(&self) -> &str {
        self.anchor_prefix.as_deref().unwrap_or("L")
    }

    pub fn code_prefix(&self) -> &str {
        self.code_prefix.as_deref().unwrap_or("codeline-")
    }

    pub fn scheme(&self) -> IdScheme {
        IdScheme::new(self.anchor_prefix(), self.code_prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Highlight {
    #[serde(default)]
    class: Option<String>,
}

impl Highlight {
    /// CSS class applied to highlighted anchors and code lines.
    pub fn class(&self) -> &str {
        self.class.as_deref().unwrap_or("line-highlight")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Render {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    syntax: Option<bool>,
    #[serde(default)]
    title: Option<String>,
}

impl Render {
    fn default_theme() -> &'static str {
        "base16-ocean.dark"
    }

    fn default_syntax() -> bool {
        true
    }

    pub fn theme(&self) -> String {
        self.theme
            .clone()
            .unwrap_or_else(|| Self::default_theme().to_owned())
    }

    pub fn syntax(&self) -> bool {
        self.syntax.unwrap_or_else(Self::default_syntax)
    }

    /// Page title override; the file name is used when unset.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    theme: Option<String>,
    highlight_class: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            theme: env::var("LINEVIEW_THEME").ok(),
            highlight_class: env::var("LINEVIEW_HIGHLIGHT_CLASS").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(theme: &str, highlight_class: &str) -> Self {
        Self {
            theme: Some(theme.to_owned()),
            highlight_class: Some(highlight_class.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Like [`Config::load`], with an explicit file layered on top of the workspace config.
    pub fn load_with_file(path: &Path) -> Result<Self> {
        let base = Self::load()?;
        let overlay = Self::from_file(path)?;
        Ok(apply_env_overrides(
            base.merge(overlay),
            EnvOverrides::from_env(),
        ))
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            ids: merge_ids(self.ids, other.ids),
            highlight: merge_highlight(self.highlight, other.highlight),
            render: merge_render(self.render, other.render),
        }
    }
}

fn merge_ids(base: Ids, overlay: Ids) -> Ids {
    Ids {
        anchor_prefix: choose(base.anchor_prefix, overlay.anchor_prefix),
        code_prefix: choose(base.code_prefix, overlay.code_prefix),
    }
}

fn merge_highlight(base: Highlight, overlay: Highlight) -> Highlight {
    Highlight {
        class: choose(base.class, overlay.class),
    }
}

fn merge_render(base: Render, overlay: Render) -> Render {
    Render {
        theme: choose(base.theme, overlay.theme),
        syntax: choose(base.syntax, overlay.syntax),
        title: choose(base.title, overlay.title),
    }
}

fn choose<T>(base: Option<T>, overlay: Option<T>) -> Option<T> {
    overlay.or(base)
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("lineview/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(theme) = env.theme {
        config.render.theme = Some(theme);
    }
    if let Some(class) = env.highlight_class {
        config.highlight.class = Some(class);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.ids.anchor_prefix(), "L");
        assert_eq!(config.ids.code_prefix(), "codeline-");
        assert_eq!(config.highlight.class(), "line-highlight");
        assert_eq!(config.render.theme(), "base16-ocean.dark");
        assert!(config.render.syntax());
        assert!(config.render.title().is_none());
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[highlight]
class = "selected"
[render]
theme = "InspiredGitHub"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".lineview"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".lineview/config.toml"),
            r#"
[render]
syntax = false
title = "kernel source"
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".lineview/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.highlight.class(), "selected");
        assert_eq!(config.render.theme(), "InspiredGitHub");
        assert!(!config.render.syntax());
        assert_eq!(config.render.title(), Some("kernel source"));
        assert_eq!(config.ids.anchor_prefix(), "L");

        Ok(())
    }

    #[test]
    fn later_layer_can_restore_default_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
[ids]
anchor_prefix = "n"
[highlight]
class = "selected"
"#,
        )?;
        let workspace = temp.path().join("workspace.toml");
        fs::write(
            &workspace,
            r#"
[ids]
anchor_prefix = "L"
[highlight]
class = "line-highlight"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(workspace), EnvOverrides::default())?;

        assert_eq!(config.ids.anchor_prefix(), "L");
        assert_eq!(config.highlight.class(), "line-highlight");
        Ok(())
    }

    #[test]
    fn repo_root_is_found_from_nested_dir() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested)?;
        fs::create_dir_all(temp.path().join(".git"))?;
        assert_eq!(find_repo_root(&nested), Some(temp.path().to_path_buf()));
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("Solarized (light)", "hl");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.render.theme(), "Solarized (light)");
        assert_eq!(config.highlight.class(), "hl");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
