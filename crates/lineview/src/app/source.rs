//! Loading source files into the lines a page displays.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 1024;

/// A source file split into display lines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
    /// Set when invalid UTF-8 was replaced during decoding.
    pub lossy: bool,
    pub notice: Option<String>,
}

impl SourceFile {
    /// Read `path` into lines, stripping `\n` and `\r\n` terminators.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("file not found: {}", path.display()));
        }

        if Self::is_binary(path)? {
            tracing::debug!(path = %path.display(), "binary content, no lines rendered");
            return Ok(Self {
                path: path.to_path_buf(),
                lines: Vec::new(),
                lossy: false,
                notice: Some(format!(
                    "Binary file {} cannot be displayed.",
                    path.display()
                )),
            });
        }

        let (lines, lossy) = Self::read_lines(path)?;
        let notice = lossy.then(|| {
            "Displayed without syntax highlighting due to invalid UTF-8.".to_string()
        });

        Ok(Self {
            path: path.to_path_buf(),
            lines,
            lossy,
            notice,
        })
    }

    /// Build a source from in-memory text.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_owned).collect(),
            lossy: false,
            notice: None,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// File name used for page titles.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn is_binary(path: &Path) -> Result<bool> {
        let mut file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut buf = [0u8; BINARY_SNIFF_LEN];
        let read = file.read(&mut buf)?;
        Ok(buf[..read].contains(&0))
    }

    fn read_lines(path: &Path) -> Result<(Vec<String>, bool)> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let mut raw = Vec::new();
        let mut lines = Vec::new();
        let mut lossy = false;

        loop {
            raw.clear();
            let bytes = reader
                .read_until(b'\n', &mut raw)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if bytes == 0 {
                break;
            }
            if raw.ends_with(b"\n") {
                raw.pop();
                if raw.ends_with(b"\r") {
                    raw.pop();
                }
            }
            let text = String::from_utf8_lossy(&raw);
            if matches!(text, Cow::Owned(_)) {
                lossy = true;
            }
            lines.push(text.into_owned());
        }

        Ok((lines, lossy))
    }
}
