//! Interactive file selection for the path editor.
//!
//! The [`FileChooser`] trait decouples path editing from how the operator
//! picks a file. The terminal session prompts on its own input stream; tests
//! use scripted choosers that return predetermined answers.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Single extension a chooser accepts, e.g. `Executable (*.exe)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    pub label: String,
    pub extension: String,
}

impl ExtensionFilter {
    pub fn executable(extension: &str) -> Self {
        Self {
            label: "Executable".to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Case-insensitive extension match.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    pub fn pattern(&self) -> String {
        format!("{} (*.{})", self.label, self.extension)
    }
}

/// Parameters for one file selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooseRequest {
    pub title: String,
    /// Directory the selection starts in; relative answers resolve against it.
    pub start_dir: PathBuf,
    pub filter: ExtensionFilter,
}

/// Abstraction over file selection surfaces.
pub trait FileChooser {
    /// Returns the chosen path, or `None` if the operator cancelled.
    fn choose(&mut self, request: &ChooseRequest) -> Result<Option<PathBuf>>;
}

/// Chooser that prompts for a path on a line-oriented terminal.
///
/// An empty line (or end of input) cancels. A path that does not match the
/// filter is treated as a cancellation.
pub struct PromptChooser<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> PromptChooser<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> FileChooser for PromptChooser<'_, R, W> {
    fn choose(&mut self, request: &ChooseRequest) -> Result<Option<PathBuf>> {
        writeln!(self.output, "{}", request.title).context("write prompt")?;
        writeln!(
            self.output,
            "  start: {}  filter: {}  (empty line cancels)",
            request.start_dir.display(),
            request.filter.pattern()
        )
        .context("write prompt")?;
        write!(self.output, "path> ").context("write prompt")?;
        self.output.flush().context("flush prompt")?;

        let mut line = String::new();
        self.input.read_line(&mut line).context("read path")?;
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        let path = request.start_dir.join(answer);
        if !request.filter.matches(&path) {
            warn!(path = %path.display(), filter = %request.filter.pattern(), "rejected selection");
            writeln!(
                self.output,
                "rejected {}: expected {}",
                path.display(),
                request.filter.pattern()
            )
            .context("write rejection")?;
            return Ok(None);
        }
        Ok(Some(path))
    }
}
