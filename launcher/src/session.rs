//! Interactive operator session (`launcher shell`).
//!
//! The session is the single control thread: it reads one command per line,
//! dispatches it, then drains notifications from any staging workers. It never
//! blocks on a worker except for the explicit `wait` command. Path edits made
//! here live as long as the session.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::Child;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};

use crate::catalog::{Catalog, ModuleDescriptor};
use crate::configure;
use crate::core::types::{Readiness, StagingState};
use crate::io::chooser::{ExtensionFilter, PromptChooser};
use crate::io::resolve::resolve_all;
use crate::io::process::LaunchOutcome;
use crate::launch::{describe_outcome, launch_module};
use crate::stage::{StageEvent, StageRun, Stager, completion_lines, progress_line};

const HELP: &str = "\
commands:
  list                    show modules and their status
  launch <id>             start the module executable
  stage <id>              stage module assets in the background
  wait                    block until every staging run completes
  set-path <id> <path>    replace the module executable path
  browse <id>             pick the module executable interactively
  help                    show this help
  quit                    leave the session";

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Launch(String),
    Stage(String),
    Wait,
    SetPath(String, PathBuf),
    Browse(String),
    Help,
    Quit,
}

/// Parse a command line. Blank lines yield `None`.
///
/// `set-path` takes the rest of the line as the path, so paths may contain
/// spaces.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let id = || -> Result<String> {
        match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [id] => Ok((*id).to_string()),
            _ => Err(anyhow!("usage: {verb} <id>")),
        }
    };
    let command = match verb {
        "list" | "ls" => SessionCommand::List,
        "launch" => SessionCommand::Launch(id()?),
        "stage" => SessionCommand::Stage(id()?),
        "wait" => SessionCommand::Wait,
        "browse" => SessionCommand::Browse(id()?),
        "set-path" => {
            let Some((id, path)) = rest.split_once(char::is_whitespace) else {
                bail!("usage: set-path <id> <path>");
            };
            let path = path.trim();
            if path.is_empty() {
                bail!("usage: set-path <id> <path>");
            }
            SessionCommand::SetPath(id.to_string(), PathBuf::from(path))
        }
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

/// One row of the module listing.
pub fn module_row(module: &ModuleDescriptor, readiness: Readiness) -> String {
    format!(
        "{} {:<10} {:<12} {:<10} {}",
        module.icon,
        module.id,
        module.name,
        readiness.label(),
        module.exe_path.display()
    )
}

/// Operator session over a line-oriented input and an output sink.
pub struct Session<R, W> {
    catalog: Catalog,
    stager: Stager,
    filter: ExtensionFilter,
    input: R,
    output: W,
    runs: Vec<StageRun>,
    staged: BTreeSet<String>,
    /// Children launched here, kept only so exited ones are reaped.
    launched: Vec<Child>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        catalog: Catalog,
        stager: Stager,
        filter: ExtensionFilter,
        input: R,
        output: W,
    ) -> Self {
        Self {
            catalog,
            stager,
            filter,
            input,
            output,
            runs: Vec::new(),
            staged: BTreeSet::new(),
            launched: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Staging state of `id` in this session.
    pub fn staging_state(&self, id: &str) -> StagingState {
        if self
            .runs
            .iter()
            .any(|run| run.module_id() == id && run.state() == StagingState::Running)
        {
            StagingState::Running
        } else if self.staged.contains(id) {
            StagingState::Completed
        } else {
            StagingState::Idle
        }
    }

    /// Read and execute commands until `quit` or end of input.
    ///
    /// Command errors are reported to the operator and do not end the session.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Surgical Simulation Suite ({} modules)", self.catalog.len())
            .context("write banner")?;
        writeln!(self.output, "type 'help' for commands").context("write banner")?;
        loop {
            write!(self.output, "> ").context("write prompt")?;
            self.output.flush().context("flush prompt")?;

            let mut line = String::new();
            if self.input.read_line(&mut line).context("read command")? == 0 {
                break;
            }
            match parse_command(&line) {
                Ok(Some(SessionCommand::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(err) = self.execute(command) {
                        writeln!(self.output, "error: {err:#}").context("write error")?;
                    }
                }
                Ok(None) => {}
                Err(err) => writeln!(self.output, "error: {err:#}").context("write error")?,
            }
            self.drain_notifications()?;
            self.reap_exited();
        }
        Ok(())
    }

    pub fn execute(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::List => self.list(),
            SessionCommand::Launch(id) => self.launch(&id),
            SessionCommand::Stage(id) => self.stage(&id),
            SessionCommand::Wait => self.wait_all(),
            SessionCommand::SetPath(id, path) => {
                configure::set_path(&mut self.catalog, &id, path.clone())?;
                writeln!(
                    self.output,
                    "Path for '{id}' updated to {}. Active for this session only.",
                    path.display()
                )
                .context("write notice")
            }
            SessionCommand::Browse(id) => self.browse(&id),
            SessionCommand::Help => writeln!(self.output, "{HELP}").context("write help"),
            SessionCommand::Quit => Ok(()),
        }
    }

    fn list(&mut self) -> Result<()> {
        let mut rows = Vec::new();
        for (module, readiness) in resolve_all(&self.catalog) {
            let mut row = module_row(module, readiness);
            match self.staging_state(&module.id) {
                StagingState::Idle => {}
                StagingState::Running => row.push_str("  [staging]"),
                StagingState::Completed => row.push_str("  [staged]"),
            }
            rows.push(row);
        }
        for row in rows {
            writeln!(self.output, "{row}").context("write listing")?;
        }
        Ok(())
    }

    fn launch(&mut self, id: &str) -> Result<()> {
        let outcome = launch_module(&self.catalog, id)?;
        let module = self.catalog.require(id)?;
        writeln!(self.output, "{}", describe_outcome(module, &outcome)).context("write notice")?;
        if let LaunchOutcome::Success(process) = outcome {
            self.launched.push(process.child);
        }
        Ok(())
    }

    /// Collect the exit status of launched children that have finished.
    ///
    /// Never blocks; running children are left alone.
    fn reap_exited(&mut self) {
        self.launched.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid = child.id(), %status, "launched module exited");
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!(pid = child.id(), err = %e, "cannot query launched module");
                false
            }
        });
    }

    fn stage(&mut self, id: &str) -> Result<()> {
        let module = self.catalog.require(id)?;
        let run = self.stager.start(&module.id)?;
        writeln!(self.output, "Staging '{}'...", module.name).context("write notice")?;
        self.runs.push(run);
        Ok(())
    }

    fn browse(&mut self, id: &str) -> Result<()> {
        let mut chooser = PromptChooser::new(&mut self.input, &mut self.output);
        let chosen = configure::browse(&mut self.catalog, id, &mut chooser, &self.filter)?;
        let written = match chosen {
            Some(path) => writeln!(
                self.output,
                "Path for '{id}' updated to {}. Active for this session only.",
                path.display()
            ),
            None => writeln!(self.output, "Path for '{id}' unchanged."),
        };
        written.context("write notice")
    }

    fn wait_all(&mut self) -> Result<()> {
        for mut run in std::mem::take(&mut self.runs) {
            match run.wait() {
                Ok(report) => {
                    self.report_completion(&report.module_id, &completion_lines(&report.assets))?;
                }
                Err(err) => writeln!(self.output, "error: {err:#}").context("write error")?,
            }
        }
        Ok(())
    }

    /// Print pending staging notifications and forget finished runs.
    fn drain_notifications(&mut self) -> Result<()> {
        let mut lines = Vec::new();
        let mut completed = Vec::new();
        let mut finished = Vec::new();
        for (index, run) in self.runs.iter_mut().enumerate() {
            let events = match run.poll() {
                Ok(events) => events,
                Err(err) => {
                    warn!(module = run.module_id(), err = %err, "staging run lost");
                    lines.push(format!("error: {err:#}"));
                    finished.push(index);
                    continue;
                }
            };
            for event in events {
                match event {
                    StageEvent::Progress(step) => {
                        lines.extend(progress_line(run.module_id(), step));
                    }
                    StageEvent::Completed(assets) => completed.push(assets),
                }
            }
            if run.state() == StagingState::Completed {
                finished.push(index);
            }
        }
        for index in finished.into_iter().rev() {
            self.runs.remove(index);
        }

        for line in lines {
            writeln!(self.output, "{line}").context("write progress")?;
        }
        for assets in completed {
            self.report_completion(&assets.module_id, &completion_lines(&assets))?;
        }
        Ok(())
    }

    fn report_completion(&mut self, module_id: &str, lines: &[String]) -> Result<()> {
        self.staged.insert(module_id.to_string());
        for line in lines {
            writeln!(self.output, "{line}").context("write completion")?;
        }
        Ok(())
    }
}
