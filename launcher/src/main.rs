//! Launcher for the surgical simulation suite.
//!
//! Lists the anatomical modules with their readiness, launches a module's
//! executable from its own directory, and stages (simulated) module assets.
//! `launcher shell` keeps one catalog alive across commands so that path
//! edits apply until the session ends.

use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use launcher::catalog::{Catalog, ModuleDescriptor};
use launcher::configure::override_path;
use launcher::core::types::{Readiness, StagingState};
use launcher::exit_codes;
use launcher::io::chooser::ExtensionFilter;
use launcher::io::config::{IconConfig, LauncherConfig, load_config};
use launcher::io::icon::fetch_icon;
use launcher::io::resolve::resolve_all;
use launcher::launch::{describe_outcome, exit_code, launch_module};
use launcher::logging;
use launcher::session::{Session, module_row};
use launcher::stage::{StageEvent, Stager, completion_lines, progress_line};
use serde::Serialize;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Parser)]
#[command(
    name = "launcher",
    version,
    about = "Launcher for the surgical simulation suite"
)]
struct Cli {
    /// TOML config file. Built-in defaults apply when omitted or missing.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every module with its status and executable path.
    List {
        /// Print a JSON array instead of a table.
        #[arg(long)]
        json: bool,
        /// Also try to fetch each module's remote icon.
        #[arg(long)]
        fetch_icons: bool,
    },
    /// Start a module's executable from its own directory.
    Launch {
        id: String,
        /// Use this executable instead of the configured one.
        #[arg(long)]
        exe: Option<PathBuf>,
    },
    /// Stage assets for one or more modules concurrently.
    Stage {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Interactive session; path edits last until it ends.
    Shell,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LauncherConfig::default(),
    };
    let catalog = config.catalog()?;
    match cli.command {
        Command::List { json, fetch_icons } => {
            cmd_list(&catalog, &config.icons, json, fetch_icons)
        }
        Command::Launch { id, exe } => cmd_launch(catalog, &id, exe.as_deref()),
        Command::Stage { ids } => cmd_stage(&catalog, &config, &ids),
        Command::Shell => cmd_shell(catalog, &config),
    }
}

#[derive(Serialize)]
struct ListEntry<'a> {
    #[serde(flatten)]
    module: &'a ModuleDescriptor,
    status: Readiness,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_bytes: Option<usize>,
}

fn cmd_list(
    catalog: &Catalog,
    icons: &IconConfig,
    json: bool,
    fetch_icons: bool,
) -> Result<i32> {
    let entries: Vec<ListEntry> = resolve_all(catalog)
        .into_iter()
        .map(|(module, status)| ListEntry {
            module,
            status,
            icon_bytes: if fetch_icons {
                module
                    .icon_url
                    .as_deref()
                    .and_then(|url| fetch_icon(url, icons))
                    .map(|body| body.len())
            } else {
                None
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(exit_codes::OK);
    }
    for entry in &entries {
        let mut row = module_row(entry.module, entry.status);
        if let Some(bytes) = entry.icon_bytes {
            row.push_str(&format!("  [icon {bytes} bytes]"));
        }
        println!("{row}");
    }
    Ok(exit_codes::OK)
}

fn cmd_launch(mut catalog: Catalog, id: &str, exe: Option<&Path>) -> Result<i32> {
    override_path(&mut catalog, id, exe)?;
    let outcome = launch_module(&catalog, id)?;
    let module = catalog.require(id)?;
    let notice = describe_outcome(module, &outcome);
    match exit_code(&outcome) {
        exit_codes::OK => println!("{notice}"),
        _ => eprintln!("{notice}"),
    }
    Ok(exit_code(&outcome))
}

fn cmd_stage(catalog: &Catalog, config: &LauncherConfig, ids: &[String]) -> Result<i32> {
    for id in ids {
        catalog.require(id)?;
    }
    let stager = Stager::from_config(&config.staging);
    let mut runs = Vec::with_capacity(ids.len());
    for id in ids {
        println!("Staging '{id}'...");
        runs.push(stager.start(id)?);
    }

    while runs.iter().any(|run| run.state() == StagingState::Running) {
        for run in &mut runs {
            for event in run.poll()? {
                match event {
                    StageEvent::Progress(step) => {
                        if let Some(line) = progress_line(run.module_id(), step) {
                            println!("{line}");
                        }
                    }
                    StageEvent::Completed(assets) => {
                        for line in completion_lines(&assets) {
                            println!("{line}");
                        }
                    }
                }
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
    Ok(exit_codes::OK)
}

fn cmd_shell(catalog: Catalog, config: &LauncherConfig) -> Result<i32> {
    if catalog.is_empty() {
        bail!("catalog is empty");
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        catalog,
        Stager::from_config(&config.staging),
        ExtensionFilter::executable(&config.exe_extension),
        stdin.lock(),
        stdout.lock(),
    );
    session.run()?;
    Ok(exit_codes::OK)
}
