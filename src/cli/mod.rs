//! Command-line interface for tasklist
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand with more than a few lines of work lives in its own
//! submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::theme::Theme;
use crate::ui;

mod config;
mod run;

/// tasklist - a single-screen task list
///
/// Add tasks with optional due dates, mark them completed, delete them, and
/// filter them by search term or section. Tasks live in memory only.
#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true, env = "TASKLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color theme: classic or modern (overrides config)
    #[arg(long, global = true)]
    pub theme: Option<Theme>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive task list (default)
    Ui,

    /// Run a command script against a fresh task list and print the result
    Run {
        /// Script file, or `-` for stdin (default)
        file: Option<PathBuf>,
    },

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command.unwrap_or(Commands::Ui) {
            Commands::Ui => {
                if self.json {
                    return Err(Error::InvalidArgument(
                        "--json is not supported by the interactive ui".to_string(),
                    ));
                }
                let (config, _) = load_config(self.config.as_deref(), self.theme)?;
                let session = Session::new(config.ui.default_section);
                ui::task_viewer::run(session, config.ui.theme, config.ui.date_format)
            }
            Commands::Run { file } => {
                let (config, _) = load_config(self.config.as_deref(), self.theme)?;
                run::run(run::RunOptions {
                    file,
                    config,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
            Commands::Config(ConfigCommands::Show) => {
                let (config, source) = load_config(self.config.as_deref(), self.theme)?;
                config::run_show(config::ShowOptions {
                    config,
                    source,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
            Commands::Config(ConfigCommands::Init { force }) => {
                config::run_init(config::InitOptions {
                    path: self.config,
                    force,
                    json: self.json,
                    quiet: self.quiet,
                })
            }
        }
    }
}

/// Resolve the config file and apply the `--theme` override.
fn load_config(path: Option<&Path>, theme: Option<Theme>) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = Config::resolve(path)?;
    if let Some(theme) = theme {
        config.ui.theme = theme;
    }
    debug!(
        source = ?source,
        theme = %config.ui.theme,
        section = %config.ui.default_section,
        "effective config"
    );
    Ok((config, source))
}
