//! tasklist config command implementations

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ShowOptions {
    pub config: Config,
    pub source: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct InitOptions {
    pub path: Option<PathBuf>,
    pub force: bool,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    path: Option<&'a PathBuf>,
    config: &'a Config,
}

#[derive(Serialize)]
struct InitReport {
    path: PathBuf,
    overwritten: bool,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    if options.json {
        let report = ShowReport {
            path: options.source.as_ref(),
            config: &options.config,
        };
        return emit_success(
            OutputOptions {
                json: true,
                quiet: options.quiet,
            },
            "config show",
            &report,
            None,
        );
    }

    if options.quiet {
        return Ok(());
    }

    match options.source.as_ref() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# built-in defaults"),
    }
    print!("{}", toml::to_string_pretty(&options.config)?);
    Ok(())
}

pub fn run_init(options: InitOptions) -> Result<()> {
    let path = match options.path {
        Some(path) => path,
        None => Config::default_path().ok_or_else(|| {
            Error::OperationFailed("could not determine the user config directory".to_string())
        })?,
    };

    let existed = path.exists();
    if existed && !options.force {
        return Err(Error::InvalidArgument(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if existed && !path.is_file() {
        return Err(Error::OperationFailed(format!(
            "config path is not a file: {}",
            path.display()
        )));
    }

    Config::default().save(&path)?;
    info!(path = %path.display(), overwritten = existed, "wrote config");

    let mut human = HumanOutput::new(if existed {
        "tasklist config init: overwrote config"
    } else {
        "tasklist config init: wrote config"
    });
    human.push_summary("path", path.display().to_string());
    human.push_next_step("tasklist config show");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "config init",
        &InitReport {
            path,
            overwritten: existed,
        },
        Some(&human),
    )
}
