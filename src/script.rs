//! Line-oriented command scripts.
//!
//! A script drives a fresh [`Session`] through the same commands the terminal
//! UI issues, one per line:
//!
//! ```text
//! # comment
//! add Buy milk
//! add Pay rent | 2025-05-01
//! text Call mom
//! due 2030-01-01
//! submit
//! toggle 2
//! delete 1
//! section pending
//! search rent
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::session::{Command, Session};
use crate::task::{Section, SectionCounts, Task, TaskId};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub commands: Vec<Command>,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse(source: &str) -> Result<Vec<ScriptLine>> {
    let mut out = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let commands = parse_line(trimmed).map_err(|message| Error::Script { line, message })?;
        out.push(ScriptLine { line, commands });
    }
    Ok(out)
}

fn parse_line(line: &str) -> std::result::Result<Vec<Command>, String> {
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "text" => Ok(vec![Command::SetText(rest.to_string())]),
        "due" => Ok(vec![Command::SetDue(rest.to_string())]),
        "submit" => {
            if !rest.is_empty() {
                return Err("submit takes no argument".to_string());
            }
            Ok(vec![Command::Submit])
        }
        "add" => {
            let (text, due) = match rest.split_once('|') {
                Some((text, due)) => (text.trim(), due.trim()),
                None => (rest, ""),
            };
            Ok(vec![
                Command::SetText(text.to_string()),
                Command::SetDue(due.to_string()),
                Command::Submit,
            ])
        }
        "toggle" => Ok(vec![Command::Toggle(parse_id(keyword, rest)?)]),
        "delete" => Ok(vec![Command::Delete(parse_id(keyword, rest)?)]),
        "section" => {
            if rest.is_empty() {
                return Err("section requires all, completed, or pending".to_string());
            }
            let section = rest.parse::<Section>().map_err(|err| match err {
                Error::InvalidArgument(message) => message,
                other => other.to_string(),
            })?;
            Ok(vec![Command::SelectSection(section)])
        }
        "search" => Ok(vec![Command::Search(rest.to_string())]),
        other => Err(format!("unknown command '{other}'")),
    }
}

fn parse_id(keyword: &str, value: &str) -> std::result::Result<TaskId, String> {
    if value.is_empty() {
        return Err(format!("{keyword} requires a task id"));
    }
    value
        .parse::<TaskId>()
        .map_err(|_| format!("invalid task id '{value}'"))
}

/// Final view of a session after a script run.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub section: Section,
    pub search: String,
    pub counts: SectionCounts,
    pub tasks: Vec<Task>,
    /// Number of `submit`s that were rejected for empty text.
    pub rejected: usize,
}

impl ScriptReport {
    pub fn from_session(session: &Session, rejected: usize) -> Self {
        Self {
            section: session.section(),
            search: session.search().to_string(),
            counts: session.counts(),
            tasks: session.visible().into_iter().cloned().collect(),
            rejected,
        }
    }
}

/// Run a parsed script against `session`, returning how many submits were
/// rejected.
pub fn execute(session: &mut Session, lines: Vec<ScriptLine>) -> usize {
    let mut rejected = 0;
    for ScriptLine { line, commands } in lines {
        for command in commands {
            let submit = command == Command::Submit;
            let outcome = session.apply(command);
            if submit && !outcome.changed {
                warn!(line, "submit ignored: task text is empty");
                rejected += 1;
            }
            if !outcome.message.is_empty() {
                debug!(line, message = %outcome.message, "script step");
            }
        }
    }
    rejected
}

/// Parse and run `source` against `session`.
pub fn run(session: &mut Session, source: &str) -> Result<ScriptReport> {
    let lines = parse(source)?;
    info!(lines = lines.len(), "running script");
    let rejected = execute(session, lines);
    Ok(ScriptReport::from_session(session, rejected))
}
