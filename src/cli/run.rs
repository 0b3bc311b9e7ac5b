//! tasklist run command implementation
//!
//! Executes a command script against a fresh session and reports the
//! resulting view.

use std::io::Read;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::script::{self, ScriptReport};
use crate::session::Session;
use crate::task::Task;
use crate::ui::task_viewer::model;
use crate::ui::task_viewer::style;

pub struct RunOptions {
    pub file: Option<PathBuf>,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: RunOptions) -> Result<()> {
    let source = read_source(options.file.as_ref())?;
    let mut session = Session::new(options.config.ui.default_section);
    let report = script::run(&mut session, &source)?;

    let human = build_human(&report, &options.config.ui.date_format);
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "run",
        &report,
        Some(&human),
    )
}

fn read_source(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            if !path.is_file() {
                return Err(Error::InvalidArgument(format!(
                    "script not found: {}",
                    path.display()
                )));
            }
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn build_human(report: &ScriptReport, date_format: &str) -> HumanOutput {
    let visible = report.tasks.len();
    let header = match visible {
        0 => "tasklist run: no visible tasks".to_string(),
        1 => "tasklist run: 1 visible task".to_string(),
        n => format!("tasklist run: {n} visible tasks"),
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("section", report.section.label());
    human.push_summary(
        "search",
        if report.search.is_empty() {
            "none".to_string()
        } else {
            format!("\"{}\"", report.search)
        },
    );
    human.push_summary(
        "counts",
        format!(
            "all {}, completed {}, pending {}",
            report.counts.all, report.counts.completed, report.counts.pending
        ),
    );
    for task in &report.tasks {
        human.push_detail(task_line(task, date_format));
    }
    if report.rejected > 0 {
        human.push_warning(format!(
            "{} submit(s) ignored: task text is empty",
            report.rejected
        ));
    }
    human
}

fn task_line(task: &Task, date_format: &str) -> String {
    let marker = style::task_marker(task.completed);
    match task.due.as_deref() {
        Some(due) => format!(
            "#{} {marker} {} (Due: {})",
            task.id,
            task.text,
            model::format_due(due, date_format)
        ),
        None => format!("#{} {marker} {}", task.id, task.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_report_lists_visible_tasks() {
        let mut session = Session::default();
        let report = script::run(
            &mut session,
            "add Buy milk\nadd Pay rent | 2025-05-01\ntoggle 2\nsubmit\n",
        )
        .expect("run");

        let text = crate::output::format_human(&build_human(&report, "%b %-d, %Y"));
        assert!(text.starts_with("tasklist run: 2 visible tasks"));
        assert!(text.contains("- section: All"));
        assert!(text.contains("- search: none"));
        assert!(text.contains("- counts: all 2, completed 1, pending 1"));
        assert!(text.contains("- #1 [ ] Buy milk"));
        assert!(text.contains("- #2 [x] Pay rent (Due: May 1, 2025)"));
        assert!(text.contains("1 submit(s) ignored"));
    }
}
