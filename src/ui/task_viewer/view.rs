use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::{Section, Task};
use crate::theme::Theme;

use super::app::{AppState, DeleteConfirmState, Focus, StatusKind};
use super::editor::{self, FormField};
use super::model;
use super::style;

const ID_WIDTH: usize = 5;
const DUE_INPUT_WIDTH: u16 = 18;
const HELP_KEY_WIDTH: usize = 14;

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_heading(frame, app, chunks[0]);
    render_input_row(frame, app, chunks[1]);
    render_search(frame, app, chunks[2]);
    render_tabs(frame, app, chunks[3]);
    render_list(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);

    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, app.theme, state);
    }
}

fn render_heading(frame: &mut Frame, app: &AppState, area: Rect) {
    let widget = Paragraph::new(Line::from(Span::styled(
        "Todo List",
        style::heading(app.theme),
    )));
    frame.render_widget(widget, area);
}

fn render_input_row(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(DUE_INPUT_WIDTH)].as_ref())
        .split(area);
    for (field, rect) in [(FormField::Text, chunks[0]), (FormField::Due, chunks[1])] {
        let focused = app.focus == Focus::Input && app.form.active() == field;
        let value = editor::field_value(app.session.input(), field);
        render_input_box(
            frame,
            app.theme,
            rect,
            field.label(),
            value,
            field.placeholder(),
            focused,
        );
    }
}

fn render_search(frame: &mut Frame, app: &AppState, area: Rect) {
    render_input_box(
        frame,
        app.theme,
        area,
        "Search",
        app.session.search(),
        "Search tasks",
        app.focus == Focus::Search,
    );
}

fn render_input_box(
    frame: &mut Frame,
    theme: Theme,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let content_width = area.width.saturating_sub(2) as usize;
    let line = if focused {
        Line::from(value_with_caret_spans(
            value,
            content_width,
            style::input_value(theme, false),
        ))
    } else if value.is_empty() {
        Line::from(Span::styled(
            placeholder.to_string(),
            style::input_value(theme, true),
        ))
    } else {
        Line::from(Span::styled(
            truncate_text(value, content_width),
            style::input_value(theme, false),
        ))
    };
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(style::border(theme, focused)),
    );
    frame.render_widget(widget, area);
}

fn render_tabs(frame: &mut Frame, app: &AppState, area: Rect) {
    let counts = app.session.counts();
    let active = app.session.section();
    let mut spans = Vec::new();
    for (idx, section) in Section::ALL.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        let text = format!(
            " {} {} ({}) ",
            idx + 1,
            section.label(),
            counts.for_section(section)
        );
        spans.push(Span::styled(text, style::section_tab(app.theme, section == active)));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(style::border(app.theme, false)),
    );
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let mut lines = Vec::new();
    let content_width = area.width.saturating_sub(2) as usize;
    let help_lines = if app.show_help {
        build_list_help_lines(app.theme, content_width)
    } else {
        Vec::new()
    };
    let help_reserved = if help_lines.is_empty() {
        0
    } else {
        help_lines.len() + 1
    };

    let visible = app.visible();
    if visible.is_empty() {
        let message = if !app.session.search().is_empty() || app.session.section() != Section::All
        {
            "No matches"
        } else {
            "No tasks"
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(app.theme.palette().muted),
        )));
    } else {
        let list_height = area
            .height
            .saturating_sub(2)
            .saturating_sub(help_reserved as u16) as usize;
        let selected_pos = app.selected_position();
        let (start, end) = model::list_window(visible.len(), selected_pos, list_height);
        for (pos, task) in visible.iter().enumerate().take(end).skip(start) {
            let selected = selected_pos == Some(pos);
            lines.push(render_list_row(
                task,
                selected,
                content_width,
                app.theme,
                &app.date_format,
            ));
        }
    }

    if !help_lines.is_empty() {
        lines.push(Line::from(""));
        lines.extend(help_lines);
    }

    let title = format!("Tasks - {}", app.session.section().label());
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(style::border(app.theme, app.focus == Focus::List)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_list_row(
    task: &Task,
    selected: bool,
    width: usize,
    theme: Theme,
    date_format: &str,
) -> Line<'static> {
    let row_style = style::task_row(theme, task.completed, selected);
    let marker = style::task_marker(task.completed);
    let id_text = pad_text(&format!("#{}", task.id), ID_WIDTH);
    let due_text = task
        .due
        .as_deref()
        .map(|due| format!("Due: {}", model::format_due(due, date_format)));
    let due_width = due_text
        .as_ref()
        .map(|text| text.chars().count() + 2)
        .unwrap_or(0);
    let used = 1 + marker.len() + 1 + ID_WIDTH + 1 + due_width;
    let text = truncate_text(&task.text, width.saturating_sub(used));

    let mut spans = vec![
        Span::raw(if selected { ">" } else { " " }),
        Span::styled(marker, style::task_marker_style(theme, task.completed)),
        Span::raw(" "),
        Span::styled(id_text, Style::default().fg(theme.palette().muted)),
        Span::raw(" "),
        Span::raw(text),
    ];
    if let Some(due_text) = due_text {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(due_text, style::due_date(theme)));
    }

    for span in &mut spans {
        span.style = row_style.patch(span.style);
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = app.footer_hint();
    let hint_span = Span::styled(hint, style::hint(app.theme));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => style::error(app.theme),
            StatusKind::Info => style::info(app.theme),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(app.theme.palette().accent),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(style::border(app.theme, false)),
        );
    frame.render_widget(widget, area);
}

fn render_delete_confirm_modal(
    frame: &mut Frame,
    area: Rect,
    theme: Theme,
    state: &DeleteConfirmState,
) {
    let palette = theme.palette();
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 8u16.min(area.height.saturating_sub(4).max(6));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let text_width = (content_width as usize).saturating_sub(10);
    let lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled("Delete task?", style::error(theme))),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(palette.muted)),
            Span::styled(format!("#{}", state.task_id), Style::default().fg(palette.text)),
        ]),
        Line::from(vec![
            Span::styled("Task: ", Style::default().fg(palette.muted)),
            Span::styled(
                truncate_text(&state.text, text_width),
                Style::default().fg(palette.text),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  esc/n cancel",
            Style::default().fg(palette.muted),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Delete Task")
                .border_style(Style::default().fg(palette.error)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn build_list_help_lines(theme: Theme, width: usize) -> Vec<Line<'static>> {
    vec![
        help_header(theme, "Keys"),
        help_line(theme, "j/k or up/down", "move selection", width),
        help_line(theme, "a/i", "add a task", width),
        help_line(theme, "tab", "switch task/due field", width),
        help_line(theme, "enter/space", "toggle completed", width),
        help_line(theme, "d", "delete task", width),
        help_line(theme, "/", "search tasks", width),
        help_line(theme, "1/2/3", "all/completed/pending", width),
        help_line(theme, "tab/shift+tab", "next or previous section", width),
        help_line(theme, "ctrl+d/u", "page down/up", width),
        help_line(theme, "q/esc", "quit", width),
        help_line(theme, "?", "hide help", width),
    ]
}

fn help_header(theme: Theme, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        style::hint(theme).add_modifier(Modifier::BOLD),
    ))
}

fn help_line(theme: Theme, keys: &str, desc: &str, width: usize) -> Line<'static> {
    let palette = theme.palette();
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let desc_text = truncate_text(desc, desc_width);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(palette.muted)),
    ])
}

/// Tail of `value` that fits in `width`, followed by a block caret.
fn value_with_caret_spans(value: &str, width: usize, style: Style) -> Vec<Span<'static>> {
    if width == 0 {
        return vec![Span::raw("")];
    }
    let chars: Vec<char> = value.chars().collect();
    let available = width.saturating_sub(1);
    let start = chars.len().saturating_sub(available);
    let text: String = chars[start..].iter().collect();

    let mut spans = Vec::new();
    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    spans.push(Span::styled(
        " ".to_string(),
        style.add_modifier(Modifier::REVERSED),
    ));
    spans
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.chars().count() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    use crate::session::{Command, Session};

    fn buffer_text(buffer: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(app: &mut AppState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| render(frame, app))
            .expect("draw");
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn renders_tasks_with_due_dates_and_markers() {
        let mut session = Session::default();
        session.apply(Command::SetText("Buy milk".to_string()));
        session.apply(Command::Submit);
        session.apply(Command::SetText("Pay rent".to_string()));
        session.apply(Command::SetDue("2025-05-01".to_string()));
        let id = session.submit().expect("id");
        session.apply(Command::Toggle(id));

        let mut app = AppState::new(session, Theme::Classic, "%b %-d, %Y".to_string());
        let screen = draw(&mut app);
        assert!(screen.contains("Todo List"));
        assert!(screen.contains("[ ] #1"));
        assert!(screen.contains("[x] #2"));
        assert!(screen.contains("Due: May 1, 2025"));
        assert!(screen.contains("All (2)"));
        assert!(screen.contains("Completed (1)"));
    }

    #[test]
    fn empty_filter_shows_no_matches() {
        let mut session = Session::default();
        session.apply(Command::SetText("Buy milk".to_string()));
        session.apply(Command::Submit);
        session.apply(Command::Search("zzz".to_string()));

        let mut app = AppState::new(session, Theme::Modern, "%Y-%m-%d".to_string());
        let screen = draw(&mut app);
        assert!(screen.contains("No matches"));
    }

    #[test]
    fn truncate_text_adds_ellipsis() {
        assert_eq!(truncate_text("abcdefgh", 6), "abc...");
        assert_eq!(truncate_text("abc", 6), "abc");
        assert_eq!(truncate_text("abcdef", 2), "ab");
    }
}
