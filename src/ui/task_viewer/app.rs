use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::error::Result;
use crate::session::{Command, InputBuffer, Session};
use crate::task::{Section, Task, TaskId};
use crate::theme::Theme;

use super::editor::{FormAction, InputForm};
use super::model;
use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// Which part of the screen receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    List,
    Input,
    Search,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: TaskId,
    pub(crate) text: String,
}

#[derive(Default, Clone, Copy)]
struct Viewport {
    width: u16,
    height: u16,
}

pub struct AppState {
    pub(crate) session: Session,
    pub(crate) form: InputForm,
    pub(crate) focus: Focus,
    pub(crate) selected: Option<TaskId>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) show_help: bool,
    pub(crate) theme: Theme,
    pub(crate) date_format: String,
    info_message: Option<String>,
    status_message: Option<String>,
    viewport: Viewport,
}

impl AppState {
    pub fn new(session: Session, theme: Theme, date_format: String) -> Self {
        let mut app = Self {
            session,
            form: InputForm::new(),
            focus: Focus::List,
            selected: None,
            delete_confirm: None,
            show_help: false,
            theme,
            date_format,
            info_message: None,
            status_message: None,
            viewport: Viewport::default(),
        };
        app.sync_selection();
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn update_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Viewport { width, height };
    }

    pub(crate) fn visible(&self) -> Vec<&Task> {
        self.session.visible()
    }

    pub(crate) fn selected_position(&self) -> Option<usize> {
        let id = self.selected?;
        self.visible().iter().position(|task| task.id == id)
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.session.store().get(id))
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.delete_confirm.is_some() {
            return "y confirm delete  esc cancel".to_string();
        }
        match self.focus {
            Focus::Input => "type task  tab due date  enter add  ctrl+u clear  esc back".to_string(),
            Focus::Search => "type to search  enter keep  esc clear".to_string(),
            Focus::List => {
                "a add  / search  1/2/3 section  enter toggle  d delete  ? help  q quit".to_string()
            }
        }
    }

    pub(crate) fn task_count_summary(&self) -> String {
        model::count_summary(
            self.session.counts(),
            self.visible().len(),
            self.session.section(),
        )
    }

    /// Keep the selection on the same task if it is still visible, otherwise
    /// move it to the first visible row.
    fn sync_selection(&mut self) {
        let visible = self.session.visible();
        let pos = model::select_by_id(&visible, self.selected);
        self.selected = pos.map(|pos| visible[pos].id);
    }

    fn move_selection(&mut self, delta: isize) {
        let visible = self.session.visible();
        if visible.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|id| visible.iter().position(|task| task.id == id))
            .unwrap_or(0);
        let max = visible.len().saturating_sub(1);
        let next = (current as isize + delta).clamp(0, max as isize) as usize;
        self.selected = Some(visible[next].id);
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn clear_messages(&mut self) {
        self.info_message = None;
        self.status_message = None;
    }

    fn apply(&mut self, command: Command) {
        let outcome = self.session.apply(command);
        if !outcome.message.is_empty() {
            self.set_info(outcome.message);
        }
    }

    /// Issue `SetText`/`SetDue` for whichever input fields changed.
    fn apply_input(&mut self, buffer: InputBuffer) {
        let InputBuffer { text, due } = buffer;
        if text != self.session.input().text {
            self.apply(Command::SetText(text));
        }
        if due != self.session.input().due {
            self.apply(Command::SetDue(due));
        }
    }

    fn select_section(&mut self, section: Section) {
        self.apply(Command::SelectSection(section));
        self.sync_selection();
    }

    fn submit_form(&mut self) {
        let outcome = self.session.apply(Command::Submit);
        self.form.reset();
        if let Some(id) = outcome.task_id {
            self.selected = Some(id);
        }
        self.sync_selection();
        self.set_info(outcome.message);
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected else {
            self.set_error("no task selected".to_string());
            return;
        };
        self.apply(Command::Toggle(id));
        self.sync_selection();
    }

    fn delete_confirmed(&mut self, task_id: TaskId) {
        let removed_pos = self
            .visible()
            .iter()
            .position(|task| task.id == task_id);
        self.apply(Command::Delete(task_id));
        if let Some(pos) = removed_pos {
            let visible = self.session.visible();
            self.selected = model::select_after_removal(&visible, pos);
        } else {
            self.sync_selection();
        }
    }

    fn list_jump(&self) -> isize {
        let height = self.viewport.height.saturating_sub(14);
        (height / 2).max(1) as isize
    }
}

pub fn run(session: Session, theme: Theme, date_format: String) -> Result<()> {
    let mut app = AppState::new(session, theme, date_format);
    info!(%theme, "starting task viewer");
    run_terminal(&mut app)
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.width, size.height);

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().width, frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(width, height) => {
                    app.update_viewport(width, height);
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    debug!(tasks = app.session.store().len(), "task viewer closed");
    Ok(())
}

/// Apply one key press. Returns `true` when the viewer should quit.
pub(crate) fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(confirm) = app.delete_confirm.take() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.delete_confirmed(confirm.task_id);
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                app.set_info("cancelled".to_string());
            }
            _ => {
                app.delete_confirm = Some(confirm);
            }
        }
        return false;
    }

    match app.focus {
        Focus::Input => {
            let mut buffer = app.session.input().clone();
            let action = app.form.handle_key(&mut buffer, key);
            app.apply_input(buffer);
            match action {
                FormAction::None => {}
                FormAction::Cancel => {
                    app.focus = Focus::List;
                    app.clear_messages();
                }
                FormAction::Submit => app.submit_form(),
            }
            return false;
        }
        Focus::Search => {
            let mut search = app.session.search().to_string();
            match key.code {
                KeyCode::Esc => {
                    search.clear();
                    app.focus = Focus::List;
                }
                KeyCode::Enter => app.focus = Focus::List,
                KeyCode::Backspace => {
                    search.pop();
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    search.clear();
                }
                KeyCode::Char(ch) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        return false;
                    }
                    if !ch.is_control() {
                        search.push(ch);
                    }
                }
                _ => {}
            }
            if search != app.session.search() {
                app.apply(Command::Search(search));
            }
            app.sync_selection();
            return false;
        }
        Focus::List => {}
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_selection(app.list_jump());
            false
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_selection(-app.list_jump());
            false
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            false
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.move_selection(isize::MIN / 2);
            false
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.move_selection(isize::MAX / 2);
            false
        }
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('n') => {
            app.focus = Focus::Input;
            app.clear_messages();
            false
        }
        KeyCode::Char('/') => {
            app.focus = Focus::Search;
            app.clear_messages();
            false
        }
        KeyCode::Char('1') => {
            app.select_section(Section::All);
            false
        }
        KeyCode::Char('2') => {
            app.select_section(Section::Completed);
            false
        }
        KeyCode::Char('3') => {
            app.select_section(Section::Pending);
            false
        }
        KeyCode::Tab => {
            let next = app.session.section().next();
            app.select_section(next);
            false
        }
        KeyCode::BackTab => {
            let previous = app.session.section().previous();
            app.select_section(previous);
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('x') => {
            app.toggle_selected();
            false
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let Some(task) = app.selected_task() else {
                app.set_error("no task selected".to_string());
                return false;
            };
            app.delete_confirm = Some(DeleteConfirmState {
                task_id: task.id,
                text: task.text.clone(),
            });
            false
        }
        KeyCode::Char('?') => {
            app.show_help = !app.show_help;
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key(app, key(code))
    }

    fn type_str(app: &mut AppState, value: &str) {
        for ch in value.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn app() -> AppState {
        AppState::new(Session::default(), Theme::Classic, "%b %-d, %Y".to_string())
    }

    fn add(app: &mut AppState, text: &str, due: &str) {
        if app.focus == Focus::List {
            press(app, KeyCode::Char('a'));
        }
        type_str(app, text);
        press(app, KeyCode::Tab);
        type_str(app, due);
        press(app, KeyCode::Enter);
    }

    fn visible_texts(app: &AppState) -> Vec<String> {
        app.visible().iter().map(|task| task.text.clone()).collect()
    }

    #[test]
    fn input_row_adds_tasks_and_clears_buffers() {
        let mut app = app();
        add(&mut app, "Buy milk", "");
        add(&mut app, "Pay rent", "2025-05-01");

        let tasks = app.session().store().tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].due.as_deref(), Some("2025-05-01"));
        assert!(app.session().input().text.is_empty());
        assert!(app.session().input().due.is_empty());
        assert_eq!(app.selected, Some(tasks[1].id));
    }

    #[test]
    fn empty_submit_is_rejected_with_message() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2030-01-01");
        press(&mut app, KeyCode::Enter);

        assert!(app.session().store().is_empty());
        assert!(app.session().input().due.is_empty());
        let (message, _) = app.status_line().expect("status");
        assert_eq!(message, "task text is empty");
    }

    #[test]
    fn typing_q_in_input_does_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.session().input().text, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn enter_toggles_selected_task() {
        let mut app = app();
        add(&mut app, "Buy milk", "");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Enter);
        assert!(app.session().store().tasks()[0].completed);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session().store().tasks()[0].completed);
    }

    #[test]
    fn search_filters_live_and_esc_clears() {
        let mut app = app();
        add(&mut app, "Buy milk", "");
        add(&mut app, "Pay rent", "");
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "BU");
        assert_eq!(visible_texts(&app), vec!["Buy milk"]);
        assert_eq!(app.selected_task().map(|t| t.text.as_str()), Some("Buy milk"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session().search(), "");
        assert_eq!(visible_texts(&app).len(), 2);
    }

    #[test]
    fn section_keys_filter_by_completion() {
        let mut app = app();
        add(&mut app, "Buy milk", "");
        add(&mut app, "Pay rent", "");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.session().section(), Section::Completed);
        assert_eq!(visible_texts(&app), vec!["Pay rent"]);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(visible_texts(&app), vec!["Buy milk"]);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session().section(), Section::All);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app();
        add(&mut app, "Buy milk", "");
        add(&mut app, "Pay rent", "");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('k'));

        press(&mut app, KeyCode::Char('d'));
        assert!(app.delete_confirm.is_some());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session().store().len(), 2);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(visible_texts(&app), vec!["Pay rent"]);
        assert_eq!(app.selected_task().map(|t| t.text.as_str()), Some("Pay rent"));
    }

    #[test]
    fn only_y_or_enter_confirm_delete() {
        let mut app = app();
        add(&mut app, "Buy milk", "");
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('c'));
        assert!(app.delete_confirm.is_some());
        assert_eq!(app.session().store().len(), 1);

        press(&mut app, KeyCode::Enter);
        assert!(app.delete_confirm.is_none());
        assert!(app.session().store().is_empty());
    }

    #[test]
    fn typed_input_reaches_session_buffers() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Buy");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2030");
        assert_eq!(app.session().input().text, "Buy");
        assert_eq!(app.session().input().due, "2030");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "mil");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session().search(), "mi");
    }

    #[test]
    fn delete_without_selection_reports_error() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        assert!(app.delete_confirm.is_none());
        let (message, kind) = app.status_line().expect("status");
        assert_eq!(message, "no task selected");
        assert!(matches!(kind, StatusKind::Error));
    }
}
