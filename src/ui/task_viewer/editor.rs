use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Due,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Text => "Task",
            FormField::Due => "Due",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Text => "Add a task",
            FormField::Due => "YYYY-MM-DD",
        }
    }

    fn other(self) -> Self {
        match self {
            FormField::Text => FormField::Due,
            FormField::Due => FormField::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Cancel,
    Submit,
}

/// Focus and key handling for the add-task input row. The typed values live
/// in the session's [`InputBuffer`].
#[derive(Debug, Clone)]
pub struct InputForm {
    active: FormField,
}

impl Default for InputForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InputForm {
    pub fn new() -> Self {
        Self {
            active: FormField::Text,
        }
    }

    pub fn active(&self) -> FormField {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = FormField::Text;
    }

    pub fn handle_key(&mut self, buffer: &mut InputBuffer, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            field_mut(buffer, self.active).clear();
            return FormAction::None;
        }

        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.active = self.active.other();
            }
            KeyCode::Backspace => {
                field_mut(buffer, self.active).pop();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return FormAction::None;
                }
                if !ch.is_control() {
                    field_mut(buffer, self.active).push(ch);
                }
            }
            _ => {}
        }
        FormAction::None
    }
}

pub fn field_value(buffer: &InputBuffer, field: FormField) -> &str {
    match field {
        FormField::Text => &buffer.text,
        FormField::Due => &buffer.due,
    }
}

fn field_mut(buffer: &mut InputBuffer, field: FormField) -> &mut String {
    match field {
        FormField::Text => &mut buffer.text,
        FormField::Due => &mut buffer.due,
    }
}
