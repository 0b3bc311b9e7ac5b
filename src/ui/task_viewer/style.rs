//! Display descriptors derived from theme and task state.
//!
//! Everything here is a pure function of its arguments; the view asks for a
//! style instead of composing colors inline.

use ratatui::style::{Modifier, Style};

use crate::theme::Theme;

pub const COMPLETED_MARKER: &str = "[x]";
pub const PENDING_MARKER: &str = "[ ]";

pub fn task_row(theme: Theme, completed: bool, selected: bool) -> Style {
    let palette = theme.palette();
    let bg = if selected {
        palette.row_selected_bg
    } else if completed {
        palette.row_completed_bg
    } else {
        palette.row_bg
    };
    let mut style = Style::default().fg(palette.text).bg(bg);
    if completed {
        style = style.fg(palette.muted).add_modifier(Modifier::CROSSED_OUT);
    }
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

pub fn task_marker(completed: bool) -> &'static str {
    if completed {
        COMPLETED_MARKER
    } else {
        PENDING_MARKER
    }
}

pub fn task_marker_style(theme: Theme, completed: bool) -> Style {
    let palette = theme.palette();
    if completed {
        Style::default()
            .fg(palette.success)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    }
}

pub fn due_date(theme: Theme) -> Style {
    Style::default().fg(theme.palette().muted)
}

pub fn section_tab(theme: Theme, active: bool) -> Style {
    let palette = theme.palette();
    if active {
        Style::default()
            .fg(palette.tab_active_fg)
            .bg(palette.tab_active_bg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(palette.accent)
    }
}

pub fn heading(theme: Theme) -> Style {
    Style::default()
        .fg(theme.palette().heading)
        .add_modifier(Modifier::BOLD)
}

pub fn border(theme: Theme, focused: bool) -> Style {
    let palette = theme.palette();
    if focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.border)
    }
}

pub fn input_value(theme: Theme, placeholder: bool) -> Style {
    let palette = theme.palette();
    if placeholder {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.text)
    }
}

pub fn hint(theme: Theme) -> Style {
    Style::default().fg(theme.palette().info)
}

pub fn info(theme: Theme) -> Style {
    Style::default().fg(theme.palette().warning)
}

pub fn error(theme: Theme) -> Style {
    Style::default()
        .fg(theme.palette().error)
        .add_modifier(Modifier::BOLD)
}
