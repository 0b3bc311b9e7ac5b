//! Color themes for the terminal UI.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Classic => classic_palette(),
            Theme::Modern => modern_palette(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(Theme::Classic),
            "modern" => Ok(Theme::Modern),
            _ => Err(Error::InvalidArgument(format!(
                "invalid theme '{}': must be classic or modern",
                s.trim()
            ))),
        }
    }
}

/// Colors a theme resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub heading: Color,
    pub border: Color,
    pub accent: Color,
    /// Background of the active section tab.
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub row_bg: Color,
    pub row_completed_bg: Color,
    pub row_selected_bg: Color,
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
}

fn classic_palette() -> Palette {
    Palette {
        text: Color::Rgb(234, 236, 239),
        muted: Color::Rgb(117, 117, 117),
        heading: Color::Rgb(255, 255, 255),
        border: Color::Rgb(92, 126, 166),
        accent: Color::Rgb(0, 123, 255),
        tab_active_bg: Color::Rgb(0, 86, 179),
        tab_active_fg: Color::Rgb(255, 255, 255),
        row_bg: Color::Reset,
        row_completed_bg: Color::Rgb(60, 60, 60),
        row_selected_bg: Color::Rgb(52, 56, 60),
        success: Color::Rgb(76, 175, 80),
        info: Color::Rgb(116, 198, 219),
        warning: Color::Rgb(244, 200, 98),
        error: Color::Rgb(255, 107, 107),
    }
}

fn modern_palette() -> Palette {
    Palette {
        text: Color::Rgb(33, 33, 33),
        muted: Color::Rgb(117, 117, 117),
        heading: Color::Rgb(20, 20, 20),
        border: Color::Rgb(180, 180, 180),
        accent: Color::Rgb(0, 123, 255),
        tab_active_bg: Color::Rgb(0, 86, 179),
        tab_active_fg: Color::Rgb(255, 255, 255),
        row_bg: Color::Rgb(249, 249, 249),
        row_completed_bg: Color::Rgb(207, 207, 207),
        row_selected_bg: Color::Rgb(225, 235, 250),
        success: Color::Rgb(56, 142, 60),
        info: Color::Rgb(2, 119, 189),
        warning: Color::Rgb(191, 144, 0),
        error: Color::Rgb(198, 40, 40),
    }
}
