//! tasklist - Single-screen Task List Library
//!
//! This library provides the core of the tasklist CLI: an in-memory task
//! collection with completion state, optional due dates, case-insensitive
//! search, and an all/completed/pending section filter.
//!
//! # Core Concepts
//!
//! - **Task Store**: Ordered, in-memory tasks with stable numeric ids
//! - **Session**: Store plus view state (section, search) and input buffers
//! - **Commands**: The add/toggle/delete/filter operations a user can trigger
//! - **Themes**: Classic and modern palettes for the terminal UI
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output envelopes
//! - `script`: Line-oriented command scripts for non-interactive runs
//! - `session`: Session state and command dispatch
//! - `task`: Task records, sections, and the task store
//! - `theme`: Color themes
//! - `ui`: Terminal task viewer built on ratatui

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod script;
pub mod session;
pub mod task;
pub mod theme;
pub mod ui;

pub use error::{Error, Result};
