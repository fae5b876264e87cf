//! Terminal host for the simulated workspace.
//!
//! Renders engine snapshots with Ratatui and turns key presses into engine
//! commands.

mod app;
mod compose;
mod debug_log;
mod help;
mod log_capture;
mod messages;
mod sidebar;
mod ui;

pub use app::run;
pub use log_capture::LogBuffer;
