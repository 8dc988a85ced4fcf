//! UI Module - terminal output concerns
//!
//! - [`theme`] - Colors and icons
//! - [`output`] - Status lines and download progress; the engine's reporter
//! - [`prompt`] - Interactive `[y/N]` confirmation
//! - [`table`] - Package tables for `list`

pub mod output;
pub mod prompt;
pub mod table;
pub mod theme;

pub use output::Output;
pub use prompt::StdinConfirm;
pub use theme::Theme;
