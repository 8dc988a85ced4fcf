//! Package operations: install and remove.

pub mod context;
pub mod error;
pub mod install;
pub mod remove;

pub use context::{Context, Layout};
pub use error::{InstallError, RemoveError};
pub use install::{InstallOutcome, fetch_and_place, install};
pub use remove::{RemoveOutcome, remove};
