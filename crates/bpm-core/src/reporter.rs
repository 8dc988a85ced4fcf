//! Progress and status reporting.
//!
//! The engine never prints. Everything the user should see goes through a
//! [`Reporter`], which the CLI renders to the terminal.

use bpm_schema::{PackageName, Version};

/// Sink for user-facing progress and status from the engine.
pub trait Reporter: Send + Sync {
    /// Bytes received so far for an artifact; `total` is unknown without a
    /// `Content-Length`.
    fn downloading(&self, name: &PackageName, version: &Version, current: u64, total: Option<u64>);

    /// The artifact is downloaded and is being placed.
    fn installing(&self, name: &PackageName, version: &Version);

    /// A package is about to be removed.
    fn removing(&self, name: &PackageName);

    /// An install or remove finished; `detail` is a short suffix such as the
    /// destination path.
    fn done(&self, name: &PackageName, version: &Version, detail: &str);

    /// A package step failed.
    fn failed(&self, name: &PackageName, version: &Version, reason: &str);

    fn info(&self, msg: &str);

    fn success(&self, msg: &str);

    fn warning(&self, msg: &str);

    fn error(&self, msg: &str);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn downloading(&self, _: &PackageName, _: &Version, _: u64, _: Option<u64>) {}
    fn installing(&self, _: &PackageName, _: &Version) {}
    fn removing(&self, _: &PackageName) {}
    fn done(&self, _: &PackageName, _: &Version, _: &str) {}
    fn failed(&self, _: &PackageName, _: &Version, _: &str) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}
