//! Output - colored status lines and a single-line download progress meter.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use bpm_core::Reporter;
use bpm_schema::{PackageName, Version};
use crossterm::style::Stylize;

use super::theme::Theme;

/// Terminal reporter used by every command.
#[derive(Debug, Default)]
pub struct Output {
    theme: Theme,
    /// A `\r` progress line is open and needs a newline before other output.
    progress_open: AtomicBool,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_progress(&self) {
        if self.progress_open.swap(false, Ordering::Relaxed) {
            println!();
        }
    }

    /// Print a plain line (tables, search hits).
    pub fn line(&self, msg: &str) {
        self.close_progress();
        println!("{msg}");
    }

    /// `name (version)` as used by `list` and `search`.
    pub fn package_line(&self, name: &str, version: &str) {
        self.close_progress();
        println!(
            "  {} ({})",
            name.with(self.theme.colors.package_name),
            version.with(self.theme.colors.version)
        );
    }
}

/// Progress text for a download; percentage when the size is known.
pub fn progress_text(name: &str, current: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => {
            #[allow(clippy::cast_precision_loss)]
            let pct = current as f64 / total as f64 * 100.0;
            format!("Downloading {name}... {pct:.1}%")
        }
        _ => format!("Downloading {name}... {} KiB", current / 1024),
    }
}

impl Reporter for Output {
    fn downloading(
        &self,
        name: &PackageName,
        _version: &Version,
        current: u64,
        total: Option<u64>,
    ) {
        print!("\r  {}", progress_text(name, current, total));
        let _ = std::io::stdout().flush();
        self.progress_open.store(true, Ordering::Relaxed);
        if total.is_some_and(|t| current >= t) {
            self.close_progress();
        }
    }

    fn installing(&self, name: &PackageName, version: &Version) {
        self.close_progress();
        println!(
            "  {} Installing {} {}",
            self.theme.icons.info.with(self.theme.colors.info),
            name.as_str().with(self.theme.colors.package_name),
            version.as_str().with(self.theme.colors.version)
        );
    }

    fn removing(&self, name: &PackageName) {
        self.close_progress();
        println!(
            "  {} Removing {}",
            self.theme.icons.info.with(self.theme.colors.info),
            name.as_str().with(self.theme.colors.package_name)
        );
    }

    fn done(&self, name: &PackageName, version: &Version, detail: &str) {
        self.close_progress();
        let version = if version.is_empty() {
            String::new()
        } else {
            format!(" {version}")
        };
        println!(
            "  {} {}{} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            name.as_str().with(self.theme.colors.package_name),
            version.with(self.theme.colors.version),
            detail.with(self.theme.colors.secondary)
        );
    }

    fn failed(&self, name: &PackageName, version: &Version, reason: &str) {
        self.close_progress();
        eprintln!(
            "  {} {} {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            name.as_str().with(self.theme.colors.package_name),
            version.as_str().with(self.theme.colors.version),
            reason.with(self.theme.colors.error)
        );
    }

    fn info(&self, msg: &str) {
        self.close_progress();
        println!(
            "  {} {}",
            self.theme.icons.info.with(self.theme.colors.info),
            msg
        );
    }

    fn success(&self, msg: &str) {
        self.close_progress();
        println!(
            "  {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            msg.with(self.theme.colors.success)
        );
    }

    fn warning(&self, msg: &str) {
        self.close_progress();
        println!(
            "  {} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg.with(self.theme.colors.warning)
        );
    }

    fn error(&self, msg: &str) {
        self.close_progress();
        eprintln!(
            "  {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            msg.with(self.theme.colors.error)
        );
    }
}
