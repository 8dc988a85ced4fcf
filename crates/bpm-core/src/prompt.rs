//! Interactive confirmation seam.

/// Asks the user a yes/no question before a destructive step.
pub trait Confirm: Send + Sync {
    /// Returns `true` if the user accepted.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Accepts every prompt (`--yes`, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!("Auto-confirming: {prompt}");
        true
    }
}
