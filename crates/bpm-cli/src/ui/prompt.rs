//! Interactive confirmation on stdin.

use std::io::Write;

use bpm_core::Confirm;
use crossterm::style::Stylize;

/// Prints `<prompt> [y/N]: ` and reads one line. Anything but `y`/`yes`
/// (or an unreadable stdin) counts as no.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("  {} ", format!("{prompt} [y/N]:").yellow());
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        is_yes(&input)
    }
}

fn is_yes(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}
