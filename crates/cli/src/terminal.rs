//! Interactive confirmation on the controlling terminal.

use kata_files::Confirm;
use std::io::{self, BufRead, Write};

/// Asks on stdout and reads one line from stdin. Anything but `y`/`yes`
/// (case-insensitive) declines, including a closed stdin.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
