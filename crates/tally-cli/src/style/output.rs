//! Status lines shared by every command.
//!
//! Successes, warnings and hints go to stdout; failures go to stderr so they
//! stay visible when a report is piped.

use super::colors::SemanticStyle;

/// Width of the label column in [`print_labeled`] output.
const LABEL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Done,
    Failed,
    Warning,
    Hint,
}

impl Status {
    fn mark(self) -> String {
        match self {
            Self::Done => "✓".success(),
            Self::Failed => "✗".error(),
            Self::Warning => "⚠".warning(),
            Self::Hint => "→".muted(),
        }
    }
}

fn status_line(status: Status, msg: &str) -> String {
    let msg = if status == Status::Hint {
        msg.muted()
    } else {
        msg.to_string()
    };
    format!("{} {msg}", status.mark())
}

fn labeled_line(key: &str, value: &str) -> String {
    let label = format!("{key}:");
    let padding = " ".repeat(LABEL_WIDTH.saturating_sub(label.chars().count()));
    format!("  {}{padding} {value}", label.muted())
}

pub fn print_success(msg: &str) {
    println!("{}", status_line(Status::Done, msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", status_line(Status::Failed, msg));
}

pub fn print_warn(msg: &str) {
    println!("{}", status_line(Status::Warning, msg));
}

pub fn print_hint(msg: &str) {
    println!("{}", status_line(Status::Hint, msg));
}

/// Prints an indented `key: value` pair with values aligned in one column.
pub fn print_labeled(key: &str, value: &str) {
    println!("{}", labeled_line(key, value));
}

/// Prints a shell command the user can copy.
pub fn print_command(cmd: &str) {
    println!("  {} {}", "$".muted(), cmd.code());
}

pub fn print_spacer() {
    println!();
}
