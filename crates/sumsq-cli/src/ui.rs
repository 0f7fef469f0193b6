//! UI helpers for CLI display.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

/// Render a styled header line.
#[must_use]
pub fn header(text: &str) -> String {
    if is_color_disabled() {
        format!("=== {text} ===")
    } else {
        style(format!("=== {text} ===")).bold().cyan().to_string()
    }
}

/// Render a success line.
#[must_use]
pub fn success(text: &str) -> String {
    tagged("[OK]", text, |s| style(s).green().bold().to_string())
}

/// Render a warning line.
#[must_use]
pub fn warning(text: &str) -> String {
    tagged("[WARN]", text, |s| style(s).yellow().bold().to_string())
}

/// Render an error line.
#[must_use]
pub fn error(text: &str) -> String {
    tagged("[ERROR]", text, |s| style(s).red().bold().to_string())
}

fn tagged(tag: &str, text: &str, paint: impl Fn(&str) -> String) -> String {
    if is_color_disabled() {
        format!("{tag} {text}")
    } else {
        format!("{} {text}", paint(tag))
    }
}

/// Print a styled header.
pub fn print_header(text: &str) {
    println!("{}", header(text));
}

/// Print a success message.
pub fn print_success(text: &str) {
    println!("{}", success(text));
}

/// Print an error message to stderr.
pub fn print_error(text: &str) {
    eprintln!("{}", error(text));
}
