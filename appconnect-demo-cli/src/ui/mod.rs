//! Terminal output for the demo commands

use appconnect_lib::{CallbackReport, SessionId, StorageNamespace};
use colored::Colorize;

/// Placeholder for an absent stored value.
pub const NONE: &str = "(none)";

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Errors go to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn header(text: &str) {
    println!("\n{}", text.bold().underline());
}

/// Print an indented `key: value` line. Tests read these back, keep the shape.
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// `key_value` for optional stored entries.
pub fn stored(key: &str, value: Option<&str>) {
    key_value(key, value.unwrap_or(NONE));
}

/// Print the namespace a command works on.
pub fn namespace(namespace: &StorageNamespace) {
    key_value("Namespace", namespace.as_str());
}

pub fn session_id(session_id: &SessionId) {
    key_value("Session ID", &session_id.as_str().bold().to_string());
}

pub fn separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// Pretty-print result parameters between separators.
pub fn json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        separator();
        println!("{}", pretty);
        separator();
    }
}

/// One-line verdict of a callback cycle.
pub fn report(report: &CallbackReport) {
    match report {
        CallbackReport::Succeeded => success("Session matched"),
        CallbackReport::Ignored(reason) => warning(&format!("Callback ignored: {}", reason)),
        CallbackReport::Failed(err) => error(&format!("Callback failed: {}", err)),
    }
}
