//! CLI output formatting and report files.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use num_bigint::BigUint;
use sumsq_orchestration::interfaces::BatchReport;

/// Format a `BigUint` for display, truncating long values unless verbose.
#[must_use]
pub fn format_total(value: &BigUint, verbose: bool) -> String {
    let s = value.to_string();
    if !verbose && s.len() > 100 {
        format!("{}...{} ({} digits)", &s[..50], &s[s.len() - 50..], s.len())
    } else {
        s
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format an integer with thousand separators.
#[must_use]
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Render reports as pretty-printed JSON: one object for a single batch,
/// an array otherwise.
pub fn reports_json(reports: &[BatchReport]) -> io::Result<String> {
    Ok(match reports {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    })
}

/// Render one `strategy total` line per outcome.
#[must_use]
pub fn report_text(report: &BatchReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(outcome.strategy.short_name());
        out.push(' ');
        out.push_str(&outcome.total_decimal());
        out.push('\n');
    }
    out
}

/// Write reports to a file, as JSON (see [`reports_json`]) or as plain text lines.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &Path, reports: &[BatchReport], json: bool) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    if json {
        writeln!(file, "{}", reports_json(reports)?)?;
    } else {
        for report in reports {
            file.write_all(report_text(report).as_bytes())?;
        }
    }
    Ok(())
}
