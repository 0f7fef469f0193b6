//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use sumsq_core::executor::SumError;
use sumsq_core::options::Options;

/// SumSq-rs: sum of squares of 1..=N, computed concurrently by thread,
/// queue and future based strategies.
#[derive(Parser, Debug)]
#[command(name = "sumsq", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Upper bound N of the summed range.
    #[arg(short, long, default_value = "1000000", env = "SUMSQ_N", allow_negative_numbers = true)]
    pub n: i64,

    /// Number of concurrent tasks per strategy.
    #[arg(short, long, default_value = "4", env = "SUMSQ_TASKS", allow_negative_numbers = true)]
    pub tasks: i32,

    /// Strategy to run: threads, queues, futures, or all.
    #[arg(long, default_value = "all")]
    pub strategy: String,

    /// Number of batches to run back to back.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub batches: u32,

    /// Join timeout per strategy (e.g., "30s", "5m", "500ms").
    #[arg(long, default_value = "5m")]
    pub timeout: String,

    /// Worker threads for the future-based runtime (0 = one per CPU).
    #[arg(long, default_value = "0")]
    pub future_threads: usize,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (only output the total).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show detailed information.
    #[arg(short, long)]
    pub details: bool,

    /// Print the batch report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the timeout flag.
    pub fn timeout_duration(&self) -> Result<Duration, SumError> {
        parse_duration(&self.timeout)
            .ok_or_else(|| SumError::Config(format!("invalid timeout: {:?}", self.timeout)))
    }

    /// Strategy options derived from the flags.
    pub fn options(&self) -> Result<Options, SumError> {
        Ok(Options {
            join_timeout: Some(self.timeout_duration()?),
            future_threads: self.future_threads,
        }
        .normalize())
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        Some(Duration::from_millis(ms.parse().ok()?))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        Some(Duration::from_secs(secs.parse().ok()?))
    } else {
        Some(Duration::from_secs(s.parse().ok()?))
    }
}
