//! Strategy identifiers and the per-strategy outcome surfaced to callers.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};

use crate::executor::SumError;

/// One of the three concurrency strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StrategyId {
    /// One OS thread per range, joined with a countdown latch.
    #[serde(rename = "threads")]
    ThreadPerTask,
    /// One single-threaded event loop per range plus a coordinator queue.
    #[serde(rename = "queues")]
    DedicatedQueue,
    /// One async task per range on a shared runtime, joined by a combinator.
    #[serde(rename = "futures")]
    FutureBased,
}

impl StrategyId {
    /// Every strategy, in reporting order.
    pub const ALL: [StrategyId; 3] = [
        StrategyId::ThreadPerTask,
        StrategyId::DedicatedQueue,
        StrategyId::FutureBased,
    ];

    /// Position of this strategy in [`StrategyId::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::ThreadPerTask => 0,
            Self::DedicatedQueue => 1,
            Self::FutureBased => 2,
        }
    }

    /// Short selector name used on the command line.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::ThreadPerTask => "threads",
            Self::DedicatedQueue => "queues",
            Self::FutureBased => "futures",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ThreadPerTask => "ThreadPerTask",
            Self::DedicatedQueue => "DedicatedQueue",
            Self::FutureBased => "FutureBased",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for StrategyId {
    type Err = SumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threads" | "thread" | "threadpertask" => Ok(Self::ThreadPerTask),
            "queues" | "queue" | "dedicatedqueue" => Ok(Self::DedicatedQueue),
            "futures" | "future" | "futurebased" => Ok(Self::FutureBased),
            other => Err(SumError::Config(format!("unknown strategy: {other}"))),
        }
    }
}

/// Result of one strategy execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyOutcome {
    /// Strategy that produced the total.
    pub strategy: StrategyId,
    /// Upper bound of the summed range `[1, n]`.
    pub n: i64,
    /// Number of concurrent tasks actually used.
    pub tasks: usize,
    /// Aggregated sum of squares.
    #[serde(serialize_with = "serialize_decimal")]
    pub total: BigUint,
    /// Wall-clock time from dispatch to the last partial result.
    #[serde(rename = "elapsed_millis", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl StrategyOutcome {
    /// Elapsed time in whole milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> i64 {
        i64::try_from(self.elapsed.as_millis()).unwrap_or(i64::MAX)
    }

    /// Total rendered as a decimal string.
    #[must_use]
    pub fn total_decimal(&self) -> String {
        self.total.to_str_radix(10)
    }
}

fn serialize_decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(i64::try_from(value.as_millis()).unwrap_or(i64::MAX))
}
