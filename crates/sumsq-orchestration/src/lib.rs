//! # sumsq-orchestration
//!
//! Batch coordination, completion tracking, strategy selection, and result
//! analysis.

pub mod batch;
pub mod completion;
pub mod interfaces;
pub mod orchestrator;
pub mod strategy_selection;

pub use batch::BatchCoordinator;
pub use completion::CompletionCounter;
pub use interfaces::{
    BatchListener, BatchReport, BatchSummary, NullBatchListener, ResultPresenter, StrategyFailure,
};
pub use orchestrator::analyze_batch_results;
pub use strategy_selection::get_strategies_to_run;
