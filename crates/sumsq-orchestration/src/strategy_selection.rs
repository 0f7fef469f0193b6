//! Strategy selection logic.

use std::sync::Arc;

use sumsq_core::executor::{StrategyExecutor, SumError};
use sumsq_core::outcome::StrategyId;
use sumsq_core::registry::StrategyFactory;

/// Get the executors to run for a `--strategy` selection.
///
/// `all` selects every strategy; anything else must name one.
pub fn get_strategies_to_run(
    selection: &str,
    factory: &dyn StrategyFactory,
) -> Result<Vec<Arc<dyn StrategyExecutor>>, SumError> {
    if selection.trim().eq_ignore_ascii_case("all") {
        return Ok(StrategyId::ALL.iter().map(|&id| factory.get(id)).collect());
    }
    Ok(vec![factory.get_by_name(selection)?])
}
