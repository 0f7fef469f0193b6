//! Strategy factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dedicated_queue::DedicatedQueue;
use crate::executor::{StrategyExecutor, StrategyRunner, SumError};
use crate::future_based::FutureBased;
use crate::outcome::StrategyId;
use crate::thread_per_task::ThreadPerTask;

/// Factory trait for obtaining strategy executors.
pub trait StrategyFactory: Send + Sync {
    /// Get or create the executor for a strategy.
    fn get(&self, id: StrategyId) -> Arc<dyn StrategyExecutor>;

    /// Get an executor by its selector name (`threads`, `queues`, `futures`).
    fn get_by_name(&self, name: &str) -> Result<Arc<dyn StrategyExecutor>, SumError> {
        Ok(self.get(name.parse()?))
    }

    /// Selector names of every available strategy.
    fn available(&self) -> Vec<&'static str> {
        StrategyId::ALL.iter().map(|id| id.short_name()).collect()
    }
}

/// Default factory with lazy creation and cache.
///
/// Cached executors keep their resources, so the future-based runtime is
/// built once per factory.
pub struct DefaultFactory {
    cache: RwLock<HashMap<StrategyId, Arc<dyn StrategyExecutor>>>,
}

impl DefaultFactory {
    /// Create an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Executors for every strategy, in reporting order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn StrategyExecutor>> {
        StrategyId::ALL.iter().map(|&id| self.get(id)).collect()
    }

    fn create_executor(id: StrategyId) -> Arc<dyn StrategyExecutor> {
        match id {
            StrategyId::ThreadPerTask => Arc::new(StrategyRunner::new(Arc::new(ThreadPerTask::new()))),
            StrategyId::DedicatedQueue => Arc::new(StrategyRunner::new(Arc::new(DedicatedQueue::new()))),
            StrategyId::FutureBased => Arc::new(StrategyRunner::new(Arc::new(FutureBased::new()))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyFactory for DefaultFactory {
    fn get(&self, id: StrategyId) -> Arc<dyn StrategyExecutor> {
        if let Some(executor) = self.cache.read().get(&id) {
            return Arc::clone(executor);
        }

        let mut cache = self.cache.write();
        Arc::clone(cache.entry(id).or_insert_with(|| Self::create_executor(id)))
    }
}
