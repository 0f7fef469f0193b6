//! Per-strategy progress bars fed by worker progress updates.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use sumsq_core::constants::STRATEGY_COUNT;
use sumsq_core::observer::ProgressObserver;
use sumsq_core::outcome::StrategyId;
use sumsq_core::progress::ProgressUpdate;

const BAR_TEMPLATE: &str = "{prefix:>15} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} ranges {msg}";

/// One progress bar per selected strategy, advanced as ranges complete.
pub struct BatchProgress {
    multi: MultiProgress,
    bars: [Option<ProgressBar>; STRATEGY_COUNT],
}

impl BatchProgress {
    /// Bars for `strategies`, drawn to stderr.
    #[must_use]
    pub fn new(strategies: &[StrategyId]) -> Self {
        Self::with_target(strategies, ProgressDrawTarget::stderr())
    }

    /// Bars that are tracked but never drawn.
    #[must_use]
    pub fn hidden(strategies: &[StrategyId]) -> Self {
        Self::with_target(strategies, ProgressDrawTarget::hidden())
    }

    fn with_target(strategies: &[StrategyId], target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let mut bars: [Option<ProgressBar>; STRATEGY_COUNT] = Default::default();
        for &id in strategies {
            let bar = multi.add(ProgressBar::new(0));
            bar.set_style(style.clone());
            bar.set_prefix(id.display_name());
            bars[id.index()] = Some(bar);
        }
        Self { multi, bars }
    }

    /// Handle for printing lines above the bars.
    #[must_use]
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }

    /// Rewind every bar for a new batch.
    pub fn reset(&self) {
        for bar in self.bars.iter().flatten() {
            bar.reset();
            bar.set_message("");
        }
    }

    /// Position of a strategy's bar, if it has one.
    #[must_use]
    pub fn position(&self, strategy: StrategyId) -> Option<u64> {
        self.bars[strategy.index()].as_ref().map(ProgressBar::position)
    }

    /// Mark a strategy as failed.
    pub fn fail(&self, strategy: StrategyId) {
        if let Some(bar) = &self.bars[strategy.index()] {
            bar.abandon_with_message("failed");
        }
    }

    /// Remove all bars from the terminal.
    pub fn clear(&self) {
        for bar in self.bars.iter().flatten() {
            bar.finish_and_clear();
        }
        let _ = self.multi.clear();
    }
}

impl ProgressObserver for BatchProgress {
    fn on_progress(&self, update: &ProgressUpdate) {
        let Some(bar) = &self.bars[update.strategy.index()] else {
            return;
        };
        bar.set_length(update.total_ranges as u64);
        // Updates from concurrent workers may arrive out of order.
        if update.completed_ranges as u64 > bar.position() {
            bar.set_position(update.completed_ranges as u64);
        }
        if update.done {
            bar.finish_with_message("done");
        }
    }
}
