//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use sumsq_cli::output::{reports_json, write_to_file};
use sumsq_cli::presenter::CLIResultPresenter;
use sumsq_cli::progress::BatchProgress;
use sumsq_core::constants::exit_codes;
use sumsq_core::executor::SumError;
use sumsq_core::observer::{ProgressObserver, ProgressSubject};
use sumsq_core::observers::LoggingObserver;
use sumsq_core::outcome::{StrategyId, StrategyOutcome};
use sumsq_core::progress::CancellationToken;
use sumsq_core::registry::DefaultFactory;
use sumsq_orchestration::batch::BatchCoordinator;
use sumsq_orchestration::interfaces::{BatchListener, BatchReport, BatchSummary, ResultPresenter};
use sumsq_orchestration::orchestrator::analyze_batch_results;
use sumsq_orchestration::strategy_selection::get_strategies_to_run;

use crate::config::AppConfig;
use crate::errors::handle_error;

/// Minimum gap between logged progress lines in verbose mode.
const PROGRESS_LOG_INTERVAL_MS: u64 = 100;

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        sumsq_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    run_cli(config)
}

fn run_cli(config: &AppConfig) -> Result<i32> {
    let opts = config.options()?;
    let factory = DefaultFactory::new();
    let executors = get_strategies_to_run(&config.strategy, &factory)?;
    let selected: Vec<StrategyId> = executors.iter().map(|e| e.id()).collect();

    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone())?;

    let progress = Arc::new(if config.quiet || config.json {
        BatchProgress::hidden(&selected)
    } else {
        BatchProgress::new(&selected)
    });
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet || config.json, config.details)
        .with_progress(progress.multi().clone());
    let listener = ConsoleListener {
        presenter: &presenter,
        progress: &progress,
    };
    let observer: Arc<dyn ProgressObserver> = if config.verbose {
        let subject = ProgressSubject::new();
        subject.register(progress.clone());
        subject.register(Arc::new(LoggingObserver::new(PROGRESS_LOG_INTERVAL_MS)));
        Arc::new(subject)
    } else {
        progress.clone()
    };
    let coordinator = BatchCoordinator::new(executors, opts, cancel.clone()).with_observer(observer);

    let mut reports = Vec::new();
    let mut exit_code = exit_codes::SUCCESS;
    for _ in 0..config.batches {
        progress.reset();
        let report = match coordinator.run_batch(config.n, config.tasks, &listener) {
            Ok(report) => report,
            // The listener has already told the user.
            Err(err @ SumError::InvalidInput(_)) => return Ok(handle_error(&err)),
            Err(err) => return Err(err.into()),
        };
        progress.clear();

        if !config.json {
            presenter.present_batch(&report, config.details);
        }
        let code = batch_exit_code(&report);
        if code != exit_codes::SUCCESS {
            exit_code = code;
        }
        reports.push(report);

        if cancel.is_cancelled() {
            warn!("interrupted, skipping remaining batches");
            break;
        }
    }

    if config.json {
        println!("{}", reports_json(&reports)?);
    }
    if let Some(path) = &config.output {
        write_to_file(path, &reports, config.json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(exit_code)
}

/// Exit code for one batch: its first failure, else a cross-check mismatch.
fn batch_exit_code(report: &BatchReport) -> i32 {
    if let Some(failure) = report.failures.first() {
        return handle_error(&failure.error);
    }
    match analyze_batch_results(report) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            sumsq_cli::ui::print_error(&err.to_string());
            handle_error(&err)
        }
    }
}

/// Forwards batch events to the presenter and keeps the progress bars in step.
struct ConsoleListener<'a> {
    presenter: &'a CLIResultPresenter,
    progress: &'a BatchProgress,
}

impl BatchListener for ConsoleListener<'_> {
    fn on_strategy_complete(&self, outcome: &StrategyOutcome) {
        self.presenter.on_strategy_complete(outcome);
    }

    fn on_strategy_failed(&self, strategy: StrategyId, error: &SumError) {
        self.progress.fail(strategy);
        self.presenter.on_strategy_failed(strategy, error);
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        self.presenter.on_batch_complete(summary);
    }

    fn on_validation_failed(&self, error: &SumError) {
        self.presenter.on_validation_failed(error);
    }
}

fn ctrlc_handler(cancel: CancellationToken) -> Result<()> {
    ctrlc::set_handler(move || {
        cancel.cancel();
    })
    .context("failed to install Ctrl+C handler")
}
