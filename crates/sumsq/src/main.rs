//! SumSq-rs: parallel sum of squares across three concurrency strategies.

use sumsq_lib::{app, config, errors, version};

fn main() {
    let config = config::AppConfig::parse();

    let level = if config.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    tracing::info!("{}", version::full_version());

    let code = match app::run(&config) {
        Ok(code) => code,
        Err(err) => {
            sumsq_cli::ui::print_error(&format!("{err:#}"));
            errors::exit_code(&err)
        }
    };
    std::process::exit(code);
}
