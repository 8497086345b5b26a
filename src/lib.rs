//! pomodoro-pet library root.
//! Exposes the CLI parser, the high-level run() function, and the timer,
//! sound and settings modules behind them.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::Cli;
use crate::core::environment::Environment;
use errors::AppResult;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Central command dispatcher
pub fn dispatch(cli: Cli) -> AppResult<()> {
    let env = Environment::detect(cli.base_dir);
    if cli.check_resources {
        cli::commands::check::handle(&env)
    } else {
        cli::commands::run::handle(env)
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    init_logging();
    let cli = Cli::parse();
    dispatch(cli)
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pomodoro_pet=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
