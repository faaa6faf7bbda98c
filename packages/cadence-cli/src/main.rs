mod cli;
mod run;

use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use cadence_patterns::{AsciiRenderer, DebugRenderer, RandomEmitter, TestEmitter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the animation on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ascii {
            timing,
            seed,
            min_wait_ms,
            max_wait_ms,
        } => {
            let emitter = match seed {
                Some(seed) => RandomEmitter::with_seed(seed),
                None => RandomEmitter::new(),
            }
            .with_wait(
                Duration::from_millis(min_wait_ms),
                Duration::from_millis(max_wait_ms),
            );
            run::animate(
                emitter,
                AsciiRenderer::stdout(),
                timing.config(),
                timing.duration()?,
            )
            .await
        }
        Commands::Debug { timing, period_ms } => {
            let emitter = TestEmitter::with_period(Duration::from_millis(period_ms));
            run::animate(
                emitter,
                DebugRenderer::<Stdout, ()>::stdout(),
                timing.config(),
                timing.duration()?,
            )
            .await
        }
    }
}
