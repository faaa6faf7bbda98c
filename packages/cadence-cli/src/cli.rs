use std::time::Duration;

use anyhow::{Context, Result};
use cadence_scheduler::SchedulerConfig;
use cadence_scheduler::config::DEFAULT_FRAMES_PER_SECOND;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Event-driven terminal animations", long_about = None)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw random bursts of symbols as an ASCII wave
    Ascii {
        #[command(flatten)]
        timing: TimingArgs,

        /// Seed for reproducible bursts
        #[arg(long)]
        seed: Option<u64>,

        /// Shortest wait between bursts, in milliseconds
        #[arg(long, default_value_t = 500)]
        min_wait_ms: u64,

        /// Longest wait between bursts, in milliseconds
        #[arg(long, default_value_t = 1500)]
        max_wait_ms: u64,
    },
    /// Print every event from a periodic test emitter
    Debug {
        #[command(flatten)]
        timing: TimingArgs,

        /// Time between test events, in milliseconds
        #[arg(long, default_value_t = 1000)]
        period_ms: u64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    /// Frames drawn per second
    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_SECOND, allow_hyphen_values = true)]
    pub fps: f64,

    /// Deliver at most this many events per frame
    #[arg(long)]
    pub max_events_per_frame: Option<usize>,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Give up waiting for the emitter after this many milliseconds
    #[arg(long)]
    pub join_timeout_ms: Option<u64>,
}

impl TimingArgs {
    pub fn config(&self) -> SchedulerConfig {
        let mut config = SchedulerConfig::new(self.fps);
        if let Some(limit) = self.max_events_per_frame {
            config = config.with_max_events_per_frame(limit);
        }
        if let Some(frames) = self.frames {
            config = config.with_max_frames(frames);
        }
        if let Some(ms) = self.join_timeout_ms {
            config = config.with_join_timeout(Duration::from_millis(ms));
        }
        config
    }

    pub fn duration(&self) -> Result<Option<Duration>> {
        self.duration
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid --duration {}", secs))
            })
            .transpose()
    }
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_defaults() {
        let cli = Cli::try_parse_from(["cadence", "ascii"]).unwrap();
        let Commands::Ascii {
            timing,
            seed,
            min_wait_ms,
            max_wait_ms,
        } = cli.command
        else {
            panic!("expected ascii command");
        };
        assert_eq!(timing.config(), SchedulerConfig::default());
        assert_eq!(seed, None);
        assert_eq!((min_wait_ms, max_wait_ms), (500, 1500));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn debug_with_limits() {
        let cli = Cli::try_parse_from([
            "cadence",
            "-vv",
            "debug",
            "--fps",
            "30",
            "--frames",
            "90",
            "--max-events-per-frame",
            "100",
            "--join-timeout-ms",
            "250",
            "--duration",
            "1.5",
        ])
        .unwrap();
        assert_eq!(cli.default_log_filter(), "debug");
        let Commands::Debug { timing, period_ms } = cli.command else {
            panic!("expected debug command");
        };
        assert_eq!(period_ms, 1000);
        let config = timing.config();
        assert_eq!(config.frames_per_second, 30.0);
        assert_eq!(config.max_frames, Some(90));
        assert_eq!(config.max_events_per_frame, Some(100));
        assert_eq!(config.join_timeout, Some(Duration::from_millis(250)));
        assert_eq!(timing.duration().unwrap(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn negative_fps_parses_and_fails_validation() {
        let cli = Cli::try_parse_from(["cadence", "debug", "--fps", "-5"]).unwrap();
        let Commands::Debug { timing, .. } = cli.command else {
            panic!("expected debug command");
        };
        assert!(timing.config().validate().is_err());
    }
}
