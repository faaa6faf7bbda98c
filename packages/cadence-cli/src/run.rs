use std::future;
use std::time::Duration;

use anyhow::{Context, Result};
use cadence_scheduler::{Emitter, Renderer, Scheduler, SchedulerConfig};

/// Runs the animation on a blocking thread until it finishes on its own,
/// `duration` elapses, or Ctrl-C is pressed. The last two request a stop,
/// which the frame loop turns into the usual orderly shutdown.
pub async fn animate<Em, R>(
    emitter: Em,
    renderer: R,
    config: SchedulerConfig,
    duration: Option<Duration>,
) -> Result<()>
where
    Em: Emitter,
    R: Renderer<Em::Event> + Send + 'static,
{
    let mut scheduler = Scheduler::with_config(emitter, renderer, config)?;
    let stop = scheduler.stop_handle();
    let mut animation = tokio::task::spawn_blocking(move || scheduler.loop_forever());

    let interrupted = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {}", err);
            future::pending::<()>().await;
        }
    };
    let elapsed = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => future::pending::<()>().await,
        }
    };

    tokio::select! {
        finished = &mut animation => {
            finished.context("animation thread panicked")??;
            return Ok(());
        }
        _ = interrupted => tracing::info!("Interrupted, stopping animation..."),
        _ = elapsed => tracing::info!("Time is up, stopping animation..."),
    }

    stop.request_stop();
    animation.await.context("animation thread panicked")??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_patterns::{AsciiRenderer, Burst, DebugRenderer, ScriptedEmitter, TestEmitter};
    use std::time::Instant;

    #[tokio::test]
    async fn returns_when_frame_limit_is_hit() {
        let emitter = ScriptedEmitter::new([Burst::new(2, '*')]);
        let config = SchedulerConfig::new(500.0).with_max_frames(10);

        animate(emitter, AsciiRenderer::new(Vec::new()), config, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duration_requests_an_orderly_stop() {
        let emitter = TestEmitter::with_period(Duration::from_secs(10));
        let renderer = DebugRenderer::<_, ()>::new(Vec::new());

        let start = Instant::now();
        animate(
            emitter,
            renderer,
            SchedulerConfig::default(),
            Some(Duration::from_millis(50)),
        )
        .await
        .unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn invalid_frame_rate_is_an_error() {
        let emitter = TestEmitter::new();
        let renderer = DebugRenderer::<_, ()>::new(Vec::new());

        let result = animate(emitter, renderer, SchedulerConfig::new(0.0), None).await;

        assert!(result.is_err());
    }
}
