//! Bounded tick loop.
//!
//! [`run_colony`] wraps the single-tick [`run_tick`] function with the
//! loop around it:
//!
//! - **Bounded run**: stop after `max_ticks` (0 runs until every room is lost)
//! - **Pacing**: sleep `tick_interval_ms` between ticks
//! - **Observation**: a [`TickCallback`] sees every summary
//!
//! The world clock is advanced between ticks through [`TickSource`].
//!
//! [`run_tick`]: crate::tick::run_tick

use colony_world::{LayoutPlanner, Sandbox, Simulation};
use tracing::info;

use crate::config::EngineConfig;
use crate::tick::{self, Colony, TickError, TickSummary};

/// Errors that can occur during the colony run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// A world the runner can step forward between ticks.
pub trait TickSource: Simulation + LayoutPlanner {
    /// Move the world clock forward one tick.
    fn advance(&mut self);
}

impl TickSource for Sandbox {
    fn advance(&mut self) {
        Self::advance(self);
    }
}

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonyEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// No owned room is left.
    NoRoomsOwned,
}

/// Result of the colony run.
#[derive(Debug)]
pub struct ColonyResult {
    /// The reason the run ended.
    pub end_reason: ColonyEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully, before the clock moves.
    fn on_tick(&mut self, summary: &TickSummary, world: &dyn Simulation);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _world: &dyn Simulation) {}
}

/// Run the colony until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_colony<W: TickSource>(
    colony: &mut Colony,
    world: &mut W,
    bounds: &EngineConfig,
    callback: &mut dyn TickCallback,
) -> Result<ColonyResult, RunnerError> {
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = bounds.max_ticks,
        tick_interval_ms = bounds.tick_interval_ms,
        start_tick = world.time(),
        "Colony starting"
    );

    loop {
        let summary = tick::run_tick(colony, world)?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, &*world);

        if summary.rooms_run == 0 && summary.rooms_skipped == 0 {
            info!(tick = summary.tick, "No rooms left");
            return Ok(ColonyResult {
                end_reason: ColonyEndReason::NoRoomsOwned,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        if bounds.max_ticks > 0 && total_ticks >= bounds.max_ticks {
            info!(
                tick = summary.tick,
                max_ticks = bounds.max_ticks,
                "Tick limit reached"
            );
            return Ok(ColonyResult {
                end_reason: ColonyEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        world.advance();

        if bounds.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(bounds.tick_interval_ms)).await;
        }
    }
}

/// Log the end of a run.
pub fn log_colony_end(result: &ColonyResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_workers_alive = result.final_summary.as_ref().map(|s| s.workers_alive),
        "Colony run ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_world::starting_room;

    use super::*;
    use crate::config::ColonyConfig;

    /// Records every tick number it sees.
    struct Recorder(Vec<u64>);

    impl TickCallback for Recorder {
        fn on_tick(&mut self, summary: &TickSummary, world: &dyn Simulation) {
            assert_eq!(summary.tick, world.time());
            self.0.push(summary.tick);
        }
    }

    fn bounded(max_ticks: u64) -> EngineConfig {
        EngineConfig {
            max_ticks,
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn stops_at_the_tick_limit() {
        let (mut sandbox, _) = starting_room().unwrap();
        let mut colony = Colony::new(ColonyConfig::default());
        let mut recorder = Recorder(Vec::new());

        let result = run_colony(&mut colony, &mut sandbox, &bounded(5), &mut recorder)
            .await
            .unwrap();

        assert_eq!(result.end_reason, ColonyEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(recorder.0, vec![0, 1, 2, 3, 4]);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(4));
        log_colony_end(&ColonyResult {
            end_reason: result.end_reason,
            final_summary: None,
            total_ticks: result.total_ticks,
        });
    }

    #[tokio::test]
    async fn empty_world_ends_immediately() {
        let mut sandbox = Sandbox::new();
        let mut colony = Colony::new(ColonyConfig::default());

        let result = run_colony(&mut colony, &mut sandbox, &bounded(0), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, ColonyEndReason::NoRoomsOwned);
        assert_eq!(result.total_ticks, 1);
    }
}
