//! Tick callback that logs a periodic colony status line per room.

use colony_core::{TickCallback, TickSummary};
use colony_world::Simulation;
use tracing::info;

/// Logs room status every `every` ticks.
#[derive(Debug)]
pub struct StatusReporter {
    every: u64,
    reports: u64,
}

impl StatusReporter {
    /// A reporter that logs on every tick divisible by `every` (0 disables
    /// reporting).
    pub const fn new(every: u64) -> Self {
        Self { every, reports: 0 }
    }

    /// Status lines logged so far.
    pub const fn reports(&self) -> u64 {
        self.reports
    }
}

impl TickCallback for StatusReporter {
    fn on_tick(&mut self, summary: &TickSummary, world: &dyn Simulation) {
        if summary.tick.checked_rem(self.every) != Some(0) {
            return;
        }
        for name in world.room_names() {
            let Some(room) = world.room(&name) else {
                continue;
            };
            let (progress, progress_total) = room
                .controller
                .as_ref()
                .map_or((0, 0), |c| (c.progress, c.progress_total()));
            info!(
                tick = summary.tick,
                room = %name,
                level = room.level(),
                progress,
                progress_total,
                energy_available = room.energy_available(),
                construction_sites = room.construction_sites.len(),
                hostiles = room.has_hostiles(),
                workers_alive = summary.workers_alive,
                "Colony status"
            );
            self.reports = self.reports.saturating_add(1);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_world::starting_room;

    use super::*;

    #[test]
    fn reports_on_the_interval_only() {
        let (sandbox, _) = starting_room().unwrap();
        let mut reporter = StatusReporter::new(10);
        for tick in [0, 3, 10, 15, 20] {
            let summary = TickSummary {
                tick,
                ..TickSummary::default()
            };
            reporter.on_tick(&summary, &sandbox);
        }
        assert_eq!(reporter.reports(), 3);
    }

    #[test]
    fn zero_interval_disables_reporting() {
        let (sandbox, _) = starting_room().unwrap();
        let mut reporter = StatusReporter::new(0);
        reporter.on_tick(&TickSummary::default(), &sandbox);
        assert_eq!(reporter.reports(), 0);
    }
}
