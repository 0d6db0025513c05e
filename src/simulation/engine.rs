//! Event-driven production line engine
//!
//! [`ProductionLine`] advances the clock from one event to the next, integrates
//! busy time over each elapsed interval, and hands the event to the matching
//! handler. Runs can be driven to completion with [`ProductionLine::run`] or
//! one event at a time with [`ProductionLine::start`] and [`ProductionLine::step`].

use crate::simulation::clock::{EventClock, EventKind};
use crate::simulation::error::SimulationResult;
use crate::simulation::line::{Item, LineState};
use crate::simulation::statistics::{RunStatistics, StatisticsAccumulator};
use crate::simulation::variates::{RngVariates, VariateSource};
use crate::types::{validate_horizon, LineConfig};
use rand::rngs::StdRng;
use tracing::{debug, info, info_span, trace};

/// Two-station production line simulation engine
#[derive(Debug, Clone)]
pub struct ProductionLine<V> {
    /// Configuration of every run on this engine
    config: LineConfig,
    /// Source of arrival and service durations
    variates: V,
    /// Current time and pending events
    clock: EventClock,
    /// Buffers, stations and blocking flag
    line: LineState,
    /// Counters and integrals of the current run
    stats: StatisticsAccumulator,
    /// End of the current run
    horizon: f64,
    /// Whether the current run reached its horizon
    finished: bool,
}

impl ProductionLine<RngVariates<StdRng>> {
    /// Create an engine drawing from a seeded standard RNG
    pub fn seeded(config: LineConfig, seed: u64) -> SimulationResult<Self> {
        Self::new(config, RngVariates::seeded(seed))
    }

    /// Create an engine drawing from an entropy-seeded standard RNG
    pub fn from_entropy(config: LineConfig) -> SimulationResult<Self> {
        Self::new(config, RngVariates::from_entropy())
    }
}

impl<V: VariateSource> ProductionLine<V> {
    /// Create a new engine, rejecting invalid configurations
    pub fn new(config: LineConfig, variates: V) -> SimulationResult<Self> {
        config.validate()?;

        Ok(Self {
            line: LineState::new(config.buffer1_capacity, config.buffer2_capacity),
            clock: EventClock::new(),
            stats: StatisticsAccumulator::new(),
            horizon: 0.0,
            finished: true,
            config,
            variates,
        })
    }

    /// Configuration used by every run
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Current line state
    pub fn line(&self) -> &LineState {
        &self.line
    }

    /// Current clock
    pub fn clock(&self) -> &EventClock {
        &self.clock
    }

    /// Current simulation time
    pub fn now(&self) -> f64 {
        self.clock.now
    }

    /// Horizon of the current run
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Counters and integrals of the current run
    pub fn statistics(&self) -> &StatisticsAccumulator {
        &self.stats
    }

    /// Whether the current run has reached its horizon
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Borrow the variate source
    pub fn variates(&self) -> &V {
        &self.variates
    }

    /// Run from an empty line until `horizon` and return the statistics
    ///
    /// All state is reset first, so repeated calls do not accumulate.
    pub fn run(&mut self, horizon: f64) -> SimulationResult<RunStatistics> {
        let span = info_span!(
            "production_line_run",
            horizon,
            buffer1_capacity = self.config.buffer1_capacity,
            buffer2_capacity = self.config.buffer2_capacity
        );
        let _guard = span.enter();

        self.start(horizon)?;
        while self.step().is_some() {}

        let statistics = self.finish();
        info!(
            "Run finished: {} arrived, {} processed, utilization {:.3} / {:.3}",
            statistics.items_arrived,
            statistics.items_processed,
            statistics.station1_utilization,
            statistics.station2_utilization
        );
        Ok(statistics)
    }

    /// Reset to an empty line and schedule the first arrival
    pub fn start(&mut self, horizon: f64) -> SimulationResult<()> {
        validate_horizon(horizon)?;

        self.reset();
        self.horizon = horizon;
        self.finished = false;

        let first_arrival = self.variates.exponential(self.config.mean_arrival_time);
        self.clock.schedule_in(EventKind::Arrival, first_arrival);

        debug!("Run started with horizon {} (first arrival at {})", horizon, self.clock.next_arrival);
        Ok(())
    }

    /// Process the next event
    ///
    /// Returns the kind of event handled, or `None` once the next event
    /// would fall at or beyond the horizon. Busy time up to the horizon is
    /// integrated before stopping and the clock is left at the horizon.
    pub fn step(&mut self) -> Option<EventKind> {
        if self.finished {
            return None;
        }

        let Some((event_time, kind)) = self.clock.next_event() else {
            self.stop();
            return None;
        };

        self.stats.integrate(&self.line, self.clock.now, event_time.min(self.horizon));

        if event_time >= self.horizon {
            self.stop();
            return None;
        }

        self.clock.now = event_time;
        trace!(time = event_time, event = %kind, "Dispatching event");

        match kind {
            EventKind::Arrival => self.handle_arrival(),
            EventKind::Station1Completion => self.handle_station1_completion(),
            EventKind::Station2Completion => self.handle_station2_completion(),
        }

        self.stats.record_event();
        self.stats.observe_buffers(&self.line);
        Some(kind)
    }

    /// Snapshot the statistics of the current run
    pub fn finish(&self) -> RunStatistics {
        self.stats.finish(self.horizon, &self.config, &self.line)
    }

    /// Clear line state, clock and statistics
    pub fn reset(&mut self) {
        self.line = LineState::new(self.config.buffer1_capacity, self.config.buffer2_capacity);
        self.clock = EventClock::new();
        self.stats = StatisticsAccumulator::new();
        self.horizon = 0.0;
        self.finished = true;
    }

    fn stop(&mut self) {
        self.clock.now = self.horizon;
        self.finished = true;
        debug!("Horizon {} reached after {} events", self.horizon, self.stats.events_dispatched);
    }

    fn handle_arrival(&mut self) {
        self.stats.record_arrival();
        let item = Item::new(self.clock.now);

        if !self.line.can_admit() {
            self.reject(item);
        } else if let Err(item) = self.line.buffer1.try_push(item) {
            self.reject(item);
        } else if self.line.station1.is_none() {
            if let Some(next) = self.line.buffer1.pop() {
                self.start_station1(next);
            }
        }

        // The next arrival is scheduled whether or not this one got in.
        let delay = self.variates.exponential(self.config.mean_arrival_time);
        self.clock.schedule_in(EventKind::Arrival, delay);
    }

    fn handle_station1_completion(&mut self) {
        let now = self.clock.now;
        let mut item = self
            .line
            .station1
            .take()
            .expect("station-1 completion fired with an empty station");
        item.station1_exit = Some(now);

        match self.try_hand_off(item) {
            Ok(()) => {
                self.line.station1_blocked = false;
                match self.line.buffer1.pop() {
                    Some(next) => self.start_station1(next),
                    None => self.clock.cancel(EventKind::Station1Completion),
                }
            }
            Err(item) => {
                // Station 1 keeps the finished item and halts until buffer 2 has room.
                self.line.station1 = Some(item);
                self.line.station1_blocked = true;
                self.clock.cancel(EventKind::Station1Completion);
                debug!(time = now, "Station 1 blocked");
            }
        }
    }

    fn handle_station2_completion(&mut self) {
        let now = self.clock.now;
        let mut item = self
            .line
            .station2
            .take()
            .expect("station-2 completion fired with an empty station");
        item.station2_exit = Some(now);
        self.stats.record_completion(&item);

        match self.line.buffer2.pop() {
            Some(next) => self.start_station2(next),
            None => self.clock.cancel(EventKind::Station2Completion),
        }

        if self.line.station1_blocked && self.line.can_hand_off() {
            self.line.station1_blocked = false;
            debug!(time = now, "Station 1 unblocked");

            if self.line.station1.is_some() {
                // The held item gets a fresh service time instead of moving on directly.
                let delay = self.variates.exponential(self.config.mean_service_time1);
                self.clock.schedule_in(EventKind::Station1Completion, delay);
            } else if let Some(next) = self.line.buffer1.pop() {
                self.start_station1(next);
            }
        }
    }

    /// Push a finished item into buffer 2, handing it back if buffer 2 is full
    fn try_hand_off(&mut self, item: Item) -> Result<(), Item> {
        self.line.buffer2.try_push(item)?;
        if self.line.station2.is_none() {
            if let Some(next) = self.line.buffer2.pop() {
                self.start_station2(next);
            }
        }
        Ok(())
    }

    fn start_station1(&mut self, item: Item) {
        self.line.station1 = Some(item);
        let delay = self.variates.exponential(self.config.mean_service_time1);
        self.clock.schedule_in(EventKind::Station1Completion, delay);
    }

    fn start_station2(&mut self, item: Item) {
        self.line.station2 = Some(item);
        let delay = self.variates.exponential(self.config.mean_service_time2);
        self.clock.schedule_in(EventKind::Station2Completion, delay);
    }

    fn reject(&mut self, item: Item) {
        self.stats.record_loss();
        trace!(time = item.arrival_time, "Item lost at entrance");
    }
}
