//! Event clock and next-event selection
//!
//! The clock holds the current simulation time and one pending time per
//! event kind. A pending time is either a finite instant or [`EventTime::Never`],
//! which orders after every finite instant.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Scheduled time of a pending event
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum EventTime {
    /// Event fires at the given simulation time
    At(f64),
    /// No event of this kind is pending
    Never,
}

impl EventTime {
    /// Whether an event is pending
    pub fn is_pending(&self) -> bool {
        matches!(self, EventTime::At(_))
    }

    /// Scheduled instant, if any
    pub fn time(&self) -> Option<f64> {
        match self {
            EventTime::At(t) => Some(*t),
            EventTime::Never => None,
        }
    }
}

impl PartialEq for EventTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventTime {}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (EventTime::At(a), EventTime::At(b)) => a.total_cmp(b),
            (EventTime::At(_), EventTime::Never) => Ordering::Less,
            (EventTime::Never, EventTime::At(_)) => Ordering::Greater,
            (EventTime::Never, EventTime::Never) => Ordering::Equal,
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::At(t) => write!(f, "{:.4}", t),
            EventTime::Never => write!(f, "never"),
        }
    }
}

/// Kinds of events the line reacts to
///
/// The declaration order is the tie-break priority when two events are
/// scheduled for the same instant: arrivals first, then station 1, then
/// station 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A new item reaches the line
    Arrival,
    /// Station 1 finishes its current item
    Station1Completion,
    /// Station 2 finishes its current item
    Station2Completion,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "arrival"),
            EventKind::Station1Completion => write!(f, "station-1 completion"),
            EventKind::Station2Completion => write!(f, "station-2 completion"),
        }
    }
}

/// Simulation clock with the three pending event times
#[derive(Debug, Clone, PartialEq)]
pub struct EventClock {
    /// Current simulation time
    pub now: f64,
    /// Next item arrival
    pub next_arrival: EventTime,
    /// Completion of the item held by station 1
    pub station1_completion: EventTime,
    /// Completion of the item held by station 2
    pub station2_completion: EventTime,
}

impl Default for EventClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EventClock {
    /// Clock at time zero with nothing scheduled
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_arrival: EventTime::Never,
            station1_completion: EventTime::Never,
            station2_completion: EventTime::Never,
        }
    }

    /// Pending time for the given event kind
    pub fn pending(&self, kind: EventKind) -> EventTime {
        match kind {
            EventKind::Arrival => self.next_arrival,
            EventKind::Station1Completion => self.station1_completion,
            EventKind::Station2Completion => self.station2_completion,
        }
    }

    /// Earliest pending event, ties broken by [`EventKind`] order
    ///
    /// Returns `None` when nothing is scheduled at all.
    pub fn next_event(&self) -> Option<(f64, EventKind)> {
        [EventKind::Arrival, EventKind::Station1Completion, EventKind::Station2Completion]
            .into_iter()
            .filter_map(|kind| self.pending(kind).time().map(|t| (t, kind)))
            .min_by(|(ta, ka), (tb, kb)| ta.total_cmp(tb).then(ka.cmp(kb)))
    }

    /// Schedule `kind` to fire `delay` time units from now
    pub fn schedule_in(&mut self, kind: EventKind, delay: f64) {
        let at = EventTime::At(self.now + delay);
        self.set(kind, at);
    }

    /// Clear any pending event of `kind`
    pub fn cancel(&mut self, kind: EventKind) {
        self.set(kind, EventTime::Never);
    }

    fn set(&mut self, kind: EventKind, at: EventTime) {
        match kind {
            EventKind::Arrival => self.next_arrival = at,
            EventKind::Station1Completion => self.station1_completion = at,
            EventKind::Station2Completion => self.station2_completion = at,
        }
    }
}
