//! Line state: items, bounded buffers and station slots
//!
//! Items move downstream by value. Whoever holds an [`Item`] (a buffer or a
//! station slot) owns it, and it is dropped once station 2 releases it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An item travelling through the line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Time the item reached the line
    pub arrival_time: f64,
    /// Time station 1 last finished the item
    pub station1_exit: Option<f64>,
    /// Time station 2 finished the item
    pub station2_exit: Option<f64>,
}

impl Item {
    /// Create an item arriving at `arrival_time`
    pub fn new(arrival_time: f64) -> Self {
        Self { arrival_time, station1_exit: None, station2_exit: None }
    }

    /// Time spent in the line up to station-2 exit
    pub fn sojourn_time(&self) -> Option<f64> {
        self.station2_exit.map(|exit| exit - self.arrival_time)
    }

    /// Time from arrival until station 1 released the item
    pub fn station1_passage_time(&self) -> Option<f64> {
        self.station1_exit.map(|exit| exit - self.arrival_time)
    }
}

/// Bounded FIFO of items waiting for a station
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    items: VecDeque<Item>,
    capacity: usize,
}

impl Buffer {
    /// Create an empty buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> Self {
        Self { items: VecDeque::with_capacity(capacity), capacity }
    }

    /// Maximum number of waiting items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of waiting items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item is waiting
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another item fits
    pub fn has_space(&self) -> bool {
        self.items.len() < self.capacity
    }

    /// Append an item, handing it back if the buffer is full
    pub fn try_push(&mut self, item: Item) -> Result<(), Item> {
        if !self.has_space() {
            return Err(item);
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Remove the oldest waiting item
    pub fn pop(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

}

/// Mutable state of the two-station line
#[derive(Debug, Clone, PartialEq)]
pub struct LineState {
    /// Items waiting for station 1
    pub buffer1: Buffer,
    /// Items waiting for station 2
    pub buffer2: Buffer,
    /// Item held by station 1
    pub station1: Option<Item>,
    /// Item held by station 2
    pub station2: Option<Item>,
    /// Station 1 holds a finished item it cannot hand downstream
    pub station1_blocked: bool,
}

impl LineState {
    /// Empty line with the given buffer capacities
    pub fn new(buffer1_capacity: usize, buffer2_capacity: usize) -> Self {
        Self {
            buffer1: Buffer::new(buffer1_capacity),
            buffer2: Buffer::new(buffer2_capacity),
            station1: None,
            station2: None,
            station1_blocked: false,
        }
    }

    /// Whether a new arrival may enter the line
    ///
    /// Every item enters through buffer 1, so a full buffer 1 or a blocked
    /// station 1 turns it away even when station 1 itself is idle.
    pub fn can_admit(&self) -> bool {
        !self.station1_blocked && self.buffer1.has_space()
    }

    /// Whether station 1 can pass a finished item into buffer 2
    pub fn can_hand_off(&self) -> bool {
        self.buffer2.has_space()
    }

    /// Items currently inside the line (buffers and station slots)
    pub fn items_in_system(&self) -> usize {
        self.buffer1.len()
            + self.buffer2.len()
            + usize::from(self.station1.is_some())
            + usize::from(self.station2.is_some())
    }
}
