//! Structured records of what the server does, and the sinks that receive them.
//!
//! The event loop calls [`EventSink::record`] on every admission, service
//! start and idle fast-forward. With [`NullSink`] the calls compile away, so
//! a run with no sink attached pays nothing for the hooks.

use std::fmt;

use serde::Serialize;

use crate::error::SimError;
use crate::queues::client::{Client, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Admission,
    Service,
    Idle,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EventKind::Admission => write!(f, "admit"),
            EventKind::Service => write!(f, "serve"),
            EventKind::Idle => write!(f, "idle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimEvent {
    pub kind: EventKind,
    pub current_time: f64,
    /// Absent for idle periods.
    pub priority: Option<Priority>,
    /// For an idle period, the time the server jumps to.
    pub arrival_time: f64,
    pub service_time: f64,
    pub waiting_time: f64,
}

impl SimEvent {
    pub fn admission(now: f64, client: &Client) -> Self {
        SimEvent {
            kind: EventKind::Admission,
            current_time: now,
            priority: Some(client.priority()),
            arrival_time: client.arrival_time(),
            service_time: client.service_time(),
            waiting_time: 0.,
        }
    }

    pub fn service(now: f64, client: &Client) -> Self {
        SimEvent {
            kind: EventKind::Service,
            current_time: now,
            priority: Some(client.priority()),
            arrival_time: client.arrival_time(),
            service_time: client.service_time(),
            waiting_time: client.waiting_time(now),
        }
    }

    pub fn idle(now: f64, next_arrival: f64) -> Self {
        SimEvent {
            kind: EventKind::Idle,
            current_time: now,
            priority: None,
            arrival_time: next_arrival,
            service_time: 0.,
            waiting_time: 0.,
        }
    }
}

pub trait EventSink {
    fn begin_replication(&mut self, _replication: usize) -> Result<(), SimError> {
        Ok(())
    }

    fn record(&mut self, event: &SimEvent);

    fn end_replication(&mut self, _replication: usize) -> Result<(), SimError> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    #[inline(always)]
    fn record(&mut self, _event: &SimEvent) {}
}

/// Keeps every event in memory, tagged with its replication index.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    current: usize,
    events: Vec<(usize, SimEvent)>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn events(&self) -> &[(usize, SimEvent)] {
        &self.events
    }

    pub fn replications_seen(&self) -> Vec<usize> {
        let mut seen: Vec<usize> = self.events.iter().map(|(r, _)| *r).collect();
        seen.dedup();
        seen
    }
}

impl EventSink for MemorySink {
    fn begin_replication(&mut self, replication: usize) -> Result<(), SimError> {
        self.current = replication;
        Ok(())
    }

    fn record(&mut self, event: &SimEvent) {
        self.events.push((self.current, *event));
    }
}
