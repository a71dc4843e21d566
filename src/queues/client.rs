use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    Privileged,
    NonPrivileged,
}

impl Priority {
    pub const ALL: [Priority; 2] = [Priority::Privileged, Priority::NonPrivileged];

    pub fn index(self) -> usize {
        match self {
            Priority::Privileged => 0,
            Priority::NonPrivileged => 1,
        }
    }

    /// Service order between two classes: `Less` means `self` goes first.
    pub fn service_order(self, other: Priority) -> Ordering {
        match (self, other) {
            (Priority::Privileged, Priority::NonPrivileged) => Ordering::Less,
            (Priority::NonPrivileged, Priority::Privileged) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Priority::Privileged => write!(f, "priv"),
            Priority::NonPrivileged => write!(f, "noPriv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Client {
    priority: Priority,
    arrival_time: f64,
    service_time: f64,
}

impl Client {
    pub fn new(priority: Priority, arrival_time: f64, service_time: f64) -> Self {
        Client { priority, arrival_time, service_time }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Time spent in line if service starts at `now`.
    pub fn waiting_time(&self, now: f64) -> f64 {
        now - self.arrival_time
    }
}
