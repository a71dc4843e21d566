use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value was rejected before any simulation work started.
    #[error("invalid configuration: {parameter} = {value} ({constraint})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// The event sink attached to a replication failed to persist its records.
    #[error("event log for replication {replication} could not be written: {source}")]
    EventLog {
        replication: usize,
        #[source]
        source: io::Error,
    },
}

impl SimError {
    pub fn invalid(parameter: &'static str, value: impl ToString, constraint: &'static str) -> Self {
        SimError::InvalidConfiguration {
            parameter,
            value: value.to_string(),
            constraint,
        }
    }

    /// Name of the offending parameter, if this is a configuration error.
    pub fn parameter(&self) -> Option<&'static str> {
        match *self {
            SimError::InvalidConfiguration { parameter, .. } => Some(parameter),
            SimError::EventLog { .. } => None,
        }
    }
}
