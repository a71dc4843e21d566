use serde::Serialize;

use crate::error::SimError;

/// Six-hour operating window, in minutes.
pub const DEFAULT_HORIZON: f64 = 6. * 60.;
pub const DEFAULT_PRIVILEGE_FEE: f64 = 30.;
/// Replications `0..DEFAULT_DETAILED_REPLICATIONS` are handed to the event sink.
pub const DEFAULT_DETAILED_REPLICATIONS: usize = 11;
/// Upper bound on `horizon / mean_interarrival_time`, the mean number of
/// arrivals one replication has to hold in memory.
pub const MAX_EXPECTED_ARRIVALS: f64 = 1e8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub replications: usize,
    pub mean_service_time: f64,
    pub mean_interarrival_time: f64,
    pub horizon: f64,
    pub privilege_fee: f64,
    pub detailed_replications: usize,
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(replications: usize, mean_service_time: f64, mean_interarrival_time: f64) -> Self {
        SimulationConfig {
            replications,
            mean_service_time,
            mean_interarrival_time,
            horizon: DEFAULT_HORIZON,
            privilege_fee: DEFAULT_PRIVILEGE_FEE,
            detailed_replications: DEFAULT_DETAILED_REPLICATIONS,
            seed: None,
        }
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_privilege_fee(mut self, fee: f64) -> Self {
        self.privilege_fee = fee;
        self
    }

    pub fn with_detailed_replications(mut self, detailed: usize) -> Self {
        self.detailed_replications = detailed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn arrival_rate(&self) -> f64 {
        1. / self.mean_interarrival_time
    }

    pub fn service_rate(&self) -> f64 {
        1. / self.mean_service_time
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.replications == 0 {
            return Err(SimError::invalid("replications", self.replications, "must be greater than 0"));
        }
        positive_finite("mean_service_time", self.mean_service_time)?;
        positive_finite("mean_interarrival_time", self.mean_interarrival_time)?;
        positive_finite("horizon", self.horizon)?;
        finite_rate("mean_service_time", self.mean_service_time, self.service_rate())?;
        finite_rate("mean_interarrival_time", self.mean_interarrival_time, self.arrival_rate())?;
        if self.horizon * self.arrival_rate() > MAX_EXPECTED_ARRIVALS {
            return Err(SimError::invalid(
                "mean_interarrival_time",
                self.mean_interarrival_time,
                "too small for the horizon: more than 1e8 arrivals expected per replication",
            ));
        }
        if !(self.privilege_fee.is_finite() && self.privilege_fee >= 0.) {
            return Err(SimError::invalid("privilege_fee", self.privilege_fee, "must be finite and non-negative"));
        }
        Ok(())
    }
}

fn positive_finite(parameter: &'static str, value: f64) -> Result<(), SimError> {
    // also rejects NaN
    if value.is_finite() && value > 0. {
        Ok(())
    } else {
        Err(SimError::invalid(parameter, value, "must be finite and greater than 0"))
    }
}

// A subnormal mean turns into an infinite rate.
fn finite_rate(parameter: &'static str, mean: f64, rate: f64) -> Result<(), SimError> {
    if rate.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(parameter, mean, "too small: its rate 1/mean is not finite"))
    }
}
