use std::collections::VecDeque;

use rand::Rng;

use crate::distribution::{Exponential, MutDistribution};

/// An arrival that has been drawn but not yet classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    pub time: f64,
    pub service_time: f64,
}

/// Future arrivals of one replication, consumed in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ArrivalStream {
    arrivals: VecDeque<Arrival>,
}

impl ArrivalStream {
    pub fn from_arrivals<I>(arrivals: I) -> Self where I: IntoIterator<Item = Arrival> {
        ArrivalStream { arrivals: arrivals.into_iter().collect() }
    }

    /// Poisson arrivals with exponential service times up to `horizon`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, arrival_rate: f64, service_rate: f64, horizon: f64) -> Self {
        Self::generate_with(
            rng,
            &mut Exponential::new(arrival_rate),
            &mut Exponential::new(service_rate),
            horizon,
        )
    }

    /// Accumulates interarrival gaps from `iat_distribution` until the clock
    /// passes `horizon`. The arrival that crosses the horizon is dropped and
    /// no service time is drawn for it.
    pub fn generate_with<R, I, S>(rng: &mut R, iat_distribution: &mut I, service_distribution: &mut S, horizon: f64) -> Self
    where
        R: Rng + ?Sized,
        I: MutDistribution<f64>,
        S: MutDistribution<f64>,
    {
        let mut arrivals = VecDeque::new();
        let mut time = 0.;
        loop {
            time += iat_distribution.mut_sample(rng);
            if time > horizon {
                break;
            }
            let service_time = service_distribution.mut_sample(rng);
            arrivals.push_back(Arrival { time, service_time });
        }
        ArrivalStream { arrivals }
    }

    pub fn read_next(&self) -> Option<&Arrival> {
        self.arrivals.front()
    }

    pub fn next_time(&self) -> Option<f64> {
        self.arrivals.front().map(|a| a.time)
    }

    pub fn pop_next(&mut self) -> Option<Arrival> {
        self.arrivals.pop_front()
    }

    /// Removes the next arrival only if it has happened by `time`.
    pub fn pop_arrived(&mut self, time: f64) -> Option<Arrival> {
        match self.arrivals.front() {
            Some(a) if a.time <= time => self.arrivals.pop_front(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arrival> {
        self.arrivals.iter()
    }
}

/// Arrival sequence for one replication, as `(arrival time, service time)` pairs.
pub fn generate_arrivals<R: Rng + ?Sized>(rng: &mut R, arrival_rate: f64, service_rate: f64, horizon: f64) -> Vec<(f64, f64)> {
    ArrivalStream::generate(rng, arrival_rate, service_rate, horizon)
        .iter()
        .map(|a| (a.time, a.service_time))
        .collect()
}
