use rand::Rng;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::events::{EventSink, NullSink};
use crate::queues::arrival_stream::ArrivalStream;
use crate::queues::server::{ReplicationOutcome, SingleServer};
use crate::rng::replication_rng;
use crate::stats::{AggregateStatistics, Aggregator, ReplicationSummary};

/// Validates the parameters and returns a handle ready to run.
pub fn configure(replications: usize, mean_service_time: f64, mean_interarrival_time: f64) -> Result<Simulation, SimError> {
    Simulation::new(SimulationConfig::new(replications, mean_service_time, mean_interarrival_time))
}

pub fn run(handle: &Simulation) -> AggregateStatistics {
    handle.run()
}

/// A validated simulation: the configuration plus the seed every
/// replication stream derives from.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    seed: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Simulation { config, seed })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn run(&self) -> AggregateStatistics {
        self.log_start();
        let mut aggregator = Aggregator::new(self.config.replications);
        for index in 0..self.config.replications {
            let outcome = self.run_replication(index, &mut NullSink);
            aggregator.add(&self.summarize(index, &outcome));
        }
        self.log_end(aggregator.finish())
    }

    /// Like [`run`](Self::run), with the first `detailed_replications`
    /// replications reporting their events to `sink`. The sink only observes;
    /// results are identical to `run` for the same seed.
    pub fn run_with_sink<S>(&self, sink: &mut S) -> Result<AggregateStatistics, SimError>
    where
        S: EventSink + ?Sized,
    {
        self.log_start();
        let mut aggregator = Aggregator::new(self.config.replications);
        for index in 0..self.config.replications {
            let outcome = if index < self.config.detailed_replications {
                sink.begin_replication(index)?;
                let outcome = self.run_replication(index, sink);
                sink.end_replication(index)?;
                outcome
            } else {
                self.run_replication(index, &mut NullSink)
            };
            aggregator.add(&self.summarize(index, &outcome));
        }
        Ok(self.log_end(aggregator.finish()))
    }

    /// Runs replication `index` on its own random stream.
    pub fn run_replication<S>(&self, index: usize, sink: &mut S) -> ReplicationOutcome
    where
        S: EventSink + ?Sized,
    {
        let mut rng = replication_rng(self.seed, index);
        self.replicate(&mut rng, sink)
    }

    /// One replication drawing every variate from `rng`: the arrival stream
    /// first, then the class coin flips as the server admits clients.
    pub fn replicate<R, S>(&self, rng: &mut R, sink: &mut S) -> ReplicationOutcome
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        let arrivals = ArrivalStream::generate(
            rng,
            self.config.arrival_rate(),
            self.config.service_rate(),
            self.config.horizon,
        );
        SingleServer::new(arrivals).run(rng, sink)
    }

    pub fn summarize(&self, index: usize, outcome: &ReplicationOutcome) -> ReplicationSummary {
        let summary = outcome.stats.finalize(self.config.privilege_fee);
        if summary.degenerate {
            debug!(
                replication = index,
                privileged = summary.privileged_served,
                non_privileged = summary.non_privileged_served,
                "class without served clients, its average counts as 0"
            );
        }
        summary
    }

    fn log_start(&self) {
        info!(
            seed = self.seed,
            replications = self.config.replications,
            mean_service_time = self.config.mean_service_time,
            mean_interarrival_time = self.config.mean_interarrival_time,
            horizon = self.config.horizon,
            "Starting simulation"
        );
    }

    fn log_end(&self, stats: AggregateStatistics) -> AggregateStatistics {
        info!(
            avg_waiting_time = stats.avg_waiting_time,
            priv_avg_waiting_time = stats.priv_avg_waiting_time,
            non_priv_avg_waiting_time = stats.non_priv_avg_waiting_time,
            profit_gain = stats.profit_gain,
            degenerate_replications = stats.degenerate_replications,
            "Simulation finished"
        );
        stats
    }
}
