use serde::Serialize;

use crate::queues::client::Priority;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ClassStats {
    pub served: u64,
    pub waiting_time: f64,
}

impl ClassStats {
    /// Mean wait of the class, `None` when nobody of the class was served.
    pub fn average(&self) -> Option<f64> {
        if self.served == 0 {
            None
        } else {
            Some(self.waiting_time / self.served as f64)
        }
    }
}

/// Running totals of one replication, one slot per client class.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ReplicationStats {
    classes: [ClassStats; 2],
}

impl ReplicationStats {
    pub fn new() -> Self {
        ReplicationStats::default()
    }

    pub fn record_service(&mut self, priority: Priority, waiting_time: f64) {
        let class = &mut self.classes[priority.index()];
        class.served += 1;
        class.waiting_time += waiting_time;
    }

    pub fn class(&self, priority: Priority) -> &ClassStats {
        &self.classes[priority.index()]
    }

    pub fn total_served(&self) -> u64 {
        self.classes.iter().map(|c| c.served).sum()
    }

    pub fn total_waiting_time(&self) -> f64 {
        self.classes.iter().map(|c| c.waiting_time).sum()
    }

    /// A class with no served clients has no defined average; it is reported
    /// as 0 and the replication is flagged as degenerate.
    pub fn finalize(&self, privilege_fee: f64) -> ReplicationSummary {
        let privileged = self.class(Priority::Privileged);
        let non_privileged = self.class(Priority::NonPrivileged);
        let total = self.total_served();
        ReplicationSummary {
            avg_waiting_time: if total == 0 { 0. } else { self.total_waiting_time() / total as f64 },
            priv_avg_waiting_time: privileged.average().unwrap_or(0.),
            non_priv_avg_waiting_time: non_privileged.average().unwrap_or(0.),
            profit_gain: privileged.served as f64 * privilege_fee,
            privileged_served: privileged.served,
            non_privileged_served: non_privileged.served,
            degenerate: privileged.served == 0 || non_privileged.served == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplicationSummary {
    pub avg_waiting_time: f64,
    pub priv_avg_waiting_time: f64,
    pub non_priv_avg_waiting_time: f64,
    pub profit_gain: f64,
    pub privileged_served: u64,
    pub non_privileged_served: u64,
    pub degenerate: bool,
}

/// Sample standard deviation of each metric across replications.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSpread {
    pub avg_waiting_time: f64,
    pub priv_avg_waiting_time: f64,
    pub non_priv_avg_waiting_time: f64,
    pub profit_gain: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub avg_waiting_time: f64,
    pub priv_avg_waiting_time: f64,
    pub non_priv_avg_waiting_time: f64,
    pub profit_gain: f64,
    pub replications: usize,
    pub degenerate_replications: usize,
    pub spread: MetricSpread,
}

/// Monte Carlo estimator: each replication adds `metric / count` to the
/// running means, so after `count` replications they hold the sample mean.
pub struct Aggregator {
    count: usize,
    stats: AggregateStatistics,
    samples: [Vec<f64>; 4],
}

impl Aggregator {
    pub fn new(count: usize) -> Self {
        Aggregator {
            count,
            stats: AggregateStatistics::default(),
            samples: [
                Vec::with_capacity(count),
                Vec::with_capacity(count),
                Vec::with_capacity(count),
                Vec::with_capacity(count),
            ],
        }
    }

    pub fn add(&mut self, summary: &ReplicationSummary) {
        let n = self.count as f64;
        let metrics = [
            summary.avg_waiting_time,
            summary.priv_avg_waiting_time,
            summary.non_priv_avg_waiting_time,
            summary.profit_gain,
        ];
        self.stats.avg_waiting_time += metrics[0] / n;
        self.stats.priv_avg_waiting_time += metrics[1] / n;
        self.stats.non_priv_avg_waiting_time += metrics[2] / n;
        self.stats.profit_gain += metrics[3] / n;
        for (samples, &m) in self.samples.iter_mut().zip(metrics.iter()) {
            samples.push(m);
        }
        self.stats.replications += 1;
        if summary.degenerate {
            self.stats.degenerate_replications += 1;
        }
    }

    pub fn finish(self) -> AggregateStatistics {
        let mut stats = self.stats;
        let sd = |v: &[f64]| if v.len() < 2 { 0. } else { statistical::standard_deviation(v, None) };
        stats.spread = MetricSpread {
            avg_waiting_time: sd(&self.samples[0][..]),
            priv_avg_waiting_time: sd(&self.samples[1][..]),
            non_priv_avg_waiting_time: sd(&self.samples[2][..]),
            profit_gain: sd(&self.samples[3][..]),
        };
        stats
    }
}
