//! Monte Carlo simulation of a single telescope shared by two client classes.
//!
//! Clients arrive as a Poisson stream over a fixed operating window and wait
//! in one line. A client that finds other clients already waiting is made
//! privileged with probability 1/2 and jumps ahead of every non-privileged
//! client; a client that finds the line empty never is. Each replication
//! plays one window to completion, and [`Simulation::run`] averages the
//! waiting times and the privilege revenue over all replications.
//!
//! ```no_run
//! let sim = telescope_sim::configure(1000, 1.1, 1.0).unwrap();
//! let stats = sim.run();
//! println!("mean wait {}", stats.avg_waiting_time);
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod events;
pub mod queues;
pub mod rng;
pub mod simulation;
pub mod stats;

pub use config::SimulationConfig;
pub use error::SimError;
pub use events::{EventKind, EventSink, MemorySink, NullSink, SimEvent};
pub use queues::client::{Client, Priority};
pub use queues::file_logger::FileLogger;
pub use simulation::{configure, run, Simulation};
pub use stats::{AggregateStatistics, MetricSpread};
