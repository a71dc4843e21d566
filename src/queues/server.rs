use rand::Rng;
use tracing::trace;

use crate::events::{EventSink, SimEvent};
use crate::queues::arrival_stream::ArrivalStream;
use crate::queues::classifier::PriorityClassifier;
use crate::queues::client::Client;
use crate::queues::present_queue::PresentQueue;
use crate::queues::Queue;
use crate::stats::ReplicationStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not serving: either before the first arrival or after the present
    /// queue ran dry while arrivals are still to come.
    Idle,
    Serving,
    /// Nobody present and nobody left to arrive.
    Draining,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplicationOutcome {
    pub stats: ReplicationStats,
    pub admitted: usize,
    pub idle_periods: usize,
    pub end_time: f64,
}

/// Single server draining a present queue fed by a finite arrival stream.
///
/// The clock only moves forward: by one service time per served client, or
/// by a jump to the next arrival when the server runs out of work. Waiting
/// time is measured when service starts, so an idle jump never shows up as
/// waiting.
pub struct SingleServer {
    time: f64,
    state: ServerState,
    present: PresentQueue,
    future: ArrivalStream,
    classifier: PriorityClassifier,
    stats: ReplicationStats,
    admitted: usize,
    idle_periods: usize,
}

impl SingleServer {
    pub fn new(future: ArrivalStream) -> Self {
        Self::with_classifier(future, PriorityClassifier::default())
    }

    pub fn with_classifier(future: ArrivalStream, classifier: PriorityClassifier) -> Self {
        SingleServer {
            time: 0.,
            state: ServerState::Idle,
            present: PresentQueue::new(),
            future,
            classifier,
            stats: ReplicationStats::new(),
            admitted: 0,
            idle_periods: 0,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn read_load(&self) -> usize {
        self.present.read_load()
    }

    pub fn stats(&self) -> &ReplicationStats {
        &self.stats
    }

    pub fn run<R, S>(mut self, rng: &mut R, sink: &mut S) -> ReplicationOutcome
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        while self.step(rng, sink) != ServerState::Done {}
        ReplicationOutcome {
            stats: self.stats,
            admitted: self.admitted,
            idle_periods: self.idle_periods,
            end_time: self.time,
        }
    }

    /// Performs one transition and returns the state reached.
    pub fn step<R, S>(&mut self, rng: &mut R, sink: &mut S) -> ServerState
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        self.state = match self.state {
            ServerState::Idle => self.wait_for_arrival(rng, sink),
            ServerState::Serving => self.serve_next(rng, sink),
            ServerState::Draining | ServerState::Done => ServerState::Done,
        };
        self.state
    }

    // Jumps the clock to the next arrival and lets it in. The very first
    // jump is the start of the window, not an idle period.
    fn wait_for_arrival<R, S>(&mut self, rng: &mut R, sink: &mut S) -> ServerState
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        let next = match self.future.next_time() {
            Some(t) => t,
            None => return ServerState::Done,
        };
        if next > self.time {
            if self.admitted > 0 {
                trace!(from = self.time, to = next, "server idle until next arrival");
                sink.record(&SimEvent::idle(self.time, next));
                self.idle_periods += 1;
            }
            self.time = next;
        }
        self.admit_arrived(rng, sink);
        ServerState::Serving
    }

    fn serve_next<R, S>(&mut self, rng: &mut R, sink: &mut S) -> ServerState
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        if let Some(client) = self.present.pop_next_exit() {
            sink.record(&SimEvent::service(self.time, &client));
            self.stats.record_service(client.priority(), client.waiting_time(self.time));
            self.time += client.service_time();
            self.admit_arrived(rng, sink);
        }

        if !self.present.is_empty() {
            ServerState::Serving
        } else if !self.future.is_empty() {
            ServerState::Idle
        } else {
            ServerState::Draining
        }
    }

    // Each arrival sees the queue as left by the ones admitted before it.
    fn admit_arrived<R, S>(&mut self, rng: &mut R, sink: &mut S)
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        while let Some(arrival) = self.future.pop_arrived(self.time) {
            self.admit(arrival.time, arrival.service_time, rng, sink);
        }
    }

    fn admit<R, S>(&mut self, arrival_time: f64, service_time: f64, rng: &mut R, sink: &mut S)
    where
        R: Rng + ?Sized,
        S: EventSink + ?Sized,
    {
        let priority = self.classifier.classify(self.present.read_load(), rng);
        let client = Client::new(priority, arrival_time, service_time);
        sink.record(&SimEvent::admission(self.time, &client));
        self.present.arrival(client);
        self.admitted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, MemorySink, NullSink};
    use crate::queues::arrival_stream::Arrival;
    use crate::queues::client::Priority;
    use crate::rng::{replication_rng, ScriptedRng};
    use proptest::prelude::*;

    fn stream(pairs: &[(f64, f64)]) -> ArrivalStream {
        ArrivalStream::from_arrivals(pairs.iter().map(|&(time, service_time)| Arrival { time, service_time }))
    }

    #[test]
    fn empty_stream_finishes_immediately() {
        let mut rng = ScriptedRng::new(&[]);
        let out = SingleServer::new(ArrivalStream::default()).run(&mut rng, &mut NullSink);
        assert_eq!(out.admitted, 0);
        assert_eq!(out.stats.total_served(), 0);
        assert_eq!(out.end_time, 0.);
    }

    #[test]
    fn state_machine_walks_through_every_state() {
        let mut rng = ScriptedRng::new(&[]);
        let mut server = SingleServer::new(stream(&[(1., 2.)]));
        assert_eq!(server.state(), ServerState::Idle);
        assert_eq!(server.step(&mut rng, &mut NullSink), ServerState::Serving);
        assert_eq!(server.time(), 1.);
        assert_eq!(server.read_load(), 1);
        assert_eq!(server.step(&mut rng, &mut NullSink), ServerState::Draining);
        assert_eq!(server.time(), 3.);
        assert_eq!(server.step(&mut rng, &mut NullSink), ServerState::Done);
        assert_eq!(server.step(&mut rng, &mut NullSink), ServerState::Done);
        assert_eq!(server.stats().total_served(), 1);
    }

    #[test]
    fn running_dry_between_arrivals_goes_through_idle() {
        let mut rng = ScriptedRng::new(&[]);
        let mut sink = MemorySink::new();
        let mut server = SingleServer::new(stream(&[(1., 0.5), (50., 2.)]));
        assert_eq!(server.step(&mut rng, &mut sink), ServerState::Serving);
        assert_eq!(server.step(&mut rng, &mut sink), ServerState::Idle);
        assert_eq!(server.time(), 1.5);
        assert_eq!(server.read_load(), 0);
        assert_eq!(server.step(&mut rng, &mut sink), ServerState::Serving);
        assert_eq!(server.time(), 50.);
        assert_eq!(server.read_load(), 1);
        assert_eq!(server.step(&mut rng, &mut sink), ServerState::Draining);
        assert_eq!(server.step(&mut rng, &mut sink), ServerState::Done);
        // the opening jump to the first arrival is not an idle period
        let idle = sink.events().iter().filter(|(_, e)| e.kind == EventKind::Idle).count();
        assert_eq!(idle, 1);
    }

    #[test]
    fn idle_gap_is_skipped_without_waiting() {
        let mut rng = ScriptedRng::new(&[]);
        let mut sink = MemorySink::new();
        let out = SingleServer::new(stream(&[(1., 0.5), (50., 2.)])).run(&mut rng, &mut sink);

        assert_eq!(out.idle_periods, 1);
        assert_eq!(out.stats.total_waiting_time(), 0.);
        assert_eq!(out.end_time, 52.);

        let idle: Vec<&SimEvent> = sink.events().iter().map(|(_, e)| e).filter(|e| e.kind == EventKind::Idle).collect();
        assert_eq!(idle.len(), 1);
        assert_eq!(idle[0].current_time, 1.5);
        assert_eq!(idle[0].arrival_time, 50.);

        let second = sink.events().iter().map(|(_, e)| e)
            .find(|e| e.kind == EventKind::Service && e.arrival_time == 50.);
        assert_eq!(second.map(|e| (e.current_time, e.waiting_time)), Some((50., 0.)));
    }

    #[test]
    fn arrivals_during_service_wait_and_batch_is_classified_in_order() {
        // both later arrivals land while the first client is served; the
        // first of them finds an empty queue, the second flips the coin
        let mut rng = ScriptedRng::new(&[0.25]);
        let mut sink = MemorySink::new();
        let out = SingleServer::new(stream(&[(0., 10.), (1., 1.), (2., 1.)])).run(&mut rng, &mut sink);

        assert_eq!(rng.consumed(), 1);
        let served: Vec<(Priority, f64, f64)> = sink.events().iter().map(|(_, e)| e)
            .filter(|e| e.kind == EventKind::Service)
            .map(|e| (e.priority.unwrap_or(Priority::NonPrivileged), e.arrival_time, e.waiting_time))
            .collect();
        assert_eq!(served, vec![
            (Priority::NonPrivileged, 0., 0.),
            (Priority::Privileged, 2., 8.),
            (Priority::NonPrivileged, 1., 10.),
        ]);
        assert_eq!(out.stats.class(Priority::Privileged).served, 1);
        assert_eq!(out.end_time, 12.);
    }

    #[test]
    fn first_admission_is_never_privileged() {
        for seed in 0..50 {
            let mut rng = replication_rng(seed, 0);
            let arrivals = ArrivalStream::generate(&mut rng, 1., 1. / 1.1, 30.);
            let mut sink = MemorySink::new();
            SingleServer::new(arrivals).run(&mut rng, &mut sink);
            let first = sink.events().iter().map(|(_, e)| e).find(|e| e.kind == EventKind::Admission);
            if let Some(e) = first {
                assert_eq!(e.priority, Some(Priority::NonPrivileged));
            }
        }
    }

    proptest! {
        #[test]
        fn everyone_admitted_is_served_without_negative_waits(
            seed in any::<u64>(),
            mean_service in 0.2f64..3.,
            mean_iat in 0.2f64..3.,
        ) {
            let mut rng = replication_rng(seed, 0);
            let arrivals = ArrivalStream::generate(&mut rng, 1. / mean_iat, 1. / mean_service, 60.);
            let generated = arrivals.len();
            let mut sink = MemorySink::new();
            let out = SingleServer::new(arrivals).run(&mut rng, &mut sink);

            prop_assert_eq!(out.admitted, generated);
            prop_assert_eq!(out.stats.total_served() as usize, out.admitted);
            let mut last_time = 0f64;
            for (_, e) in sink.events() {
                prop_assert!(e.waiting_time >= 0.);
                prop_assert!(e.current_time >= last_time);
                last_time = e.current_time;
            }
        }
    }
}
