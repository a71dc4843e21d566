use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::NotNan;

use crate::queues::client::Client;
use crate::queues::Queue;

struct HeapEntry {
    arrival: NotNan<f64>,
    seq: u64,
    client: Client,
}

impl HeapEntry {
    // Less means served first. Ties on (class, arrival) fall back to insertion order.
    fn service_cmp(&self, other: &HeapEntry) -> Ordering {
        self.client.priority().service_order(other.client.priority())
            .then_with(|| self.arrival.cmp(&other.arrival))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &HeapEntry) -> bool {
        self.service_cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &HeapEntry) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap: reverse so the next client to serve sits on top.
impl Ord for HeapEntry {
    fn cmp(&self, other: &HeapEntry) -> Ordering {
        other.service_cmp(self)
    }
}

/// Clients that have arrived and wait for the server, privileged first,
/// then by arrival time.
#[derive(Default)]
pub struct PresentQueue {
    heap: BinaryHeap<HeapEntry>,
    inserted: u64,
}

impl PresentQueue {
    pub fn new() -> PresentQueue {
        PresentQueue {
            heap: BinaryHeap::new(),
            inserted: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Queue for PresentQueue {
    fn arrival(&mut self, client: Client) {
        // arrival times come from sums of finite draws
        let arrival = match NotNan::new(client.arrival_time()) {
            Ok(t) => t,
            Err(_) => panic!("Arrival time is NaN in present queue"),
        };
        let seq = self.inserted;
        self.inserted += 1;
        self.heap.push(HeapEntry { arrival, seq, client });
    }

    fn read_next_exit(&self) -> Option<&Client> {
        self.heap.peek().map(|e| &e.client)
    }

    fn pop_next_exit(&mut self) -> Option<Client> {
        self.heap.pop().map(|e| e.client)
    }

    fn read_load(&self) -> usize {
        self.heap.len()
    }
}
