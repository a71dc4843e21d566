use rand::Rng;

use crate::queues::client::Priority;

/// Assigns a class to a client at the moment it joins the present queue.
///
/// A client that finds the queue empty is never privileged. Otherwise the
/// class is a fair coin flip, drawn only in that case so an empty queue
/// consumes no randomness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityClassifier {
    privileged_probability: f64,
}

impl Default for PriorityClassifier {
    fn default() -> Self {
        PriorityClassifier { privileged_probability: 0.5 }
    }
}

impl PriorityClassifier {
    pub fn classify<R: Rng + ?Sized>(&self, present_queue_size: usize, rng: &mut R) -> Priority {
        if present_queue_size == 0 {
            return Priority::NonPrivileged;
        }
        let u: f64 = rng.gen();
        if u < self.privileged_probability {
            Priority::Privileged
        } else {
            Priority::NonPrivileged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{replication_rng, ScriptedRng};

    #[test]
    fn empty_queue_is_never_privileged() {
        let mut rng = ScriptedRng::new(&[0.]);
        let classifier = PriorityClassifier::default();
        for _ in 0..10 {
            assert_eq!(classifier.classify(0, &mut rng), Priority::NonPrivileged);
        }
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn occupied_queue_flips_a_coin() {
        let mut rng = ScriptedRng::new(&[0.25, 0.5, 0.75]);
        let classifier = PriorityClassifier::default();
        assert_eq!(classifier.classify(1, &mut rng), Priority::Privileged);
        assert_eq!(classifier.classify(3, &mut rng), Priority::NonPrivileged);
        assert_eq!(classifier.classify(7, &mut rng), Priority::NonPrivileged);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn coin_is_fair() {
        let mut rng = replication_rng(3, 0);
        let classifier = PriorityClassifier::default();
        let n = 100_000;
        let privileged = (0..n)
            .filter(|_| classifier.classify(1, &mut rng) == Priority::Privileged)
            .count();
        let share = privileged as f64 / n as f64;
        assert!((share - 0.5).abs() < 0.01, "privileged share {}", share);
    }
}
