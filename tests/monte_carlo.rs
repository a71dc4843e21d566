use telescope_sim::{Simulation, SimulationConfig};

fn run(seed: u64) -> telescope_sim::AggregateStatistics {
    Simulation::new(SimulationConfig::new(1000, 1.1, 1.0).with_seed(seed))
        .unwrap()
        .run()
}

fn relative_gap(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs())
}

#[test]
fn estimates_are_stable_across_seeds() {
    let a = run(2024);
    let b = run(7);

    assert!(a.avg_waiting_time > 0.);
    assert!(relative_gap(a.avg_waiting_time, b.avg_waiting_time) < 0.10,
            "{} vs {}", a.avg_waiting_time, b.avg_waiting_time);
    assert!(relative_gap(a.profit_gain, b.profit_gain) < 0.05,
            "{} vs {}", a.profit_gain, b.profit_gain);
}

#[test]
fn privileged_clients_wait_less() {
    let stats = run(31);
    assert!(stats.priv_avg_waiting_time < stats.non_priv_avg_waiting_time);
    // at most half of ~360 arrivals per window can be privileged
    assert!(stats.profit_gain > 0. && stats.profit_gain < 30. * 200.);
}

#[test]
fn same_seed_same_answer() {
    assert_eq!(run(5), run(5));
}
