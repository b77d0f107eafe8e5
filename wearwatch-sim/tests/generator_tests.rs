//! Integration tests for the sensor stream.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wearwatch_sim::*;

fn generator() -> SignalGenerator {
    SignalGenerator::new(GeneratorConfig::default()).unwrap()
}

fn run(scenario: Scenario, seed: u64, steps: usize) -> Vec<(SimulationState, wearwatch::SensorSample)> {
    let gen = generator();
    let mut state = SimulationState::default();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..steps)
        .map(|_| {
            let sample = gen.next_sample(&mut state, scenario, &mut rng);
            (state, sample)
        })
        .collect()
}

// ============================================================================
// State bounds
// ============================================================================

#[test]
fn test_state_stays_in_bounds_for_every_scenario() {
    for scenario in Scenario::ALL {
        for seed in 0..8 {
            for (state, _) in run(scenario, seed, 700) {
                assert!((0.0..=1.0).contains(&state.load()), "{} load", scenario);
                assert!((0.0..=300.0).contains(&state.wear()), "{} wear", scenario);
            }
        }
    }
}

#[test]
fn test_wear_never_decreases_and_saturates() {
    let trace = run(Scenario::RandomFluctuation, 3, 700);
    let mut previous = SimulationState::DEFAULT_WEAR;
    for (state, _) in &trace {
        assert!(state.wear() >= previous);
        previous = state.wear();
    }
    // 700 steps of at least 0.2 each push past the ceiling.
    assert_eq!(previous, 300.0);
}

#[test]
fn test_high_stress_load_band() {
    for (state, _) in run(Scenario::HighStress, 11, 300) {
        assert!(state.load() >= 0.7 && state.load() <= 1.0);
    }
}

#[test]
fn test_increasing_load_drifts_up() {
    let trace = run(Scenario::IncreasingLoad, 5, 60);
    let first = trace[0].0.load();
    let last = trace[59].0.load();
    // Expected drift of ~0.6 over 60 steps dominates the noise.
    assert!(last > first + 0.3, "first {} last {}", first, last);
}

#[test]
fn test_normal_operation_stays_near_start() {
    let trace = run(Scenario::NormalOperation, 9, 10);
    for (state, _) in trace {
        assert!((state.load() - SimulationState::DEFAULT_LOAD).abs() < 0.4);
    }
}

// ============================================================================
// Sensor equations
// ============================================================================

#[test]
fn test_sensors_follow_load_equations_without_noise() {
    let mut config = GeneratorConfig::default();
    config.sensors.air_temperature = ChannelModel::new(295.0, 0.0, 0.0);
    config.sensors.process_offset = ChannelModel::new(5.0, 20.0, 0.0);
    config.sensors.rotational_speed = ChannelModel::new(1200.0, 1000.0, 0.0);
    config.sensors.torque = ChannelModel::new(30.0, 45.0, 0.0);
    let gen = SignalGenerator::new(config).unwrap();

    let state = SimulationState::new(0.5, 120.0);
    let mut rng = StdRng::seed_from_u64(0);
    let sample = gen.sample(&state, &mut rng);

    assert_relative_eq!(sample.sensors.air_temperature, 295.0);
    assert_relative_eq!(sample.sensors.process_temperature, 310.0);
    assert_relative_eq!(sample.sensors.rotational_speed, 1700.0);
    assert_relative_eq!(sample.sensors.torque, 52.5);
    assert_relative_eq!(sample.sensors.tool_wear, 120.0);
    assert_relative_eq!(sample.temp_delta, 15.0);
    assert_relative_eq!(sample.power_est, 52.5 * 1700.0);
}

#[test]
fn test_derived_features_match_channels() {
    for (_, sample) in run(Scenario::RandomFluctuation, 21, 100) {
        let s = &sample.sensors;
        assert_relative_eq!(sample.temp_delta, s.process_temperature - s.air_temperature);
        assert_relative_eq!(sample.power_est, s.torque * s.rotational_speed);
    }
}

#[test]
fn test_higher_load_raises_speed_and_torque_on_average() {
    let gen = generator();
    let mut rng = StdRng::seed_from_u64(7);
    let low = SimulationState::new(0.1, 50.0);
    let high = SimulationState::new(0.9, 50.0);

    let mean = |state: &SimulationState, rng: &mut StdRng| {
        let mut torque = 0.0;
        for _ in 0..200 {
            torque += gen.sample(state, rng).sensors.torque;
        }
        torque / 200.0
    };
    assert!(mean(&high, &mut rng) > mean(&low, &mut rng) + 20.0);
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_same_seed_same_stream() {
    let a = run(Scenario::IncreasingLoad, 42, 50);
    let b = run(Scenario::IncreasingLoad, 42, 50);
    assert_eq!(a, b);
}

#[test]
fn test_different_seed_different_stream() {
    let a = run(Scenario::NormalOperation, 1, 10);
    let b = run(Scenario::NormalOperation, 2, 10);
    assert_ne!(a, b);
}
