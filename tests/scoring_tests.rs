//! Integration tests for the scoring core against the bundled artifacts.

use std::path::PathBuf;
use std::sync::Arc;
use wearwatch::*;

// ============================================================================
// Helper Functions
// ============================================================================

fn artifact(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("models")
        .join(name)
}

fn bundled_scorer() -> Scorer {
    let model = GradientBoostedModel::from_json_file(artifact("xgb_model.json")).unwrap();
    let schema = FeatureSchema::from_json_file(artifact("feature_names.json")).unwrap();
    Scorer::new(Arc::new(model), schema).unwrap()
}

fn stressed_input() -> ManualInput {
    ManualInput {
        rotational_speed: 2000.0,
        torque: 70.0,
        tool_wear: 250.0,
        ..Default::default()
    }
}

// ============================================================================
// Artifacts
// ============================================================================

#[test]
fn test_bundled_artifacts_agree() {
    let schema = FeatureSchema::from_json_file(artifact("feature_names.json")).unwrap();
    assert_eq!(schema, FeatureSchema::standard());

    let model = GradientBoostedModel::from_json_file(artifact("xgb_model.json")).unwrap();
    assert_eq!(model.feature_count(), Some(schema.len()));
}

#[test]
fn test_schema_model_mismatch_is_rejected() {
    let model = GradientBoostedModel::from_json_file(artifact("xgb_model.json")).unwrap();
    let schema = FeatureSchema::new(["Torque_(Nm)"]).unwrap();
    let err = Scorer::new(Arc::new(model), schema).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::SchemaMismatch {
            schema: 1,
            model: 9
        }
    ));
}

#[test]
fn test_missing_model_is_config_error() {
    let err = GradientBoostedModel::from_json_file(artifact("no_such_model.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

// ============================================================================
// Scoring
// ============================================================================

#[test]
fn test_nominal_machine_is_healthy() {
    let scorer = bundled_scorer();
    let result = assess(&scorer, &ManualInput::default()).unwrap();

    assert!(result.assessment.probability < 0.1);
    assert_eq!(result.assessment.label, 0);
    assert_eq!(result.assessment.band, ProbabilityBand::Success);
}

#[test]
fn test_stressed_machine_is_critical() {
    let scorer = bundled_scorer();
    let result = assess(&scorer, &stressed_input()).unwrap();

    assert!(result.assessment.probability > 0.9);
    assert_eq!(
        RiskThresholds::default().classify(result.assessment.probability),
        RiskStatus::Critical
    );
}

#[test]
fn test_scoring_is_deterministic() {
    let scorer = bundled_scorer();
    let features = stressed_input().feature_map();
    let first = scorer.score(&features).unwrap();
    for _ in 0..10 {
        assert_eq!(scorer.score(&features).unwrap(), first);
    }
}

#[test]
fn test_more_wear_never_lowers_risk_at_high_torque() {
    let scorer = bundled_scorer();
    let mut previous = 0.0;
    for wear in [0.0, 100.0, 210.0, 230.0, 300.0] {
        let input = ManualInput {
            torque: 65.0,
            tool_wear: wear,
            ..Default::default()
        };
        let p = scorer.score(&input.feature_map()).unwrap();
        assert!(p >= previous, "wear {} dropped risk to {}", wear, p);
        previous = p;
    }
}

#[test]
fn test_invalid_manual_input_is_not_scored() {
    let scorer = bundled_scorer();
    let input = ManualInput {
        process_temperature: 500.0,
        ..Default::default()
    };
    assert!(matches!(
        assess(&scorer, &input),
        Err(WearwatchError::Input(InputError::OutOfRange { .. }))
    ));
}
