//! Manual "what-if" scoring of a hand-entered machine snapshot.

use crate::error::{InputError, WearwatchError};
use crate::reading::{FeatureMap, ProductType, SensorSample, SensorValues};
use crate::scorer::Scorer;
use crate::status::RiskAssessment;
use serde::{Deserialize, Serialize};

/// Hand-entered sensor values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualInput {
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub tool_wear: f64,
    pub product_type: ProductType,
}

impl Default for ManualInput {
    fn default() -> Self {
        Self {
            air_temperature: 300.0,
            process_temperature: 310.0,
            rotational_speed: 1500.0,
            torque: 40.0,
            tool_wear: 100.0,
            product_type: ProductType::High,
        }
    }
}

impl ManualInput {
    /// Accepted `(field, min, max)` ranges.
    pub const LIMITS: [(&'static str, f64, f64); 5] = [
        ("air_temperature", 250.0, 350.0),
        ("process_temperature", 250.0, 400.0),
        ("rotational_speed", 500.0, 3000.0),
        ("torque", 0.0, 100.0),
        ("tool_wear", 0.0, 300.0),
    ];

    pub fn validate(&self) -> Result<(), InputError> {
        let values = [
            self.air_temperature,
            self.process_temperature,
            self.rotational_speed,
            self.torque,
            self.tool_wear,
        ];
        for ((field, min, max), value) in Self::LIMITS.iter().zip(values) {
            // NaN fails the range check too.
            if !(*min..=*max).contains(&value) {
                return Err(InputError::OutOfRange {
                    field: *field,
                    value,
                    min: *min,
                    max: *max,
                });
            }
        }
        Ok(())
    }

    pub fn sample(&self) -> SensorSample {
        SensorSample::from_sensors(SensorValues {
            air_temperature: self.air_temperature,
            process_temperature: self.process_temperature,
            rotational_speed: self.rotational_speed,
            torque: self.torque,
            tool_wear: self.tool_wear,
        })
    }

    pub fn feature_map(&self) -> FeatureMap {
        self.sample().feature_map(self.product_type)
    }
}

/// Result of a manual assessment, with the derived metrics shown alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAssessment {
    pub assessment: RiskAssessment,
    pub temp_delta: f64,
    pub power_est: f64,
    /// Feature snapshot that was scored.
    pub features: FeatureMap,
}

/// Validate, score and assess a manual input.
pub fn assess(scorer: &Scorer, input: &ManualInput) -> Result<ManualAssessment, WearwatchError> {
    input.validate()?;
    let sample = input.sample();
    let features = sample.feature_map(input.product_type);
    let probability = scorer.score(&features)?;
    Ok(ManualAssessment {
        assessment: RiskAssessment::from_probability(probability),
        temp_delta: sample.temp_delta,
        power_est: sample.power_est,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConstantClassifier;
    use crate::schema::FeatureSchema;
    use std::sync::Arc;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ManualInput::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let input = ManualInput {
            torque: 120.0,
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "torque", .. }));
    }

    #[test]
    fn test_nan_rejected() {
        let input = ManualInput {
            air_temperature: f64::NAN,
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_assess_default_input() {
        let scorer = Scorer::new(
            Arc::new(ConstantClassifier::new(0.72)),
            FeatureSchema::standard(),
        )
        .unwrap();
        let result = assess(&scorer, &ManualInput::default()).unwrap();

        assert_eq!(result.temp_delta, 10.0);
        assert_eq!(result.power_est, 60_000.0);
        assert_eq!(result.assessment.label, 1);
        assert_eq!(result.features.len(), 9);
    }
}
