//! Sensor readings and the features derived from them
//!
//! A [`SensorSample`] is what the signal generator or a manual form produces;
//! a [`Reading`] is a sample after it has been scored and placed in time.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Ordered name → value lookup fed to the feature schema.
pub type FeatureMap = BTreeMap<String, f64>;

/// Training-time feature names.
pub mod features {
    pub const AIR_TEMPERATURE: &str = "Air_temperature_(K)";
    pub const PROCESS_TEMPERATURE: &str = "Process_temperature_(K)";
    pub const ROTATIONAL_SPEED: &str = "Rotational_speed_(rpm)";
    pub const TORQUE: &str = "Torque_(Nm)";
    pub const TOOL_WEAR: &str = "Tool_wear_(min)";
    pub const TEMP_DELTA: &str = "Temp_delta";
    pub const POWER_EST: &str = "Power_est";
    pub const TYPE_L: &str = "Type_L";
    pub const TYPE_M: &str = "Type_M";

    /// All known names in training order.
    pub const ALL: [&str; 9] = [
        AIR_TEMPERATURE,
        PROCESS_TEMPERATURE,
        ROTATIONAL_SPEED,
        TORQUE,
        TOOL_WEAR,
        TEMP_DELTA,
        POWER_EST,
        TYPE_L,
        TYPE_M,
    ];
}

/// Product quality variant of the machine.
///
/// Encoded one-hot into `Type_L` / `Type_M`; `High` is the reference level
/// with both indicators at zero.
///
/// Deserializes from the dataset codes `"L"`/`"M"`/`"H"` or the lowercase
/// names, and serializes as the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProductType {
    Low,
    Medium,
    #[default]
    High,
}

impl ProductType {
    /// `(Type_L, Type_M)` indicator values.
    pub fn one_hot(&self) -> (f64, f64) {
        match self {
            ProductType::Low => (1.0, 0.0),
            ProductType::Medium => (0.0, 1.0),
            ProductType::High => (0.0, 0.0),
        }
    }
}

impl FromStr for ProductType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "low" => Ok(ProductType::Low),
            "m" | "medium" => Ok(ProductType::Medium),
            "h" | "high" => Ok(ProductType::High),
            _ => Err(InputError::UnknownProductType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ProductType {
    type Error = InputError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Raw sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorValues {
    /// Ambient air temperature (K).
    pub air_temperature: f64,
    /// Process temperature (K).
    pub process_temperature: f64,
    /// Spindle speed (rpm).
    pub rotational_speed: f64,
    /// Torque (Nm).
    pub torque: f64,
    /// Accumulated tool wear (min).
    pub tool_wear: f64,
}

/// Sensor channels plus derived features, not yet scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub sensors: SensorValues,
    /// `process_temperature - air_temperature`
    pub temp_delta: f64,
    /// `torque * rotational_speed`
    pub power_est: f64,
}

impl SensorSample {
    /// Derive `temp_delta` and `power_est` from the raw channels.
    pub fn from_sensors(sensors: SensorValues) -> Self {
        Self {
            temp_delta: sensors.process_temperature - sensors.air_temperature,
            power_est: sensors.torque * sensors.rotational_speed,
            sensors,
        }
    }

    /// Build the named feature map used for scoring.
    pub fn feature_map(&self, product_type: ProductType) -> FeatureMap {
        let (type_l, type_m) = product_type.one_hot();
        let s = &self.sensors;
        [
            (features::AIR_TEMPERATURE, s.air_temperature),
            (features::PROCESS_TEMPERATURE, s.process_temperature),
            (features::ROTATIONAL_SPEED, s.rotational_speed),
            (features::TORQUE, s.torque),
            (features::TOOL_WEAR, s.tool_wear),
            (features::TEMP_DELTA, self.temp_delta),
            (features::POWER_EST, self.power_est),
            (features::TYPE_L, type_l),
            (features::TYPE_M, type_m),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

/// One scored, time-indexed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// 1-based step index.
    pub time: u64,
    #[serde(flatten)]
    pub sample: SensorSample,
    /// Positive-class probability.
    pub failure_prob: f64,
}

impl Reading {
    pub fn new(time: u64, sample: SensorSample, failure_prob: f64) -> Self {
        Self {
            time,
            sample,
            failure_prob,
        }
    }

    pub fn sensors(&self) -> &SensorValues {
        &self.sample.sensors
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={} risk={:.1}% torque={:.1}Nm speed={:.0}rpm wear={:.1}min",
            self.time,
            self.failure_prob * 100.0,
            self.sample.sensors.torque,
            self.sample.sensors.rotational_speed,
            self.sample.sensors.tool_wear
        )
    }
}
