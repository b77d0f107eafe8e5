// Wearwatch Sim - Synthetic machine sensor generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Load scenarios.
//!
//! A scenario is a named preset controlling how the latent load evolves
//! from one step to the next.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preset pattern for simulated machine load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Small zero-mean perturbation around the current load.
    #[default]
    NormalOperation,
    /// Steady upward drift plus smaller noise.
    IncreasingLoad,
    /// Load resampled every step from the top of the range.
    HighStress,
    /// Load resampled every step from the whole range.
    RandomFluctuation,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::NormalOperation,
        Scenario::IncreasingLoad,
        Scenario::HighStress,
        Scenario::RandomFluctuation,
    ];

    /// Stable identifier used in configs and APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::NormalOperation => "normal_operation",
            Scenario::IncreasingLoad => "increasing_load",
            Scenario::HighStress => "high_stress",
            Scenario::RandomFluctuation => "random_fluctuation",
        }
    }

    /// Label shown to operators.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::NormalOperation => "Normal operation",
            Scenario::IncreasingLoad => "Increasing load",
            Scenario::HighStress => "High stress",
            Scenario::RandomFluctuation => "Random fluctuation",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown scenario name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown scenario: {0}")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "normal_operation" | "normal" => Ok(Scenario::NormalOperation),
            "increasing_load" | "increasing" => Ok(Scenario::IncreasingLoad),
            "high_stress" | "stress" => Ok(Scenario::HighStress),
            "random_fluctuation" | "random" => Ok(Scenario::RandomFluctuation),
            _ => Err(UnknownScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_and_ids() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.as_str().parse::<Scenario>().unwrap(), scenario);
            assert_eq!(scenario.label().parse::<Scenario>().unwrap(), scenario);
        }
        assert_eq!(
            "High-Stress".parse::<Scenario>().unwrap(),
            Scenario::HighStress
        );
        assert!("meltdown".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Scenario::IncreasingLoad).unwrap();
        assert_eq!(json, "\"increasing_load\"");
        let back: Scenario = serde_json::from_str("\"random_fluctuation\"").unwrap();
        assert_eq!(back, Scenario::RandomFluctuation);
    }
}
