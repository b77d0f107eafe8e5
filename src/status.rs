//! Risk bands and assessment of a single probability.

use serde::{Deserialize, Serialize};

/// Static probability cutoffs for status bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// At or above: high risk (default 0.6).
    pub risk: f64,
    /// At or above: critical (default 0.8).
    pub critical: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            risk: 0.6,
            critical: 0.8,
        }
    }
}

impl RiskThresholds {
    /// Status badge for a probability.
    pub fn classify(&self, probability: f64) -> RiskStatus {
        if probability >= self.critical {
            RiskStatus::Critical
        } else if probability >= self.risk {
            RiskStatus::HighRisk
        } else {
            RiskStatus::Ok
        }
    }
}

/// Status badge shown for the latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskStatus {
    Ok,
    HighRisk,
    Critical,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Ok => "OK",
            RiskStatus::HighRisk => "HIGH_RISK",
            RiskStatus::Critical => "CRITICAL",
        }
    }

    /// Human-readable status line.
    pub fn describe(&self, probability: f64, step: u64) -> String {
        match self {
            RiskStatus::Critical => {
                format!("CRITICAL RISK: {:.1}% (step {})", probability * 100.0, step)
            }
            RiskStatus::HighRisk => {
                format!("HIGH RISK: {:.1}% (step {})", probability * 100.0, step)
            }
            RiskStatus::Ok => format!(
                "OK: Failure probability {:.1}% (step {})",
                probability * 100.0,
                step
            ),
        }
    }
}

/// Display band for a one-off assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityBand {
    Success,
    Warning,
    Danger,
}

impl ProbabilityBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.7 {
            ProbabilityBand::Danger
        } else if probability >= 0.5 {
            ProbabilityBand::Warning
        } else {
            ProbabilityBand::Success
        }
    }
}

/// Outcome of scoring one manual snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    /// 1 = high risk, 0 = low risk (cutoff 0.5).
    pub label: u8,
    /// Probability of the predicted label.
    pub confidence: f64,
    pub band: ProbabilityBand,
}

impl RiskAssessment {
    pub const DECISION_THRESHOLD: f64 = 0.5;

    pub fn from_probability(probability: f64) -> Self {
        let label = u8::from(probability >= Self::DECISION_THRESHOLD);
        let confidence = if label == 1 {
            probability
        } else {
            1.0 - probability
        };
        Self {
            probability,
            label,
            confidence,
            band: ProbabilityBand::from_probability(probability),
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.label == 1
    }

    pub fn headline(&self) -> &'static str {
        if self.is_high_risk() {
            "High Risk"
        } else {
            "Healthy"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_status_bands() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(0.59), RiskStatus::Ok);
        assert_eq!(t.classify(0.6), RiskStatus::HighRisk);
        assert_eq!(t.classify(0.79), RiskStatus::HighRisk);
        assert_eq!(t.classify(0.8), RiskStatus::Critical);
        assert_eq!(t.classify(1.0), RiskStatus::Critical);
    }

    #[test]
    fn test_status_description() {
        let line = RiskStatus::Critical.describe(0.853, 12);
        assert_eq!(line, "CRITICAL RISK: 85.3% (step 12)");
    }

    #[test]
    fn test_assessment_low_risk() {
        let a = RiskAssessment::from_probability(0.2);
        assert_eq!(a.label, 0);
        assert_relative_eq!(a.confidence, 0.8);
        assert_eq!(a.band, ProbabilityBand::Success);
        assert_eq!(a.headline(), "Healthy");
    }

    #[test]
    fn test_assessment_bands() {
        assert_eq!(
            RiskAssessment::from_probability(0.55).band,
            ProbabilityBand::Warning
        );
        let a = RiskAssessment::from_probability(0.75);
        assert_eq!(a.label, 1);
        assert_eq!(a.confidence, 0.75);
        assert_eq!(a.band, ProbabilityBand::Danger);
    }
}
