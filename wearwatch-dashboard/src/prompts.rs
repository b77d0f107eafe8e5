// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Prompt templates for the advisor.

use std::fmt::Write;
use wearwatch::FeatureMap;

/// Maintenance report for one scored snapshot.
pub fn maintenance_report(features: &FeatureMap, label: u8, probability: f64) -> String {
    let mut snapshot = String::new();
    for (name, value) in features {
        // Writing to a String cannot fail.
        let _ = writeln!(snapshot, "  {}: {}", name, value);
    }

    format!(
        "You are a senior predictive maintenance engineer.

Machine snapshot (feature -> value):
{snapshot}
Model prediction:
- Failure risk label (1 = high risk, 0 = low risk): {label}
- Failure probability: {probability:.2}

Write a short report:
- 1-2 sentences describing machine condition
- Mention which signals (e.g., torque, speed, temperature, tool wear) look suspicious
- 2-3 concrete maintenance recommendations
- Simple English, no markdown, under 120 words."
    )
}

/// Free-form question with the model's feature context.
pub fn chatbot(feature_names: &[String], question: &str) -> String {
    format!(
        "You are a predictive maintenance expert.

Context: We built a predictive maintenance model using features:
{features}

Gradient-boosted tree model with ~82% recall and ~99% accuracy.
Key features: torque, speed, tool wear, temperature delta, power.

User question: {question}

Answer in 2-4 short paragraphs, simple language, practical advice.",
        features = feature_names.join(", "),
        question = question.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_includes_snapshot_and_prediction() {
        let mut features = FeatureMap::new();
        features.insert("Torque_(Nm)".to_string(), 65.0);
        let prompt = maintenance_report(&features, 1, 0.874);

        assert!(prompt.contains("Torque_(Nm): 65"));
        assert!(prompt.contains("(1 = high risk, 0 = low risk): 1"));
        assert!(prompt.contains("Failure probability: 0.87"));
        assert!(prompt.contains("under 120 words"));
    }

    #[test]
    fn test_chatbot_trims_question() {
        let names = vec!["Torque_(Nm)".to_string(), "Power_est".to_string()];
        let prompt = chatbot(&names, "  Why is high torque dangerous?\n");
        assert!(prompt.contains("Torque_(Nm), Power_est"));
        assert!(prompt.contains("User question: Why is high torque dangerous?\n"));
    }
}
