//! Scorer: feature map → schema-ordered vector → classifier probability.

use crate::error::{ConfigError, ScoreError};
use crate::model::Classifier;
use crate::reading::FeatureMap;
use crate::schema::FeatureSchema;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Couples an injected classifier with the feature layout it was trained on.
///
/// Cloning is cheap; clones share the classifier.
#[derive(Clone)]
pub struct Scorer {
    classifier: Arc<dyn Classifier>,
    schema: FeatureSchema,
    /// Schema names already reported as absent from an input map.
    warned_missing: Arc<Mutex<HashSet<String>>>,
}

impl Scorer {
    /// Fails when the classifier declares a vector length different from the schema.
    pub fn new(classifier: Arc<dyn Classifier>, schema: FeatureSchema) -> Result<Self, ConfigError> {
        if let Some(expected) = classifier.feature_count() {
            if expected != schema.len() {
                return Err(ConfigError::SchemaMismatch {
                    schema: schema.len(),
                    model: expected,
                });
            }
        }
        Ok(Self {
            classifier,
            schema,
            warned_missing: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Build the ordered vector for `features` without scoring it.
    pub fn vector(&self, features: &FeatureMap) -> Result<Vec<f64>, ScoreError> {
        let vectorized = self.schema.vectorize(features);

        if !vectorized.missing.is_empty() {
            self.report_missing(&vectorized.missing);
        }

        for (name, value) in self.schema.names().iter().zip(&vectorized.values) {
            if !value.is_finite() {
                return Err(ScoreError::NonFiniteFeature {
                    name: name.clone(),
                    value: *value,
                });
            }
        }

        Ok(vectorized.values)
    }

    /// Probability of the positive class for `features`.
    ///
    /// Does not mutate its input; deterministic for a deterministic classifier.
    pub fn score(&self, features: &FeatureMap) -> Result<f64, ScoreError> {
        let vector = self.vector(features)?;
        let probability = self.classifier.predict_probability(&vector)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoreError::ProbabilityOutOfRange(probability));
        }
        Ok(probability)
    }

    fn report_missing(&self, missing: &[String]) {
        // A poisoned set only means a previous warning panicked mid-insert.
        let mut warned = match self.warned_missing.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for name in missing {
            if warned.insert(name.clone()) {
                log::warn!("feature '{}' absent from input, scoring it as 0.0", name);
            } else {
                log::trace!("feature '{}' absent from input", name);
            }
        }
    }
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer")
            .field("schema", &self.schema)
            .field("feature_count", &self.classifier.feature_count())
            .finish()
    }
}
