//! Feature schema: the ordered layout of the classifier input vector.

use crate::error::ConfigError;
use crate::reading::{features, FeatureMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Ordered list of feature names, matching the classifier's training order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

/// A feature vector plus the schema names that had no value in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Vectorized {
    pub values: Vec<f64>,
    /// Names defaulted to 0.0.
    pub missing: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty or duplicated name lists.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// The nine features the bundled model was trained on.
    pub fn standard() -> Self {
        Self {
            names: features::ALL.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load from a JSON array of names.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let names: Vec<String> =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look every schema name up in `map`, in order. Absent names become 0.0
    /// and are listed in [`Vectorized::missing`].
    pub fn vectorize(&self, map: &FeatureMap) -> Vectorized {
        let mut values = Vec::with_capacity(self.names.len());
        let mut missing = Vec::new();
        for name in &self.names {
            match map.get(name) {
                Some(v) => values.push(*v),
                None => {
                    values.push(0.0);
                    missing.push(name.clone());
                }
            }
        }
        Vectorized { values, missing }
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_vectorize_follows_schema_order() {
        let schema = FeatureSchema::new(["b", "a"]).unwrap();
        let map: FeatureMap = [("a".to_string(), 1.0), ("b".to_string(), 2.0)]
            .into_iter()
            .collect();
        let v = schema.vectorize(&map);
        assert_eq!(v.values, vec![2.0, 1.0]);
        assert!(v.missing.is_empty());
    }

    #[test]
    fn test_missing_names_default_to_zero() {
        let schema = FeatureSchema::new(["a", "unknown"]).unwrap();
        let map: FeatureMap = [("a".to_string(), 5.0)].into_iter().collect();
        let v = schema.vectorize(&map);
        assert_eq!(v.values, vec![5.0, 0.0]);
        assert_eq!(v.missing, vec!["unknown".to_string()]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            FeatureSchema::new(Vec::<String>::new()),
            Err(ConfigError::EmptySchema)
        ));
        assert!(matches!(
            FeatureSchema::new(["a", "a"]),
            Err(ConfigError::DuplicateFeature(_))
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"["Torque_(Nm)", "Tool_wear_(min)"]"#).unwrap();
        file.flush().unwrap();

        let schema = FeatureSchema::from_json_file(file.path()).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.names()[0], "Torque_(Nm)");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = FeatureSchema::from_json_file("/nonexistent/feature_names.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
