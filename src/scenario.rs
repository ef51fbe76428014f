//! Scenario documents
//!
//! JSON description of one analysis request: declared dimensions, the
//! algorithm to run, and the three input matrices.
//!
//! ```json
//! {
//!   "processes": 2,
//!   "resources": 1,
//!   "algorithm": "banker",
//!   "allocation": [[0], [1]],
//!   "max": [[1], [1]],
//!   "available": [0]
//! }
//! ```

use crate::engine::Algorithm;
use crate::error::Result;
use crate::state::{Matrix, ResourceState, ResourceVector};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub processes: usize,
    pub resources: usize,
    #[serde(default)]
    pub algorithm: Algorithm,
    pub allocation: Matrix,
    pub max: Matrix,
    pub available: ResourceVector,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Builds the resource state. Shapes are not checked here; the
    /// analyzer validates before running.
    pub fn to_state(&self) -> ResourceState {
        ResourceState::new(
            self.processes,
            self.resources,
            self.allocation.clone(),
            self.max.clone(),
            self.available.clone(),
        )
    }

    pub fn from_state(algorithm: Algorithm, state: &ResourceState) -> Self {
        Scenario {
            processes: state.process_count(),
            resources: state.resource_count(),
            algorithm,
            allocation: state.allocation().clone(),
            max: state.max().clone(),
            available: state.available().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const PAIR: &str = r#"{
        "processes": 2,
        "resources": 2,
        "algorithm": "wait-for",
        "allocation": [[1, 0], [0, 1]],
        "max": [[1, 1], [1, 1]],
        "available": [0, 0]
    }"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_json(PAIR).unwrap();
        assert_eq!(scenario.algorithm, Algorithm::WaitFor);

        let state = scenario.to_state();
        assert_eq!(state.process_count(), 2);
        assert_eq!(state.need(), vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_algorithm_defaults_to_banker() {
        let scenario = Scenario::from_json(
            r#"{"processes":1,"resources":1,"allocation":[[0]],"max":[[0]],"available":[0]}"#,
        )
        .unwrap();
        assert_eq!(scenario.algorithm, Algorithm::Banker);
    }

    #[test]
    fn test_negative_entries_survive_parsing() {
        // Rejection is validation's job, not the parser's.
        let scenario = Scenario::from_json(
            r#"{"processes":1,"resources":1,"allocation":[[-1]],"max":[[0]],"available":[0]}"#,
        )
        .unwrap();
        assert_eq!(scenario.allocation, vec![vec![-1]]);
    }

    #[test]
    fn test_malformed_json() {
        let err = Scenario::from_json("{\"processes\": }").unwrap_err();
        assert!(matches!(err, Error::SerializationError(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");

        let original = Scenario::from_json(PAIR).unwrap();
        original.save(&path).unwrap();
        assert_eq!(Scenario::load(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load("/nonexistent/scenario.json").unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
