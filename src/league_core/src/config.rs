use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{DRIFT_PROPORTION, GOAL_SPREAD, VARIANCE_PROPORTION};
use crate::error::{LeagueError, Result};
use crate::simulator::MatchParams;

/// Settings for one simulated season.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// Summer half mirrors the winter half with venues swapped
    pub symmetric: bool,

    /// Ratings drift after every round
    pub adaptive: bool,

    pub variance_proportion: f64,

    pub goal_spread: f64,

    /// Per-round drift bound; must be below 1 so ratings stay non-negative
    pub drift_proportion: f64,

    /// Seed for the season's RNG; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        SeasonConfig {
            symmetric: true,
            adaptive: true,
            variance_proportion: VARIANCE_PROPORTION,
            goal_spread: GOAL_SPREAD,
            drift_proportion: DRIFT_PROPORTION,
            seed: None,
        }
    }
}

impl SeasonConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SeasonConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.match_params().validate()?;
        if !(0.0..1.0).contains(&self.drift_proportion) {
            return Err(LeagueError::InvalidInput(format!(
                "drift_proportion must be in [0, 1), got {}",
                self.drift_proportion
            )));
        }
        Ok(())
    }

    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            variance_proportion: self.variance_proportion,
            goal_spread: self.goal_spread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SeasonConfig::default();
        assert!(config.symmetric);
        assert!(config.adaptive);
        assert_eq!(config.variance_proportion, 0.5);
        assert_eq!(config.goal_spread, 0.9);
        assert_eq!(config.drift_proportion, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SeasonConfig::from_json_str(r#"{"adaptive": false, "seed": 17}"#).unwrap();
        assert!(!config.adaptive);
        assert!(config.symmetric);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.match_params(), MatchParams::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SeasonConfig::from_json_str(r#"{"drift_proportion": 1.0}"#),
            Err(LeagueError::InvalidInput(_))
        ));
        assert!(SeasonConfig::from_json_str(r#"{"goal_spread": -0.1}"#).is_err());
        assert!(matches!(
            SeasonConfig::from_json_str(r#"{"symmetric": "yes"}"#),
            Err(LeagueError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("season.json");
        std::fs::write(&path, r#"{"symmetric": false}"#).unwrap();
        let config = SeasonConfig::from_json_file(&path).unwrap();
        assert!(!config.symmetric);
    }
}
