use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LeagueError, Result};

/// Team with its expected goals scored and conceded per match.
///
/// Column names match the ratings CSV (`Team,ExpScored,ExpConceded`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "Team")]
    pub name: String,

    /// Expected goals scored per match
    #[serde(rename = "ExpScored")]
    pub expected_scored: f64,

    /// Expected goals conceded per match
    #[serde(rename = "ExpConceded")]
    pub expected_conceded: f64,
}

impl Team {
    pub fn new(name: impl Into<String>, expected_scored: f64, expected_conceded: f64) -> Self {
        Team {
            name: name.into(),
            expected_scored,
            expected_conceded,
        }
    }

    /// Reject empty names and negative or non-finite ratings.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LeagueError::InvalidInput("team name is empty".to_string()));
        }
        for (label, value) in [
            ("expected scored", self.expected_scored),
            ("expected conceded", self.expected_conceded),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LeagueError::InvalidInput(format!(
                    "{} for {} must be a non-negative number, got {}",
                    label, self.name, value
                )));
            }
        }
        Ok(())
    }

    /// Copy of this team with both ratings scaled.
    pub fn drifted(&self, scored_factor: f64, conceded_factor: f64) -> Self {
        Team {
            name: self.name.clone(),
            expected_scored: self.expected_scored * scored_factor,
            expected_conceded: self.expected_conceded * conceded_factor,
        }
    }

    /// The smaller of the two ratings
    pub fn min_rating(&self) -> f64 {
        self.expected_scored.min(self.expected_conceded)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} | {:.3}",
            self.name, self.expected_scored, self.expected_conceded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_negative_rating() {
        let team = Team::new("A", -0.1, 1.0);
        assert!(matches!(team.validate(), Err(LeagueError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let team = Team::new("A", 1.0, f64::NAN);
        assert!(team.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert!(Team::new("  ", 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_drifted_scales_ratings() {
        let team = Team::new("A", 2.0, 1.0);
        let drifted = team.drifted(1.1, 0.9);
        assert!((drifted.expected_scored - 2.2).abs() < 1e-12);
        assert!((drifted.expected_conceded - 0.9).abs() < 1e-12);
        assert_eq!(drifted.name, "A");
    }

    #[test]
    fn test_min_rating() {
        assert_eq!(Team::new("A", 1.4, 0.8).min_rating(), 0.8);
    }
}
