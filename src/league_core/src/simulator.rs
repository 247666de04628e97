use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{GOAL_SPREAD, VARIANCE_PROPORTION};
use crate::error::{LeagueError, Result};
use crate::schedule::Fixture;
use crate::strength::StrengthModel;
use crate::team::Team;

/// Knobs for the two-stage score generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Base-goal noise as a share of the league's weakest rating
    pub variance_proportion: f64,

    /// Realized goals are drawn from `[(1 - spread) * base, (1 + spread) * base]`
    pub goal_spread: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        MatchParams {
            variance_proportion: VARIANCE_PROPORTION,
            goal_spread: GOAL_SPREAD,
        }
    }
}

impl MatchParams {
    /// Both knobs must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("variance_proportion", self.variance_proportion),
            ("goal_spread", self.goal_spread),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LeagueError::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Final score of a fixture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    pub fixture: Fixture,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchResult {
    pub fn new(home: impl Into<String>, home_goals: u32, away_goals: u32, away: impl Into<String>) -> Self {
        MatchResult {
            fixture: Fixture::new(home, away),
            home_goals,
            away_goals,
        }
    }

    pub fn home(&self) -> &str {
        &self.fixture.home
    }

    pub fn away(&self) -> &str {
        &self.fixture.away
    }

    /// Winning team, `None` for a draw
    pub fn winner(&self) -> Option<&str> {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => Some(self.home()),
            std::cmp::Ordering::Less => Some(self.away()),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} {}",
            self.fixture.home, self.home_goals, self.away_goals, self.fixture.away
        )
    }
}

/// Expected goals for `attacker` against `defender`: the mean of the
/// attacker's scoring rate and the defender's conceding rate, plus uniform
/// noise in `[-variation, variation]`. `variation` must be finite.
pub fn base_goals<R: Rng>(attacker: &Team, defender: &Team, variation: f64, rng: &mut R) -> f64 {
    let variation = variation.max(0.0);
    (attacker.expected_scored + defender.expected_conceded) / 2.0
        + rng.gen_range(-variation..=variation)
}

/// Turn a base estimate into a whole, non-negative goal count. Both
/// arguments must be finite.
pub fn realize_goals<R: Rng>(base: f64, spread: f64, rng: &mut R) -> u32 {
    let a = (1.0 - spread) * base;
    let b = (1.0 + spread) * base;
    let goals = rng.gen_range(a.min(b)..=a.max(b)).round();
    goals.max(0.0) as u32
}

/// Simulate one match between two teams of `strengths`.
///
/// `min_league_strength` is the weakest rating in the league at the start of
/// the round; it scales the base-goal noise so that low-scoring leagues are
/// not swamped by it.
///
/// # Errors
/// `UnknownTeam` if either side has no rating, `InvalidInput` if `params`
/// fails validation or `min_league_strength` is not a finite number.
pub fn simulate_match<R: Rng>(
    strengths: &StrengthModel,
    home: &str,
    away: &str,
    min_league_strength: f64,
    params: &MatchParams,
    rng: &mut R,
) -> Result<MatchResult> {
    params.validate()?;
    if !min_league_strength.is_finite() {
        return Err(LeagueError::InvalidInput(format!(
            "min_league_strength must be finite, got {}",
            min_league_strength
        )));
    }
    let home_team = strengths.get(home)?;
    let away_team = strengths.get(away)?;

    let variation = min_league_strength * params.variance_proportion;
    let base_home = base_goals(home_team, away_team, variation, rng);
    let base_away = base_goals(away_team, home_team, variation, rng);

    let home_goals = realize_goals(base_home, params.goal_spread, rng);
    let away_goals = realize_goals(base_away, params.goal_spread, rng);

    Ok(MatchResult::new(home, home_goals, away_goals, away))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_model() -> StrengthModel {
        StrengthModel::new(vec![
            Team::new("Strong", 3.0, 0.5),
            Team::new("Weak", 0.5, 3.0),
            Team::new("Home", 3.0, 1.0),
            Team::new("Away", 1.0, 1.0),
            Team::new("Zero", 0.0, 0.0),
            Team::new("Nil", 0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_noise_rounds_the_mean() {
        let model = make_model();
        let params = MatchParams {
            variance_proportion: 0.0,
            goal_spread: 0.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = simulate_match(&model, "Home", "Away", 1.0, &params, &mut rng).unwrap();

        assert_eq!(result, MatchResult::new("Home", 2, 1, "Away"));
        assert_eq!(result.winner(), Some("Home"));
        assert_eq!(result.to_string(), "Home 2 - 1 Away");
    }

    #[test]
    fn test_zero_strength_teams_draw_nil_nil() {
        let model = make_model();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let result =
                simulate_match(&model, "Zero", "Nil", 0.0, &MatchParams::default(), &mut rng).unwrap();
            assert_eq!((result.home_goals, result.away_goals), (0, 0));
            assert_eq!(result.winner(), None);
        }
    }

    #[test]
    fn test_unknown_team() {
        let model = make_model();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = simulate_match(&model, "Home", "Ghost", 0.5, &MatchParams::default(), &mut rng);
        assert!(matches!(result, Err(LeagueError::UnknownTeam(name)) if name == "Ghost"));
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let model = make_model();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let wide = MatchParams {
            goal_spread: f64::INFINITY,
            ..MatchParams::default()
        };
        let negative = MatchParams {
            variance_proportion: -0.5,
            ..MatchParams::default()
        };
        for params in [wide, negative] {
            let result = simulate_match(&model, "Home", "Away", 1.0, &params, &mut rng);
            assert!(matches!(result, Err(LeagueError::InvalidInput(_))));
        }
        for min in [f64::INFINITY, f64::NAN] {
            let result = simulate_match(&model, "Home", "Away", min, &MatchParams::default(), &mut rng);
            assert!(matches!(result, Err(LeagueError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_stronger_team_usually_wins() {
        let model = make_model();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let min = model.min_strength();
        let mut strong_wins = 0;
        for _ in 0..1000 {
            let result =
                simulate_match(&model, "Weak", "Strong", min, &MatchParams::default(), &mut rng).unwrap();
            if result.winner() == Some("Strong") {
                strong_wins += 1;
            }
        }
        assert!(strong_wins > 750, "strong side won only {} of 1000", strong_wins);
    }

    #[test]
    fn test_same_seed_same_score() {
        let model = make_model();
        let params = MatchParams::default();
        let a = simulate_match(&model, "Home", "Away", 1.0, &params, &mut ChaCha8Rng::seed_from_u64(11));
        let b = simulate_match(&model, "Home", "Away", 1.0, &params, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    proptest! {
        #[test]
        fn prop_realized_goals_bounded(base in -5.0f64..10.0, spread in 0.0f64..3.0, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let goals = realize_goals(base, spread, &mut rng);
            let upper = (base.abs() * (1.0 + spread)).round() as u32;
            prop_assert!(goals <= upper);
            if base <= 0.0 && spread <= 1.0 {
                prop_assert_eq!(goals, 0);
            }
        }

        #[test]
        fn prop_base_goals_within_variation(variation in 0.0f64..2.0, seed in any::<u64>()) {
            let attacker = Team::new("A", 2.0, 1.0);
            let defender = Team::new("B", 1.0, 1.5);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let base = base_goals(&attacker, &defender, variation, &mut rng);
            prop_assert!((base - 1.75).abs() <= variation + 1e-12);
        }
    }
}
