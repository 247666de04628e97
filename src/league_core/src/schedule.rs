use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::error::{LeagueError, Result};

/// A single match: `home` hosts `away`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Fixture {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Same pairing with the venue swapped
    pub fn reversed(&self) -> Self {
        Fixture {
            home: self.away.clone(),
            away: self.home.clone(),
        }
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home, self.away)
    }
}

/// Matches played simultaneously; no team appears twice.
pub type Round = Vec<Fixture>;

/// Double round-robin season: the winter half followed by the summer half.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rounds: Vec<Round>,
}

impl Schedule {
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// (winter, summer)
    pub fn halves(&self) -> (&[Round], &[Round]) {
        self.rounds.split_at(self.rounds.len() / 2)
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.rounds.iter().flatten()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, round) in self.rounds.iter().enumerate() {
            writeln!(f, "Round {}:", i + 1)?;
            for fixture in round {
                writeln!(f, "{}", fixture)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build a double round-robin schedule.
///
/// The team order is sorted and then shuffled with `rng`, so the result
/// depends only on the set of names and the RNG state. With `symmetric` the
/// summer half replays the winter pairings with venues swapped; otherwise the
/// summer half is an independently drawn round-robin and a pair may meet at
/// the same venue twice.
///
/// # Errors
/// `InvalidInput` for an odd or sub-two team count, or duplicate names.
pub fn generate_schedule<R: Rng>(teams: &[String], symmetric: bool, rng: &mut R) -> Result<Schedule> {
    let n_teams = teams.len();
    if n_teams < 2 || n_teams % 2 != 0 {
        return Err(LeagueError::InvalidInput(format!(
            "a round-robin needs an even number of teams (at least 2), got {}",
            n_teams
        )));
    }
    let mut seen = HashSet::with_capacity(n_teams);
    for team in teams {
        if !seen.insert(team.as_str()) {
            return Err(LeagueError::InvalidInput(format!("duplicate team name: {}", team)));
        }
    }

    let mut order = teams.to_vec();
    order.sort();
    order.shuffle(rng);

    let winter = generate_round_robin(&order, rng);
    let summer = if symmetric {
        winter
            .iter()
            .map(|round| round.iter().map(Fixture::reversed).collect())
            .collect()
    } else {
        order.shuffle(rng);
        generate_round_robin(&order, rng)
    };

    let mut rounds = winter;
    rounds.extend(summer);
    debug!(
        "generated {} rounds for {} teams (symmetric: {})",
        rounds.len(),
        n_teams,
        symmetric
    );

    Ok(Schedule { rounds })
}

/// Single round-robin over `order` by the circle method.
///
/// `order` must hold an even number of distinct teams. The first seat stays
/// fixed while everyone else moves one seat per round.
fn generate_round_robin<R: Rng>(order: &[String], rng: &mut R) -> Vec<Round> {
    let n_teams = order.len();
    let (first, second) = order.split_at(n_teams / 2);
    let mut half1 = first.to_vec();
    let mut half2 = second.to_vec();

    let mut rounds = Vec::with_capacity(n_teams - 1);
    for i in 0..n_teams - 1 {
        let mut round: Round = half1
            .iter()
            .zip(&half2)
            .map(|(a, b)| {
                // Alternate which half hosts to balance venues
                if i % 2 == 1 {
                    Fixture::new(a.clone(), b.clone())
                } else {
                    Fixture::new(b.clone(), a.clone())
                }
            })
            .collect();
        round.shuffle(rng);
        rounds.push(round);

        rotate(&mut half1, &mut half2);
    }
    rounds
}

/// Advance every seat except `half1[0]` one step around the circle.
///
/// Seats run along `half1` and back along `half2`, so `half1[j]` always faces
/// `half2[j]`.
fn rotate(half1: &mut Vec<String>, half2: &mut Vec<String>) {
    let k = half1.len();
    if k < 2 {
        return;
    }
    let mut seats: Vec<String> = half1.drain(1..).chain(half2.drain(..).rev()).collect();
    seats.rotate_right(1);
    half1.extend(seats.drain(..k - 1));
    half2.extend(seats.into_iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Team{}", i)).collect()
    }

    fn unordered(fixture: &Fixture) -> (String, String) {
        if fixture.home < fixture.away {
            (fixture.home.clone(), fixture.away.clone())
        } else {
            (fixture.away.clone(), fixture.home.clone())
        }
    }

    fn assert_rounds_disjoint(schedule: &Schedule, n_teams: usize) {
        for round in &schedule.rounds {
            assert_eq!(round.len(), n_teams / 2);
            let mut seen = HashSet::new();
            for fixture in round {
                assert_ne!(fixture.home, fixture.away);
                assert!(seen.insert(fixture.home.clone()), "{} twice in a round", fixture.home);
                assert!(seen.insert(fixture.away.clone()), "{} twice in a round", fixture.away);
            }
        }
    }

    fn assert_each_pair_once(rounds: &[Round], n_teams: usize) {
        let mut pairs = HashSet::new();
        for fixture in rounds.iter().flatten() {
            assert!(pairs.insert(unordered(fixture)), "{} repeated", fixture);
        }
        assert_eq!(pairs.len(), n_teams * (n_teams - 1) / 2);
    }

    #[test]
    fn test_four_teams_symmetric() {
        let teams: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let schedule = generate_schedule(&teams, true, &mut rng).unwrap();

        assert_eq!(schedule.num_rounds(), 6);
        assert_rounds_disjoint(&schedule, 4);

        let mut home = HashMap::new();
        let mut away = HashMap::new();
        for fixture in schedule.fixtures() {
            *home.entry(fixture.home.clone()).or_insert(0) += 1;
            *away.entry(fixture.away.clone()).or_insert(0) += 1;
        }
        for team in &teams {
            assert_eq!(home[team], 3, "{} home count", team);
            assert_eq!(away[team], 3, "{} away count", team);
        }
    }

    #[test]
    fn test_symmetric_pairs_meet_home_and_away() {
        let teams = names(10);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let schedule = generate_schedule(&teams, true, &mut rng).unwrap();

        let directed: HashSet<Fixture> = schedule.fixtures().cloned().collect();
        assert_eq!(directed.len(), 10 * 9);
        for a in &teams {
            for b in &teams {
                if a != b {
                    assert!(directed.contains(&Fixture::new(a.clone(), b.clone())));
                }
            }
        }

        let (winter, summer) = schedule.halves();
        for (w, s) in winter.iter().zip(summer) {
            let reversed: Vec<Fixture> = w.iter().map(Fixture::reversed).collect();
            assert_eq!(&reversed, s);
        }
    }

    #[test]
    fn test_independent_halves() {
        let teams = names(8);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let schedule = generate_schedule(&teams, false, &mut rng).unwrap();

        assert_eq!(schedule.num_rounds(), 14);
        assert_rounds_disjoint(&schedule, 8);
        let (winter, summer) = schedule.halves();
        assert_each_pair_once(winter, 8);
        assert_each_pair_once(summer, 8);
    }

    #[test]
    fn test_two_teams() {
        let teams = names(2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let schedule = generate_schedule(&teams, true, &mut rng).unwrap();

        assert_eq!(schedule.num_rounds(), 2);
        assert_eq!(schedule.rounds[0].len(), 1);
        assert_eq!(schedule.rounds[1][0], schedule.rounds[0][0].reversed());
    }

    #[test]
    fn test_odd_team_count_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for n in [0, 1, 3, 5] {
            let result = generate_schedule(&names(n), true, &mut rng);
            assert!(matches!(result, Err(LeagueError::InvalidInput(_))), "n = {}", n);
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let teams = vec!["A".to_string(), "B".to_string(), "A".to_string(), "C".to_string()];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(generate_schedule(&teams, true, &mut rng).is_err());
    }

    #[test]
    fn test_same_seed_same_schedule_regardless_of_input_order() {
        let teams = names(6);
        let mut reversed = teams.clone();
        reversed.reverse();

        let s1 = generate_schedule(&teams, true, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let s2 = generate_schedule(&reversed, true, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_rotation_keeps_first_seat() {
        let mut half1: Vec<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        let mut half2: Vec<String> = ["C", "D"].iter().map(|s| s.to_string()).collect();
        rotate(&mut half1, &mut half2);
        assert_eq!(half1, vec!["A", "C"]);
        assert_eq!(half2, vec!["D", "B"]);
    }

    #[test]
    fn test_display_lists_rounds() {
        let teams = names(2);
        let schedule = generate_schedule(&teams, true, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        let text = schedule.to_string();
        assert!(text.starts_with("Round 1:\n"));
        assert!(text.contains("Round 2:\n"));
        assert!(text.contains(" vs "));
    }

    proptest! {
        #[test]
        fn prop_double_round_robin(half in 1usize..12, seed in any::<u64>(), symmetric in any::<bool>()) {
            let n_teams = half * 2;
            let teams = names(n_teams);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let schedule = generate_schedule(&teams, symmetric, &mut rng).unwrap();

            prop_assert_eq!(schedule.num_rounds(), 2 * n_teams - 2);
            assert_rounds_disjoint(&schedule, n_teams);
            let (winter, summer) = schedule.halves();
            assert_each_pair_once(winter, n_teams);
            assert_each_pair_once(summer, n_teams);

            let mut appearances: HashMap<&str, usize> = HashMap::new();
            for fixture in schedule.fixtures() {
                *appearances.entry(fixture.home.as_str()).or_insert(0) += 1;
                *appearances.entry(fixture.away.as_str()).or_insert(0) += 1;
            }
            for team in &teams {
                prop_assert_eq!(appearances[team.as_str()], 2 * n_teams - 2);
            }

            if symmetric {
                let mut home: HashMap<&str, usize> = HashMap::new();
                for fixture in schedule.fixtures() {
                    *home.entry(fixture.home.as_str()).or_insert(0) += 1;
                }
                for team in &teams {
                    prop_assert_eq!(home[team.as_str()], n_teams - 1);
                }
            }
        }
    }
}
