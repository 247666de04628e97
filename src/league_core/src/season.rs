use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::SeasonConfig;
use crate::error::Result;
use crate::schedule::{generate_schedule, Fixture, Schedule};
use crate::simulator::{simulate_match, MatchResult};
use crate::standings::{Standing, StandingsTable};
use crate::strength::StrengthModel;

/// Everything produced by one simulated season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonOutcome {
    pub schedule: Schedule,

    /// Results grouped by round, in schedule order
    pub results: Vec<Vec<MatchResult>>,

    /// Ranked table after each round
    pub tables: Vec<Vec<Standing>>,

    pub positions: PositionHistory,
}

impl SeasonOutcome {
    pub fn final_table(&self) -> &[Standing] {
        self.tables.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn champion(&self) -> Option<&str> {
        self.final_table().first().map(|s| s.team.as_str())
    }
}

/// Rank of every team after each round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionHistory {
    positions: BTreeMap<String, Vec<usize>>,
}

impl PositionHistory {
    pub fn from_tables(tables: &[Vec<Standing>]) -> Self {
        let mut positions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for table in tables {
            for row in table {
                positions.entry(row.team.clone()).or_default().push(row.rank);
            }
        }
        PositionHistory { positions }
    }

    pub fn ranks(&self, team: &str) -> Option<&[usize]> {
        self.positions.get(team).map(Vec::as_slice)
    }

    pub fn num_rounds(&self) -> usize {
        self.positions.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Teams ordered by their rank after the last round
    pub fn final_order(&self) -> Vec<String> {
        let mut teams: Vec<(&String, usize)> = self
            .positions
            .iter()
            .filter_map(|(team, ranks)| ranks.last().map(|&r| (team, r)))
            .collect();
        teams.sort_by_key(|&(_, rank)| rank);
        teams.into_iter().map(|(team, _)| team.clone()).collect()
    }
}

/// RNG for a run: seeded when `seed` is given, from entropy otherwise.
pub fn season_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Play one round against the current ratings, then drift them if the
/// season is adaptive.
pub fn play_round<R: Rng>(
    strengths: &mut StrengthModel,
    round: &[Fixture],
    config: &SeasonConfig,
    rng: &mut R,
) -> Result<Vec<MatchResult>> {
    config.validate()?;
    let min_strength = strengths.min_strength();
    let params = config.match_params();

    let results = round
        .iter()
        .map(|f| simulate_match(strengths, &f.home, &f.away, min_strength, &params, rng))
        .collect::<Result<Vec<_>>>()?;

    if config.adaptive {
        strengths.drift(config.drift_proportion, rng)?;
    }
    Ok(results)
}

/// Ranked tables after every round of already-played results.
pub fn standings_by_round(teams: &[String], rounds: &[Vec<MatchResult>]) -> Result<Vec<Vec<Standing>>> {
    let mut table = StandingsTable::new(teams.iter().cloned());
    let mut tables = Vec::with_capacity(rounds.len());
    for round in rounds {
        table.apply_round(round)?;
        tables.push(table.rank());
    }
    Ok(tables)
}

/// Schedule and play a full season.
///
/// `strengths` is left holding the end-of-season ratings.
pub fn simulate_season<R: Rng>(
    strengths: &mut StrengthModel,
    config: &SeasonConfig,
    rng: &mut R,
) -> Result<SeasonOutcome> {
    config.validate()?;

    let teams = strengths.names();
    let schedule = generate_schedule(&teams, config.symmetric, rng)?;
    info!(
        "simulating {} rounds for {} teams (adaptive: {})",
        schedule.num_rounds(),
        teams.len(),
        config.adaptive
    );

    let mut table = StandingsTable::new(teams.iter().cloned());
    let mut results = Vec::with_capacity(schedule.num_rounds());
    let mut tables = Vec::with_capacity(schedule.num_rounds());

    for (i, round) in schedule.rounds.iter().enumerate() {
        let round_results = play_round(strengths, round, config, rng)?;
        table.apply_round(&round_results)?;

        let ranked = table.rank();
        if let Some(leader) = ranked.first() {
            debug!(
                "round {}: {} leads on {} points",
                i + 1,
                leader.team,
                leader.record.points()
            );
        }

        results.push(round_results);
        tables.push(ranked);
    }

    let positions = PositionHistory::from_tables(&tables);
    let outcome = SeasonOutcome {
        schedule,
        results,
        tables,
        positions,
    };
    if let Some(champion) = outcome.champion() {
        info!("season complete, champion: {}", champion);
    }
    Ok(outcome)
}
