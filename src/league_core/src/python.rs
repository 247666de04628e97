//! Python bindings, built with `--features python`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::SeasonConfig;
use crate::constants::{DRIFT_PROPORTION, GOAL_SPREAD, VARIANCE_PROPORTION};
use crate::error::LeagueError;
use crate::schedule::generate_schedule;
use crate::season::{season_rng, simulate_season, standings_by_round};
use crate::simulator::MatchResult;
use crate::standings::Standing;
use crate::strength::StrengthModel;
use crate::team::Team;

/// (home, home goals, away goals, away)
type PyResultRow = (String, u32, u32, String);

/// (rank, team, played, won, drawn, lost, GF, GA, GD, points)
type PyTableRow = (usize, String, u32, u32, u32, u32, u32, u32, i64, u32);

impl From<LeagueError> for PyErr {
    fn from(err: LeagueError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn table_rows(table: Vec<Standing>) -> Vec<PyTableRow> {
    table
        .into_iter()
        .map(|s| {
            let r = s.record;
            (
                s.rank,
                s.team,
                r.played(),
                r.wins(),
                r.draws(),
                r.losses(),
                r.goals_scored(),
                r.goals_conceded(),
                r.goal_difference(),
                r.points(),
            )
        })
        .collect()
}

/// Double round-robin fixtures as rounds of (home, away) pairs.
#[pyfunction]
#[pyo3(signature = (teams, symmetric = true, seed = None))]
fn generate_fixtures(
    teams: Vec<String>,
    symmetric: bool,
    seed: Option<u64>,
) -> PyResult<Vec<Vec<(String, String)>>> {
    let mut rng = season_rng(seed);
    let schedule = generate_schedule(&teams, symmetric, &mut rng)?;
    Ok(schedule
        .rounds
        .into_iter()
        .map(|round| round.into_iter().map(|f| (f.home, f.away)).collect())
        .collect())
}

/// Simulate a season from `{team: (expected_scored, expected_conceded)}`.
///
/// Returns (results per round, ranked table per round).
#[pyfunction]
#[pyo3(signature = (strengths, symmetric = true, adaptive = true, seed = None))]
fn simulate_league(
    strengths: HashMap<String, (f64, f64)>,
    symmetric: bool,
    adaptive: bool,
    seed: Option<u64>,
) -> PyResult<(Vec<Vec<PyResultRow>>, Vec<Vec<PyTableRow>>)> {
    let mut teams: Vec<Team> = strengths
        .into_iter()
        .map(|(name, (scored, conceded))| Team::new(name, scored, conceded))
        .collect();
    // Dict order is not stable across runs
    teams.sort_by(|a, b| a.name.cmp(&b.name));

    let mut model = StrengthModel::new(teams)?;
    let config = SeasonConfig {
        symmetric,
        adaptive,
        seed,
        ..SeasonConfig::default()
    };
    let mut rng = season_rng(config.seed);
    let outcome = simulate_season(&mut model, &config, &mut rng)?;

    let results = outcome
        .results
        .into_iter()
        .map(|round| {
            round
                .into_iter()
                .map(|r| (r.fixture.home, r.home_goals, r.away_goals, r.fixture.away))
                .collect()
        })
        .collect();
    let tables = outcome.tables.into_iter().map(table_rows).collect();
    Ok((results, tables))
}

/// Rebuild per-round tables from recorded results.
#[pyfunction]
fn standings_from_results(
    teams: Vec<String>,
    results: Vec<Vec<PyResultRow>>,
) -> PyResult<Vec<Vec<PyTableRow>>> {
    let rounds: Vec<Vec<MatchResult>> = results
        .into_iter()
        .map(|round| {
            round
                .into_iter()
                .map(|(home, hg, ag, away)| MatchResult::new(home, hg, ag, away))
                .collect()
        })
        .collect();
    let tables = standings_by_round(&teams, &rounds)?;
    Ok(tables.into_iter().map(table_rows).collect())
}

/// Python module definition
#[pymodule]
fn league_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(generate_fixtures, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_league, m)?)?;
    m.add_function(wrap_pyfunction!(standings_from_results, m)?)?;

    m.add("VARIANCE_PROPORTION", VARIANCE_PROPORTION)?;
    m.add("GOAL_SPREAD", GOAL_SPREAD)?;
    m.add("DRIFT_PROPORTION", DRIFT_PROPORTION)?;

    Ok(())
}
