//! League Core - double round-robin league simulation.
//!
//! Schedules fixtures with the circle method, generates scores from
//! per-team expected-goal ratings that drift round by round, and keeps a
//! ranked standings table after every round. Python bindings are available
//! behind the `python` feature.

pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod results_text;
pub mod schedule;
pub mod season;
pub mod simulator;
pub mod standings;
pub mod strength;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use batch::{run_simulations, summarize, TeamSummary};
pub use config::SeasonConfig;
pub use constants::{DRIFT_PROPORTION, GOAL_SPREAD, VARIANCE_PROPORTION};
pub use error::{LeagueError, Result};
pub use results_text::{format_results, parse_results, write_results, write_round_tables};
pub use schedule::{generate_schedule, Fixture, Round, Schedule};
pub use season::{
    play_round, season_rng, simulate_season, standings_by_round, PositionHistory, SeasonOutcome,
};
pub use simulator::{simulate_match, MatchParams, MatchResult};
pub use standings::{format_table, parse_table, Standing, StandingsTable, TeamRecord};
pub use strength::{read_season_totals, SeasonTotals, StrengthModel};
pub use team::Team;
