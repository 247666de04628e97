use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use tracing::info;

use crate::config::SeasonConfig;
use crate::error::Result;
use crate::season::{season_rng, simulate_season, SeasonOutcome};
use crate::strength::StrengthModel;

/// How one team fared across a batch of seasons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    pub title_probability: f64,
    pub mean_points: f64,
    pub points_std_dev: f64,
    pub mean_rank: f64,
    pub best_rank: usize,
    pub worst_rank: usize,
}

/// Run independent seasons in parallel.
///
/// Every season starts from a fresh copy of `strengths` and gets its own
/// seed drawn up front from a master RNG, so the batch is reproducible for a
/// given `seed` whatever the thread count.
pub fn run_simulations(
    strengths: &StrengthModel,
    config: &SeasonConfig,
    n_simulations: usize,
    seed: Option<u64>,
) -> Result<Vec<SeasonOutcome>> {
    config.validate()?;

    let mut rng = season_rng(seed);
    let seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen::<u64>()).collect();
    info!("running {} seasons for {} teams", n_simulations, strengths.len());

    seeds
        .par_iter()
        .map(|&sim_seed| {
            let mut model = strengths.clone();
            let mut sim_rng = ChaCha8Rng::seed_from_u64(sim_seed);
            simulate_season(&mut model, config, &mut sim_rng)
        })
        .collect()
}

/// Per-team statistics over the final tables of `outcomes`, best mean rank
/// first.
pub fn summarize(outcomes: &[SeasonOutcome]) -> Vec<TeamSummary> {
    let mut points: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut ranks: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut titles: HashMap<&str, usize> = HashMap::new();

    for outcome in outcomes {
        for row in outcome.final_table() {
            points.entry(&row.team).or_default().push(row.record.points() as f64);
            ranks.entry(&row.team).or_default().push(row.rank);
        }
        if let Some(champion) = outcome.champion() {
            *titles.entry(champion).or_insert(0) += 1;
        }
    }

    let n = outcomes.len() as f64;
    let mut summaries: Vec<TeamSummary> = points
        .into_iter()
        .map(|(team, team_points)| {
            let team_ranks = &ranks[team];
            let rank_values: Vec<f64> = team_ranks.iter().map(|&r| r as f64).collect();
            let points_std_dev = if team_points.len() > 1 {
                team_points.iter().std_dev()
            } else {
                0.0
            };
            TeamSummary {
                team: team.to_string(),
                title_probability: titles.get(team).copied().unwrap_or(0) as f64 / n,
                mean_points: team_points.iter().mean(),
                points_std_dev,
                mean_rank: rank_values.iter().mean(),
                best_rank: team_ranks.iter().fold(usize::MAX, |best, &r| best.min(r)),
                worst_rank: team_ranks.iter().fold(0, |worst, &r| worst.max(r)),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.mean_rank
            .total_cmp(&b.mean_rank)
            .then_with(|| a.team.cmp(&b.team))
    });
    summaries
}
