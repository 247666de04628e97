use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::double_round_robin_rounds;
use crate::error::{LeagueError, Result};
use crate::team::Team;

/// Raw goal totals for one team over a past season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    #[serde(rename = "Team")]
    pub name: String,

    #[serde(rename = "GoalsScored")]
    pub goals_scored: f64,

    #[serde(rename = "GoalsConceded")]
    pub goals_conceded: f64,
}

/// Read `Team,GoalsScored,GoalsConceded` rows.
pub fn read_season_totals<R: Read>(reader: R) -> Result<Vec<SeasonTotals>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut totals = Vec::new();
    for row in rdr.deserialize() {
        totals.push(row?);
    }
    Ok(totals)
}

/// Current strength ratings for every team in the league.
///
/// Teams keep the order they were loaded in. The model is the only state
/// that changes between rounds apart from the standings.
#[derive(Clone, Debug, Default)]
pub struct StrengthModel {
    teams: Vec<Team>,
    index: HashMap<String, usize>,
}

impl StrengthModel {
    pub fn new(teams: Vec<Team>) -> Result<Self> {
        let mut index = HashMap::with_capacity(teams.len());
        for (i, team) in teams.iter().enumerate() {
            team.validate()?;
            if index.insert(team.name.clone(), i).is_some() {
                return Err(LeagueError::InvalidInput(format!(
                    "duplicate team name: {}",
                    team.name
                )));
            }
        }

        let model = StrengthModel { teams, index };
        if !model.is_empty() && model.teams.iter().all(|t| t.expected_scored == 0.0) {
            warn!("every team has an expected scored rating of zero; all matches will end 0-0");
        }
        Ok(model)
    }

    /// Load ratings from a `Team,ExpScored,ExpConceded` CSV.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut teams = Vec::new();
        for row in rdr.deserialize() {
            teams.push(row?);
        }
        Self::new(teams)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Self::from_csv_reader(File::open(path)?)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for team in &self.teams {
            wtr.serialize(team)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Derive ratings from last season's goal totals.
    ///
    /// Each total is spread over a full double round-robin, then every value
    /// gets uniform noise of +/- `noise_proportion` times the smallest value
    /// in its column.
    pub fn from_season_totals<R: Rng>(
        totals: &[SeasonTotals],
        noise_proportion: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if totals.len() < 2 {
            return Err(LeagueError::InvalidInput(format!(
                "need at least two teams, got {}",
                totals.len()
            )));
        }
        if !(0.0..=1.0).contains(&noise_proportion) {
            return Err(LeagueError::InvalidInput(format!(
                "noise proportion must be within [0, 1], got {}",
                noise_proportion
            )));
        }
        for row in totals {
            if !(row.goals_scored >= 0.0 && row.goals_conceded >= 0.0) {
                return Err(LeagueError::InvalidInput(format!(
                    "goal totals for {} must be non-negative",
                    row.name
                )));
            }
        }

        let n_rounds = double_round_robin_rounds(totals.len()) as f64;
        let scored: Vec<f64> = totals.iter().map(|t| t.goals_scored / n_rounds).collect();
        let conceded: Vec<f64> = totals.iter().map(|t| t.goals_conceded / n_rounds).collect();

        let scored = add_noise(&scored, noise_proportion, rng);
        let conceded = add_noise(&conceded, noise_proportion, rng);

        let teams = totals
            .iter()
            .zip(scored.into_iter().zip(conceded))
            .map(|(row, (s, c))| Team::new(row.name.clone(), s, c))
            .collect();

        Self::new(teams)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&Team> {
        self.index
            .get(name)
            .map(|&i| &self.teams[i])
            .ok_or_else(|| LeagueError::UnknownTeam(name.to_string()))
    }

    /// Smallest rating of any kind across the league, 0.0 when empty.
    pub fn min_strength(&self) -> f64 {
        self.teams
            .iter()
            .map(Team::min_rating)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Scale every rating by an independent factor drawn from
    /// `[1 - proportion, 1 + proportion]`.
    ///
    /// All scored ratings are drawn first, then all conceded ratings.
    ///
    /// # Errors
    /// `InvalidInput` unless `0 <= proportion < 1`.
    pub fn drift<R: Rng>(&mut self, proportion: f64, rng: &mut R) -> Result<()> {
        if !(0.0..1.0).contains(&proportion) {
            return Err(LeagueError::InvalidInput(format!(
                "drift proportion must be in [0, 1), got {}",
                proportion
            )));
        }
        let scored: Vec<f64> = (0..self.teams.len())
            .map(|_| rng.gen_range((1.0 - proportion)..=(1.0 + proportion)))
            .collect();
        let conceded: Vec<f64> = (0..self.teams.len())
            .map(|_| rng.gen_range((1.0 - proportion)..=(1.0 + proportion)))
            .collect();

        for (team, (s, c)) in self.teams.iter_mut().zip(scored.into_iter().zip(conceded)) {
            *team = team.drifted(s, c);
        }
        debug!("ratings drifted (proportion {}), weakest now {:.3}", proportion, self.min_strength());
        Ok(())
    }
}

fn add_noise<R: Rng>(values: &[f64], proportion: f64, rng: &mut R) -> Vec<f64> {
    let spread = proportion * values.iter().copied().reduce(f64::min).unwrap_or(0.0);
    values
        .iter()
        .map(|v| v + rng.gen_range(-spread..=spread))
        .collect()
}
