use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::constants::{NAME_COLUMN_WIDTH, POINTS_PER_DRAW, POINTS_PER_WIN, STAT_COLUMN_WIDTH};
use crate::error::{LeagueError, Result};
use crate::simulator::MatchResult;

/// Cumulative season record for one team.
///
/// Only the raw counts are stored; matches played, goal difference and
/// points are always derived from them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    wins: u32,
    draws: u32,
    losses: u32,
    goals_scored: u32,
    goals_conceded: u32,
}

impl TeamRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(wins: u32, draws: u32, losses: u32, goals_scored: u32, goals_conceded: u32) -> Self {
        TeamRecord {
            wins,
            draws,
            losses,
            goals_scored,
            goals_conceded,
        }
    }

    /// Record one match from this team's point of view.
    pub fn update_stats(&mut self, goals_for: u32, goals_against: u32) {
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => self.wins += 1,
            Ordering::Equal => self.draws += 1,
            Ordering::Less => self.losses += 1,
        }
        self.goals_scored += goals_for;
        self.goals_conceded += goals_against;
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn goals_scored(&self) -> u32 {
        self.goals_scored
    }

    pub fn goals_conceded(&self) -> u32 {
        self.goals_conceded
    }

    pub fn played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_scored as i64 - self.goals_conceded as i64
    }

    pub fn points(&self) -> u32 {
        self.wins * POINTS_PER_WIN + self.draws * POINTS_PER_DRAW
    }

    /// Columns in table order: played, won, drawn, lost, GF, GA, GD, points.
    pub fn columns(&self) -> [i64; 8] {
        [
            self.played() as i64,
            self.wins as i64,
            self.draws as i64,
            self.losses as i64,
            self.goals_scored as i64,
            self.goals_conceded as i64,
            self.goal_difference(),
            self.points() as i64,
        ]
    }

    /// Higher is better: points, then goal difference, then goals scored.
    fn ranking_key(&self) -> (u32, i64, u32) {
        (self.points(), self.goal_difference(), self.goals_scored)
    }
}

/// One row of a ranked table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub team: String,
    pub record: TeamRecord,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>2}. {:<width$}",
            self.rank,
            self.team,
            width = NAME_COLUMN_WIDTH
        )?;
        for value in self.record.columns() {
            write!(f, "{:>width$}", value, width = STAT_COLUMN_WIDTH)?;
        }
        Ok(())
    }
}

/// Records for every team in the league, keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StandingsTable {
    records: HashMap<String, TeamRecord>,
}

impl StandingsTable {
    /// Table with an empty record for each team.
    pub fn new<I, S>(teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = StandingsTable::default();
        for team in teams {
            table.add_team(team);
        }
        table
    }

    /// Register a team; an existing record is left alone.
    pub fn add_team(&mut self, team: impl Into<String>) {
        self.records.entry(team.into()).or_default();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, team: &str) -> Result<&TeamRecord> {
        self.records
            .get(team)
            .ok_or_else(|| LeagueError::UnknownTeam(team.to_string()))
    }

    /// Credit a result to both sides.
    ///
    /// # Errors
    /// `UnknownTeam` if either side is missing; the table is not modified.
    pub fn apply_result(&mut self, result: &MatchResult) -> Result<()> {
        for team in [result.home(), result.away()] {
            if !self.records.contains_key(team) {
                return Err(LeagueError::UnknownTeam(team.to_string()));
            }
        }

        if let Some(home) = self.records.get_mut(result.home()) {
            home.update_stats(result.home_goals, result.away_goals);
        }
        if let Some(away) = self.records.get_mut(result.away()) {
            away.update_stats(result.away_goals, result.home_goals);
        }
        Ok(())
    }

    pub fn apply_round(&mut self, results: &[MatchResult]) -> Result<()> {
        for result in results {
            self.apply_result(result)?;
        }
        Ok(())
    }

    /// Teams ordered best first with 1-based ranks.
    ///
    /// Sorted by points, goal difference and goals scored (all descending);
    /// teams level on all three are listed by name. Ranks are never shared.
    pub fn rank(&self) -> Vec<Standing> {
        let mut rows: Vec<(&String, &TeamRecord)> = self.records.iter().collect();
        rows.sort_by(|(name_a, a), (name_b, b)| {
            b.ranking_key()
                .cmp(&a.ranking_key())
                .then_with(|| name_a.cmp(name_b))
        });

        rows.into_iter()
            .enumerate()
            .map(|(i, (team, record))| Standing {
                rank: i + 1,
                team: team.clone(),
                record: *record,
            })
            .collect()
    }
}

/// Render a ranked table, one line per team with a trailing newline.
pub fn format_table(standings: &[Standing]) -> String {
    let mut out = String::new();
    for row in standings {
        out.push_str(&row.to_string());
        out.push('\n');
    }
    out
}

/// Parse one line written by [`format_table`].
///
/// Names may contain single spaces. The derived columns must agree with the
/// raw counts.
pub fn parse_table_line(line: &str, line_no: usize) -> Result<Standing> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 10 {
        return Err(LeagueError::data_format(line_no, "expected rank, name and 8 columns"));
    }

    let rank = tokens[0]
        .strip_suffix('.')
        .and_then(|r| r.parse::<usize>().ok())
        .ok_or_else(|| LeagueError::data_format(line_no, format!("bad rank '{}'", tokens[0])))?;

    let split = tokens.len() - 8;
    let team = tokens[1..split].join(" ");

    let mut values = [0i64; 8];
    for (slot, token) in values.iter_mut().zip(&tokens[split..]) {
        *slot = token
            .parse()
            .map_err(|_| LeagueError::data_format(line_no, format!("bad number '{}'", token)))?;
    }

    let counts: Vec<u32> = values[1..6]
        .iter()
        .map(|&v| u32::try_from(v))
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| LeagueError::data_format(line_no, "count out of range"))?;
    let record = TeamRecord::from_counts(counts[0], counts[1], counts[2], counts[3], counts[4]);

    if record.columns() != values {
        return Err(LeagueError::data_format(
            line_no,
            format!("columns for {} are inconsistent", team),
        ));
    }

    Ok(Standing { rank, team, record })
}

/// Parse a whole table, skipping blank lines.
pub fn parse_table(text: &str) -> Result<Vec<Standing>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_table_line(line, i + 1))
        .collect()
}
