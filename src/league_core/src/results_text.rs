//! Plain-text persistence of a season's results.
//!
//! ```text
//! Round 1:
//! Arsenal 2 - 1 Chelsea
//! Everton 0 - 0 Fulham
//!
//! Round 2:
//! ...
//! ```
//!
//! Team names may contain spaces; the scores are located by the ` - `
//! separator flanked by goal counts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{LeagueError, Result};
use crate::simulator::MatchResult;
use crate::standings::{format_table, Standing};

/// Render every round: header, one line per match, blank line.
pub fn format_results(rounds: &[Vec<MatchResult>]) -> String {
    let mut out = String::new();
    for (i, round) in rounds.iter().enumerate() {
        out.push_str(&format!("Round {}:\n", i + 1));
        for result in round {
            out.push_str(&result.to_string());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn write_results<W: Write>(rounds: &[Vec<MatchResult>], mut writer: W) -> Result<()> {
    writer.write_all(format_results(rounds).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write one `Round {i}.txt` table file per round into `dir`, creating it if
/// needed. Returns the paths written.
pub fn write_round_tables(dir: &Path, tables: &[Vec<Standing>]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(tables.len());
    for (i, table) in tables.iter().enumerate() {
        let path = dir.join(format!("Round {}.txt", i + 1));
        fs::write(&path, format_table(table))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Parse text produced by [`format_results`].
///
/// Rounds must be numbered from 1 without gaps.
///
/// # Errors
/// `DataFormat` with the 1-based line number of the first bad line.
pub fn parse_results(text: &str) -> Result<Vec<Vec<MatchResult>>> {
    let mut rounds: Vec<Vec<MatchResult>> = Vec::new();
    let mut current: Option<Vec<MatchResult>> = None;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;

        if line.trim().is_empty() {
            if let Some(round) = current.take() {
                rounds.push(round);
            }
            continue;
        }

        match current.as_mut() {
            Some(round) => round.push(parse_match_line(line, line_no)?),
            None => {
                let expected = rounds.len() + 1;
                let number = parse_round_header(line, line_no)?;
                if number != expected {
                    return Err(LeagueError::data_format(
                        line_no,
                        format!("expected round {}, found round {}", expected, number),
                    ));
                }
                current = Some(Vec::new());
            }
        }
    }

    // Tolerate a missing trailing blank line
    if let Some(round) = current {
        rounds.push(round);
    }
    Ok(rounds)
}

fn parse_round_header(line: &str, line_no: usize) -> Result<usize> {
    line.trim()
        .strip_prefix("Round ")
        .and_then(|rest| rest.strip_suffix(':'))
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| LeagueError::data_format(line_no, format!("expected 'Round <n>:', found '{}'", line)))
}

/// Parse a `"{home} {hg} - {ag} {away}"` line.
pub fn parse_match_line(line: &str, line_no: usize) -> Result<MatchResult> {
    for (pos, sep) in line.match_indices(" - ") {
        let left = &line[..pos];
        let right = &line[pos + sep.len()..];

        let Some((home, home_goals)) = left.rsplit_once(' ') else {
            continue;
        };
        let Some((away_goals, away)) = right.split_once(' ') else {
            continue;
        };

        if let (Ok(home_goals), Ok(away_goals)) = (home_goals.parse::<u32>(), away_goals.parse::<u32>()) {
            if home.is_empty() || away.is_empty() {
                return Err(LeagueError::data_format(line_no, "missing team name"));
            }
            if home == away {
                return Err(LeagueError::data_format(line_no, format!("{} plays itself", home)));
            }
            return Ok(MatchResult::new(home, home_goals, away_goals, away));
        }
    }

    Err(LeagueError::data_format(
        line_no,
        format!("expected '<home> <goals> - <goals> <away>', found '{}'", line),
    ))
}
