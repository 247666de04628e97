/// Share of the weakest rating used as the +/- spread on a match's base goals
pub const VARIANCE_PROPORTION: f64 = 0.5;

/// Relative spread between base goals and realized goals (0.9 = +/-90%)
pub const GOAL_SPREAD: f64 = 0.9;

/// Per-round multiplicative drift applied to every rating (0.1 = +/-10%)
pub const DRIFT_PROPORTION: f64 = 0.1;

/// Share of the weakest per-match average used as noise when deriving ratings
/// from a season's goal totals
pub const STRENGTH_NOISE_PROPORTION: f64 = 0.5;

/// League points for a win
pub const POINTS_PER_WIN: u32 = 3;

/// League points for a draw
pub const POINTS_PER_DRAW: u32 = 1;

/// Width of the team name column in persisted tables
pub const NAME_COLUMN_WIDTH: usize = 20;

/// Width of every numeric column in persisted tables
pub const STAT_COLUMN_WIDTH: usize = 6;

/// Number of rounds in a double round-robin for `n_teams` teams
pub fn double_round_robin_rounds(n_teams: usize) -> usize {
    2 * n_teams.saturating_sub(1)
}
