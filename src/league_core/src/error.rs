use thiserror::Error;

/// Errors raised while building or replaying a season.
///
/// None of these are transient: a season run that hits one is abandoned.
#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed data at line {line}: {reason}")]
    DataFormat { line: usize, reason: String },

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LeagueError {
    pub(crate) fn data_format(line: usize, reason: impl Into<String>) -> Self {
        LeagueError::DataFormat {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
