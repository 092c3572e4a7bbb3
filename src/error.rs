//! Error types shared by the parser, the draw store and the checker

use thiserror::Error;

use crate::slip::Game;

/// Errors raised while parsing a slip, resolving a draw or editing results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Input lines match no known slip layout
    #[error("Malformed slip: {0}")]
    MalformedSlip(String),

    /// Fewer numbers were recognized than the game needs
    #[error("Missing information: {0}")]
    MissingInfo(String),

    /// Free-text compound slip has no unique red/blue separator
    #[error("Zone separator not found (candidates occurring once: {candidates:?})")]
    SeparatorNotFound { candidates: Vec<char> },

    /// Issue text has zero or several digit runs
    #[error("Ambiguous issue number: {0:?}")]
    IssueAmbiguous(String),

    /// Game code token is not recognized
    #[error("Unknown game code: {0:?}")]
    UnknownGame(String),

    /// Network or timeout failure while fetching winning numbers
    #[error("Remote draw service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The draw service has no result for this issue yet
    #[error("No draw data for {game} issue {issue}")]
    NoDrawData { game: Game, issue: String },

    /// A structural edit was refused
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
}

/// Result type for parsing and checking operations
pub type CheckResult<T> = Result<T, CheckError>;

impl CheckError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckError::RemoteUnavailable(_))
    }

    /// Short message suitable for showing to the ticket holder
    pub fn user_message(&self) -> String {
        match self {
            CheckError::MalformedSlip(_)
            | CheckError::MissingInfo(_)
            | CheckError::SeparatorNotFound { .. }
            | CheckError::IssueAmbiguous(_) => {
                "Insufficient recognized information, please retry.".to_string()
            }
            CheckError::RemoteUnavailable(_) => {
                "Network request failed, please check the connection.".to_string()
            }
            CheckError::NoDrawData { issue, .. } => {
                format!("No draw result for issue {}, please confirm the draw has taken place.", issue)
            }
            other => other.to_string(),
        }
    }
}
