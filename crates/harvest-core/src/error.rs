//! Command rejection taxonomy.
//!
//! Nothing here is fatal: a rejected command leaves the state untouched and
//! the simulation keeps running.

use harvest_events::Phase;
use thiserror::Error;

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("invalid command: {0}")]
    InvalidCommand(#[from] InvalidCommand),
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: i64, available: i64 },
}

/// Reasons a command is not valid in the current state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCommand {
    #[error("not allowed during the {0:?} phase")]
    WrongPhase(Phase),
    #[error("already acted today")]
    AlreadyActed,
    #[error("participant has been expelled")]
    Expelled,
    #[error("participant is insolvent")]
    Insolvent,
    #[error("a blocking event must be resolved first")]
    BlockedByEvent,
    #[error("no open event with id {0}")]
    NoSuchEvent(String),
    #[error("response does not apply to this event")]
    UnsupportedResponse,
    #[error("reputation rank too low")]
    NotAuthorized,
    #[error("unsupported speed {0}")]
    UnsupportedSpeed(f64),
    #[error("population {requested} is below the minimum of {minimum}")]
    PopulationTooSmall { requested: usize, minimum: usize },
    #[error("an expropriation was already decreed today")]
    AlreadyDecreed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_command_converts() {
        let err: CommandError = InvalidCommand::AlreadyActed.into();
        assert_eq!(err.to_string(), "invalid command: already acted today");
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = CommandError::InsufficientFunds {
            needed: 50,
            available: 12,
        };
        assert_eq!(err.to_string(), "insufficient funds: needed 50, available 12");
    }
}
