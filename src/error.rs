//! Contract errors raised by the game model, the statistics store and configuration.

use crate::engine::{Action, StateId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid action {0:?}, expected \"hit\" or \"stick\"")]
    InvalidAction(String),
    #[error("state {0} was never visited")]
    UnknownState(StateId),
    #[error("action {action} was never taken from state {state}")]
    ZeroVisitUpdate { state: StateId, action: Action },
    #[error("state {0} is terminal, no further actions are allowed")]
    TerminalState(StateId),
    #[error("malformed state identity {0:?}, expected \"<dealer> <player>\"")]
    InvalidStateId(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
