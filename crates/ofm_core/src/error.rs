use thiserror::Error;
use uuid::Uuid;

use crate::models::player::Position;

/// Errors raised by the formation engine.
///
/// Every variant is unrecoverable at the call site: the operation has not
/// been applied (or, for lineup assignment, the formation is left partially
/// filled) and the caller decides whether to report or roll back.
#[derive(Error, Debug)]
pub enum FormationError {
    #[error("invalid formation code: {0}")]
    InvalidFormation(String),

    #[error("player {0} is not part of the matchday squad")]
    PlayerNotFound(Uuid),

    #[error("no eligible player left for a {0} slot")]
    NoEligiblePlayer(Position),

    #[error("player {id} is not in the {position} slot group")]
    PositionMismatch { id: Uuid, position: Position },
}

pub type Result<T> = std::result::Result<T, FormationError>;
