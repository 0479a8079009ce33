//! Match event model and the per-tick event generator contract.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::clock::MatchMinute;

/// Which side currently controls the ball.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Possession {
    HomeTeam,
    AwayTeam,
}

impl Possession {
    pub fn other(&self) -> Possession {
        match self {
            Possession::HomeTeam => Possession::AwayTeam,
            Possession::AwayTeam => Possession::HomeTeam,
        }
    }
}

/// Coarse discretized location of play, always seen from the side in
/// possession: `Def*` zones are in front of their own goal, `Off*` zones in
/// front of the opponent's.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PitchPosition {
    DefBox,
    DefLeft,
    DefCenter,
    DefRight,
    MidLeft,
    MidCenter,
    MidRight,
    OffLeft,
    OffCenter,
    OffRight,
    OffBox,
}

impl Default for PitchPosition {
    /// Kick-offs restart from the center spot.
    fn default() -> Self {
        PitchPosition::MidCenter
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    KickOff,
    Goal,
    Shot,
    Save,
    Pass,
    Foul,
    YellowCard,
    RedCard,
    Substitution,
    Injury,
    Corner,
    FreeKick,
    Penalty,
    Offside,
    HalfTime,
    FullTime,
}

/// One discrete match occurrence, appended to the engine's event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationEvent {
    pub minute: MatchMinute,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Side in possession when the event happened.
    pub side: Possession,
    pub pitch_position: PitchPosition,
    /// Primary actor, if the event names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Uuid>,
    /// Secondary actor (pass receiver, fouled player, ...), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<Uuid>,
}

/// Everything a generator may look at for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub minute: MatchMinute,
    pub possession: Possession,
    pub pitch_position: PitchPosition,
    pub home_score: u8,
    pub away_score: u8,
}

/// What a generated event does to the match state. `scored` credits the
/// side that was in possession when the tick started.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub event: SimulationEvent,
    pub possession: Possession,
    pub pitch_position: PitchPosition,
    pub scored: bool,
}

/// Per-tick event source plugged into the simulation engine.
///
/// Implementations resolve at most one discrete event per 0.1-minute tick
/// from the current minute, possession and pitch position; `None` means the
/// tick passes without incident. The engine applies the outcome (score,
/// possession, pitch position) and logs the event — a generator never
/// touches team state directly. How an implementation weighs its
/// probabilities is its own business.
pub trait EventGenerator {
    fn generate(&mut self, context: &TickContext, rng: &mut StdRng) -> Option<TickOutcome>;
}
