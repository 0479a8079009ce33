//! # ofm_core - Football Lineup and Live-Match Simulation Core
//!
//! Deterministic core for a football management game: a formation engine
//! that assigns a roster to eleven tactical slots and applies in-match
//! substitutions and swaps with rollback history, plus a fixed-point match
//! clock that advances play in 0.1-minute ticks and hands each tick to a
//! pluggable event generator.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Snapshot history for every roster mutation (command-undo)
//! - No global state: time, precision and rng are all per-match
//! - Event generation behind a trait; the core ships no probability model

pub mod engine;
pub mod error;
pub mod models;
pub mod tactics;

pub use engine::clock::{LiveGame, MatchMinute};
pub use engine::events::{
    EventGenerator, EventType, PitchPosition, Possession, SimulationEvent, TickContext,
    TickOutcome,
};
pub use engine::simulation::SimulationEngine;
pub use error::{FormationError, Result};
pub use models::player::{Player, PlayerSlot, Position, PositionRatings, STARTING_STAMINA};
pub use models::team::{Team, TeamSimulation, TeamStats};
pub use tactics::formation::{Formation, FormationShape, FormationSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
