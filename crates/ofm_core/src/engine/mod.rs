pub mod clock;
pub mod events;
pub mod simulation;

pub use clock::{LiveGame, MatchMinute};
pub use events::{
    EventGenerator, EventType, PitchPosition, Possession, SimulationEvent, TickContext,
    TickOutcome,
};
pub use simulation::SimulationEngine;
