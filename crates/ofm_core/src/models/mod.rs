pub mod player;
pub mod team;

pub use player::{Player, PlayerSlot, Position, PositionRatings};
pub use team::{Team, TeamSimulation, TeamStats};
