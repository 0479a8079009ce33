use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tactical position on the pitch.
///
/// The derived ordering is the bench sort rank: goalkeepers before
/// defenders before midfielders before forwards.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Gk,
    Df,
    Mf,
    Fw,
}

impl Position {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::Gk)
    }

    pub fn is_outfield(&self) -> bool {
        !self.is_goalkeeper()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Position::Gk => "GK",
            Position::Df => "DF",
            Position::Mf => "MF",
            Position::Fw => "FW",
        };
        write!(f, "{}", label)
    }
}

/// Per-position rating table for a roster player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionRatings {
    pub gk: u8,
    pub df: u8,
    pub mf: u8,
    pub fw: u8,
}

impl PositionRatings {
    pub fn rating_for(&self, position: Position) -> u8 {
        match position {
            Position::Gk => self.gk,
            Position::Df => self.df,
            Position::Mf => self.mf,
            Position::Fw => self.fw,
        }
    }
}

/// Static roster entry. Immutable for the duration of a match; all
/// match-time state lives on [`PlayerSlot`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub ratings: PositionRatings,
    pub best_position: Position,
}

impl Player {
    pub fn new(name: impl Into<String>, best_position: Position, ratings: PositionRatings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ratings,
            best_position,
        }
    }

    pub fn rating_for(&self, position: Position) -> u8 {
        self.ratings.rating_for(position)
    }
}

/// Stamina a player starts the match with.
pub const STARTING_STAMINA: f32 = 100.0;

/// Base stamina drain per 0.1-minute tick. Tired legs drain faster, see
/// [`PlayerSlot::apply_fatigue`].
const STAMINA_DECAY_PER_TICK: f32 = 0.05;

/// A roster player placed in a match context: current tactical position
/// plus per-match state. Exactly one slot exists per active or benched
/// player at a time; slots move between the position buckets and the bench,
/// the underlying [`Player`] is shared.
#[derive(Debug, Clone)]
pub struct PlayerSlot {
    pub player: Arc<Player>,
    pub current_position: Position,
    pub stamina: f32,
    pub injured: bool,
    pub subbed: bool,
}

impl PlayerSlot {
    pub fn new(player: Arc<Player>, position: Position) -> Self {
        Self {
            player,
            current_position: position,
            stamina: STARTING_STAMINA,
            injured: false,
            subbed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.player.id
    }

    /// Rating in the position the player currently occupies, which may be
    /// lower than their rating in their intrinsic best position.
    pub fn rating(&self) -> u8 {
        self.player.rating_for(self.current_position)
    }

    /// One tick of stamina drain. The multiplier grows as stamina falls, so
    /// a spent player fades faster than a fresh one.
    pub fn apply_fatigue(&mut self) {
        let rate = STAMINA_DECAY_PER_TICK * (2.0 - self.stamina / STARTING_STAMINA);
        self.stamina = (self.stamina - rate).max(0.0);
    }
}

/// Slot identity is the wrapped player, not the per-match state.
impl PartialEq for PlayerSlot {
    fn eq(&self, other: &Self) -> bool {
        self.player.id == other.player.id
    }
}

/// Normalizes a bare roster entry into a match slot at their intrinsic best
/// position. This is the single wrap point: formation operations accept
/// `impl Into<PlayerSlot>` and never inspect what they were given.
impl From<Arc<Player>> for PlayerSlot {
    fn from(player: Arc<Player>) -> Self {
        let position = player.best_position;
        Self::new(player, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(gk: u8, df: u8, mf: u8, fw: u8) -> PositionRatings {
        PositionRatings { gk, df, mf, fw }
    }

    #[test]
    fn test_position_rank_order() {
        let mut positions = vec![Position::Fw, Position::Gk, Position::Mf, Position::Df];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::Gk, Position::Df, Position::Mf, Position::Fw]
        );
        assert!(Position::Gk.is_goalkeeper());
        assert!(!Position::Gk.is_outfield());
        assert!(Position::Mf.is_outfield());
    }

    #[test]
    fn test_slot_wraps_roster_entry_at_best_position() {
        let player = Arc::new(Player::new("Keane", Position::Mf, ratings(5, 60, 82, 70)));
        let slot = PlayerSlot::from(player.clone());
        assert_eq!(slot.current_position, Position::Mf);
        assert_eq!(slot.rating(), 82);
        assert_eq!(slot.stamina, STARTING_STAMINA);
        assert!(!slot.subbed);
        assert!(!slot.injured);
        assert_eq!(slot.id(), player.id);
    }

    #[test]
    fn test_fatigue_is_monotonic_and_clamped() {
        let player = Arc::new(Player::new("Runner", Position::Fw, ratings(1, 40, 55, 77)));
        let mut slot = PlayerSlot::from(player);
        let mut previous = slot.stamina;
        for _ in 0..5000 {
            slot.apply_fatigue();
            assert!(slot.stamina <= previous);
            previous = slot.stamina;
        }
        assert_eq!(slot.stamina, 0.0);
    }
}
