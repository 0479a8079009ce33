use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::player::{Player, PlayerSlot};
use crate::tactics::formation::Formation;

/// Club identity. Immutable once created; live match state belongs to
/// [`TeamSimulation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub roster: Vec<Arc<Player>>,
    pub stadium: String,
    pub is_players_team: bool,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        roster: Vec<Arc<Player>>,
        stadium: impl Into<String>,
        is_players_team: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            roster,
            stadium: stadium.into(),
            is_players_team,
        }
    }
}

/// Aggregate match statistics for one side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    pub shots: u8,
    pub fouls: u8,
    pub goals: u8,
    pub own_goals: u8,
    pub penalties: u8,
    pub injuries: u8,
    pub yellow_cards: u8,
    pub red_cards: u8,
    pub avg_rating: f32,
    pub possession: f32,
}

/// One side of a live match: the club, its formation with the active
/// eleven and bench, possession flag and score.
///
/// The formation is the single source of truth for who is on the pitch;
/// the player accessors here delegate to it.
#[derive(Debug)]
pub struct TeamSimulation {
    pub team: Team,
    pub formation: Formation,
    pub in_possession: bool,
    pub score: u8,
    pub stats: TeamStats,
}

impl TeamSimulation {
    pub fn new(team: Team, formation: Formation) -> Self {
        Self {
            team,
            formation,
            in_possession: false,
            score: 0,
            stats: TeamStats::default(),
        }
    }

    /// Active players in slot order: keeper, defenders, midfielders,
    /// forwards.
    pub fn players(&self) -> Vec<&PlayerSlot> {
        self.formation.players()
    }

    pub fn bench(&self) -> &[PlayerSlot] {
        self.formation.bench()
    }

    /// Remove an active player after an injury or a dismissal. No bench
    /// player is promoted: the side plays short-handed until the command
    /// layer issues an explicit substitution.
    pub fn remove_player(&mut self, id: Uuid) -> Result<PlayerSlot> {
        let slot = self.formation.remove_player(id)?;
        log::info!(
            "{} lose {} ({})",
            self.team.name,
            slot.player.name,
            slot.current_position
        );
        Ok(slot)
    }

    pub fn score_goal(&mut self) {
        self.score += 1;
        self.stats.goals += 1;
    }

    /// Mean rating of the active players in their current positions.
    pub fn average_rating(&self) -> f32 {
        let players = self.players();
        if players.is_empty() {
            return 0.0;
        }
        let sum: u32 = players.iter().map(|slot| slot.rating() as u32).sum();
        sum as f32 / players.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{Position, PositionRatings};

    fn squad_of(count: usize) -> Vec<Arc<Player>> {
        // One keeper, then a spread of outfielders.
        (0..count)
            .map(|i| {
                let best = match i {
                    0 => Position::Gk,
                    n if n <= 4 => Position::Df,
                    n if n <= 8 => Position::Mf,
                    _ => Position::Fw,
                };
                Arc::new(Player::new(
                    format!("Player {}", i + 1),
                    best,
                    PositionRatings { gk: 50, df: 60, mf: 62, fw: 64 },
                ))
            })
            .collect()
    }

    #[test]
    fn test_remove_player_leaves_side_short_handed() {
        let roster = squad_of(11);
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();
        let team = Team::new("Test FC", roster, "Test Park", true);
        let mut side = TeamSimulation::new(team, formation);

        let victim = side.players()[5].id();
        let removed = side.remove_player(victim).unwrap();
        assert_eq!(removed.id(), victim);
        assert_eq!(side.players().len(), 10);
        assert!(side.bench().is_empty());
    }

    #[test]
    fn test_score_is_monotonic() {
        let roster = squad_of(11);
        let formation = Formation::new("4-4-2").unwrap();
        let team = Team::new("Test FC", roster, "Test Park", false);
        let mut side = TeamSimulation::new(team, formation);

        side.score_goal();
        side.score_goal();
        assert_eq!(side.score, 2);
        assert_eq!(side.stats.goals, 2);
    }
}
