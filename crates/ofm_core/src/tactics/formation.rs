//! Formation engine: tactical shape, lineup assignment, in-match
//! substitutions and position swaps with rollback history.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FormationError, Result};
use crate::models::player::{Player, PlayerSlot, Position};

/// The eight legal tactical shapes. The code names the outfield split
/// defenders-midfielders-forwards; the keeper is implicit, so every shape
/// fields eleven.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum FormationShape {
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "3-6-1")]
    F361,
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "5-4-1")]
    F541,
    #[serde(rename = "5-3-2")]
    F532,
}

impl FormationShape {
    /// Canonical formation code string (e.g., "4-4-2").
    pub fn code(&self) -> &'static str {
        match self {
            FormationShape::F343 => "3-4-3",
            FormationShape::F352 => "3-5-2",
            FormationShape::F361 => "3-6-1",
            FormationShape::F442 => "4-4-2",
            FormationShape::F433 => "4-3-3",
            FormationShape::F451 => "4-5-1",
            FormationShape::F541 => "5-4-1",
            FormationShape::F532 => "5-3-2",
        }
    }

    /// Returns (defenders, midfielders, forwards). The three counts plus
    /// the keeper total eleven for every shape.
    pub fn slot_counts(&self) -> (u8, u8, u8) {
        match self {
            FormationShape::F343 => (3, 4, 3),
            FormationShape::F352 => (3, 5, 2),
            FormationShape::F361 => (3, 6, 1),
            FormationShape::F442 => (4, 4, 2),
            FormationShape::F433 => (4, 3, 3),
            FormationShape::F451 => (4, 5, 1),
            FormationShape::F541 => (5, 4, 1),
            FormationShape::F532 => (5, 3, 2),
        }
    }

    /// Required position for each of the eleven nominal slot indices:
    /// index 0 is the keeper, then the defender, midfielder and forward
    /// blocks in order. Precomputed here so slot routing is a table lookup
    /// rather than cumulative-count arithmetic.
    pub fn slot_table(&self) -> [Position; 11] {
        let (df, mf, fw) = self.slot_counts();
        let mut table = [Position::Gk; 11];
        let mut index = 1;
        for _ in 0..df {
            table[index] = Position::Df;
            index += 1;
        }
        for _ in 0..mf {
            table[index] = Position::Mf;
            index += 1;
        }
        for _ in 0..fw {
            table[index] = Position::Fw;
            index += 1;
        }
        table
    }
}

impl FromStr for FormationShape {
    type Err = FormationError;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "3-4-3" => Ok(FormationShape::F343),
            "3-5-2" => Ok(FormationShape::F352),
            "3-6-1" => Ok(FormationShape::F361),
            "4-4-2" => Ok(FormationShape::F442),
            "4-3-3" => Ok(FormationShape::F433),
            "4-5-1" => Ok(FormationShape::F451),
            "5-4-1" => Ok(FormationShape::F541),
            "5-3-2" => Ok(FormationShape::F532),
            other => Err(FormationError::InvalidFormation(other.to_string())),
        }
    }
}

impl fmt::Display for FormationShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Immutable copy of a formation's slot state at a point in time. Pushed
/// onto the history stack before a roster mutation so the command layer can
/// roll back.
#[derive(Debug, Clone)]
pub struct FormationSnapshot {
    pub gk: Option<PlayerSlot>,
    pub df: Vec<PlayerSlot>,
    pub mf: Vec<PlayerSlot>,
    pub fw: Vec<PlayerSlot>,
    pub bench: Vec<PlayerSlot>,
}

/// Tactical shape plus slot assignment: one optional keeper, the three
/// outfield buckets sized by the shape, the bench, and the snapshot stack.
#[derive(Debug, Clone)]
pub struct Formation {
    shape: FormationShape,
    gk: Option<PlayerSlot>,
    df: Vec<PlayerSlot>,
    mf: Vec<PlayerSlot>,
    fw: Vec<PlayerSlot>,
    bench: Vec<PlayerSlot>,
    history: Vec<FormationSnapshot>,
}

impl Formation {
    /// Validates the code and starts with empty slots. The initial snapshot
    /// is pushed immediately.
    pub fn new(code: &str) -> Result<Self> {
        let shape = code.parse::<FormationShape>()?;
        let mut formation = Self {
            shape,
            gk: None,
            df: Vec::new(),
            mf: Vec::new(),
            fw: Vec::new(),
            bench: Vec::new(),
            history: Vec::new(),
        };
        formation.save_history();
        Ok(formation)
    }

    pub fn shape(&self) -> FormationShape {
        self.shape
    }

    /// (defenders, midfielders, forwards) for the current shape.
    pub fn slot_counts(&self) -> (u8, u8, u8) {
        self.shape.slot_counts()
    }

    pub fn goalkeeper(&self) -> Option<&PlayerSlot> {
        self.gk.as_ref()
    }

    pub fn defenders(&self) -> &[PlayerSlot] {
        &self.df
    }

    pub fn midfielders(&self) -> &[PlayerSlot] {
        &self.mf
    }

    pub fn forwards(&self) -> &[PlayerSlot] {
        &self.fw
    }

    pub fn bench(&self) -> &[PlayerSlot] {
        &self.bench
    }

    /// Active players in slot order: keeper, defenders, midfielders,
    /// forwards.
    pub fn players(&self) -> Vec<&PlayerSlot> {
        self.gk
            .iter()
            .chain(self.df.iter())
            .chain(self.mf.iter())
            .chain(self.fw.iter())
            .collect()
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut PlayerSlot> {
        self.gk
            .iter_mut()
            .chain(self.df.iter_mut())
            .chain(self.mf.iter_mut())
            .chain(self.fw.iter_mut())
    }

    /// Active players followed by the bench.
    pub fn all_players(&self) -> Vec<&PlayerSlot> {
        let mut all = self.players();
        all.extend(self.bench.iter());
        all
    }

    /// Fill the eleven slots from `roster`, best eligible player first.
    ///
    /// For each slot the candidates are the still-unassigned roster members
    /// whose intrinsic best position matches the slot; the highest rating in
    /// that position wins, ties going to the earlier roster entry. The
    /// leftover roster becomes the bench, each player keeping their own best
    /// position, ordered keeper first.
    ///
    /// Expects a freshly constructed formation with empty slots.
    pub fn assign_best_lineup(&mut self, roster: &[Arc<Player>]) -> Result<()> {
        let table = self.shape.slot_table();
        let mut remaining: Vec<Arc<Player>> = roster.to_vec();

        for (index, &position) in table.iter().enumerate() {
            let pick = Self::best_candidate(&remaining, position)?;
            let player = remaining.remove(pick);
            self.add_player(index, PlayerSlot::new(player, position));
        }

        self.bench = remaining.into_iter().map(PlayerSlot::from).collect();
        self.bench.sort_by_key(|slot| slot.current_position);
        Ok(())
    }

    /// Index of the best `position` candidate in `remaining`: the highest
    /// rating for that position among players whose best position matches,
    /// earliest entry winning ties.
    fn best_candidate(remaining: &[Arc<Player>], position: Position) -> Result<usize> {
        let mut best: Option<(usize, u8)> = None;
        for (index, player) in remaining.iter().enumerate() {
            if player.best_position != position {
                continue;
            }
            let rating = player.rating_for(position);
            match best {
                Some((_, top)) if rating <= top => {}
                _ => best = Some((index, rating)),
            }
        }
        best.map(|(index, _)| index)
            .ok_or(FormationError::NoEligiblePlayer(position))
    }

    /// Place a player by slot index. The index is a request, not a
    /// guarantee: index 0 always takes the keeper slot, an outfield index
    /// lands in its block's bucket if that bucket still has room, and
    /// anything else (full bucket, index past ten) overflows to the bench
    /// with the player's own best position.
    pub fn add_player(&mut self, index: usize, player: impl Into<PlayerSlot>) {
        let mut slot = player.into();
        let (df_cap, mf_cap, fw_cap) = self.shape.slot_counts();
        let required = if index < 11 {
            Some(self.shape.slot_table()[index])
        } else {
            None
        };

        match required {
            Some(Position::Gk) => {
                slot.current_position = Position::Gk;
                self.gk = Some(slot);
            }
            Some(Position::Df) if self.df.len() < df_cap as usize => {
                slot.current_position = Position::Df;
                self.df.push(slot);
            }
            Some(Position::Mf) if self.mf.len() < mf_cap as usize => {
                slot.current_position = Position::Mf;
                self.mf.push(slot);
            }
            Some(Position::Fw) if self.fw.len() < fw_cap as usize => {
                slot.current_position = Position::Fw;
                self.fw.push(slot);
            }
            _ => {
                slot.current_position = slot.player.best_position;
                self.bench.push(slot);
            }
        }
    }

    /// Switch to a new shape, replaying the current active players through
    /// [`Formation::add_player`] in their existing order: keeper first, then
    /// defenders, midfielders, forwards. Slot order is preserved, positional
    /// fitness is not — under a different split a player can land in a
    /// bucket that does not match their position. Callers that care should
    /// follow up with explicit [`Formation::move_player`] swaps.
    pub fn change_formation(&mut self, code: &str) -> Result<()> {
        let shape = code.parse::<FormationShape>()?;
        self.shape = shape;

        let mut players: Vec<PlayerSlot> = Vec::new();
        if let Some(keeper) = self.gk.take() {
            players.push(keeper);
        }
        players.append(&mut self.df);
        players.append(&mut self.mf);
        players.append(&mut self.fw);

        for (index, slot) in players.into_iter().enumerate() {
            self.add_player(index, slot);
        }
        log::debug!("formation changed to {}", shape);
        Ok(())
    }

    /// Swap `player_out` (active) for `player_in` (benched). The incoming
    /// player inherits the outgoing player's position; the outgoing player
    /// is flagged as substituted and joins the bench. A snapshot is pushed
    /// before the swap.
    pub fn substitute_player(&mut self, out_id: Uuid, in_id: Uuid) -> Result<()> {
        let bench_index = self
            .bench
            .iter()
            .position(|slot| slot.id() == in_id)
            .ok_or(FormationError::PlayerNotFound(in_id))?;
        let out_position = self
            .players()
            .into_iter()
            .find(|slot| slot.id() == out_id)
            .map(|slot| slot.current_position)
            .ok_or(FormationError::PlayerNotFound(out_id))?;
        // The recorded position must resolve to the bucket actually holding
        // the player; a mismatch means the slot state is inconsistent.
        let out_index = self
            .bucket_index(out_position, out_id)
            .ok_or(FormationError::PositionMismatch {
                id: out_id,
                position: out_position,
            })?;

        self.save_history();

        let mut incoming = self.bench.remove(bench_index);
        incoming.current_position = out_position;
        let incoming_name = incoming.player.name.clone();
        let mut outgoing = match self.replace_at(out_position, out_index, incoming) {
            Some(slot) => slot,
            None => {
                return Err(FormationError::PositionMismatch {
                    id: out_id,
                    position: out_position,
                })
            }
        };
        outgoing.subbed = true;
        log::info!(
            "substitution: {} off, {} on at {}",
            outgoing.player.name,
            incoming_name,
            out_position
        );
        self.bench.push(outgoing);
        Ok(())
    }

    /// Tactical swap of two active players: bucket membership and position
    /// labels are exchanged symmetrically. Not a substitution — nobody
    /// leaves the pitch. A snapshot is pushed before the swap.
    pub fn move_player(&mut self, a_id: Uuid, b_id: Uuid) -> Result<()> {
        let a_location = self.locate_active(a_id)?;
        let b_location = self.locate_active(b_id)?;

        self.save_history();

        let mut a_slot = match self.slot_at(a_location) {
            Some(slot) => slot.clone(),
            None => {
                return Err(FormationError::PositionMismatch {
                    id: a_id,
                    position: a_location.0,
                })
            }
        };
        let mut b_slot = match self.slot_at(b_location) {
            Some(slot) => slot.clone(),
            None => {
                return Err(FormationError::PositionMismatch {
                    id: b_id,
                    position: b_location.0,
                })
            }
        };

        a_slot.current_position = b_location.0;
        b_slot.current_position = a_location.0;
        let _ = self.replace_at(b_location.0, b_location.1, a_slot);
        let _ = self.replace_at(a_location.0, a_location.1, b_slot);
        Ok(())
    }

    /// Remove an active player outright (injury, dismissal). The bucket
    /// shrinks; no bench player is promoted. A snapshot is pushed first.
    pub fn remove_player(&mut self, id: Uuid) -> Result<PlayerSlot> {
        let location = self.locate_active(id)?;
        self.save_history();
        let slot = match location {
            (Position::Gk, _) => match self.gk.take() {
                Some(slot) => slot,
                None => return Err(FormationError::PlayerNotFound(id)),
            },
            (Position::Df, index) => self.df.remove(index),
            (Position::Mf, index) => self.mf.remove(index),
            (Position::Fw, index) => self.fw.remove(index),
        };
        Ok(slot)
    }

    /// Overwrite the live slot state with a snapshot, verbatim. Trusted
    /// internal operation: the snapshot came from this formation's own
    /// history.
    pub fn restore(&mut self, snapshot: FormationSnapshot) {
        self.gk = snapshot.gk;
        self.df = snapshot.df;
        self.mf = snapshot.mf;
        self.fw = snapshot.fw;
        self.bench = snapshot.bench;
    }

    /// Pop the most recent snapshot, if any. Pair with
    /// [`Formation::restore`] to undo the last mutation.
    pub fn pop_snapshot(&mut self) -> Option<FormationSnapshot> {
        self.history.pop()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Discard the snapshot stack. Called at match end, or whenever
    /// rollback is no longer wanted.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn save_history(&mut self) {
        self.history.push(FormationSnapshot {
            gk: self.gk.clone(),
            df: self.df.clone(),
            mf: self.mf.clone(),
            fw: self.fw.clone(),
            bench: self.bench.clone(),
        });
    }

    /// Locate an active player, or report why they cannot be moved:
    /// unknown players and benched players are not in any bucket.
    fn locate_active(&self, id: Uuid) -> Result<(Position, usize)> {
        if let Some(keeper) = &self.gk {
            if keeper.id() == id {
                return Ok((Position::Gk, 0));
            }
        }
        if let Some(index) = self.df.iter().position(|slot| slot.id() == id) {
            return Ok((Position::Df, index));
        }
        if let Some(index) = self.mf.iter().position(|slot| slot.id() == id) {
            return Ok((Position::Mf, index));
        }
        if let Some(index) = self.fw.iter().position(|slot| slot.id() == id) {
            return Ok((Position::Fw, index));
        }
        Err(FormationError::PlayerNotFound(id))
    }

    /// Index of `id` within the bucket `position` points at, if the bucket
    /// really holds that player.
    fn bucket_index(&self, position: Position, id: Uuid) -> Option<usize> {
        match position {
            Position::Gk => {
                let keeper = self.gk.as_ref()?;
                (keeper.id() == id).then_some(0)
            }
            Position::Df => self.df.iter().position(|slot| slot.id() == id),
            Position::Mf => self.mf.iter().position(|slot| slot.id() == id),
            Position::Fw => self.fw.iter().position(|slot| slot.id() == id),
        }
    }

    fn slot_at(&self, location: (Position, usize)) -> Option<&PlayerSlot> {
        match location {
            (Position::Gk, _) => self.gk.as_ref(),
            (Position::Df, index) => self.df.get(index),
            (Position::Mf, index) => self.mf.get(index),
            (Position::Fw, index) => self.fw.get(index),
        }
    }

    fn replace_at(
        &mut self,
        position: Position,
        index: usize,
        slot: PlayerSlot,
    ) -> Option<PlayerSlot> {
        match position {
            Position::Gk => self.gk.replace(slot),
            Position::Df => Some(std::mem::replace(&mut self.df[index], slot)),
            Position::Mf => Some(std::mem::replace(&mut self.mf[index], slot)),
            Position::Fw => Some(std::mem::replace(&mut self.fw[index], slot)),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::PositionRatings;
    use strum::IntoEnumIterator;

    fn make_player(name: &str, best: Position, rating: u8) -> Arc<Player> {
        // The best-position rating is `rating`; everything else trails it.
        let low = rating.saturating_sub(20);
        let ratings = match best {
            Position::Gk => PositionRatings { gk: rating, df: low, mf: low, fw: low },
            Position::Df => PositionRatings { gk: 1, df: rating, mf: low, fw: low },
            Position::Mf => PositionRatings { gk: 1, df: low, mf: rating, fw: low },
            Position::Fw => PositionRatings { gk: 1, df: low, mf: low, fw: rating },
        };
        Arc::new(Player::new(name, best, ratings))
    }

    /// 16 players: 2 GK, 5 DF, 5 MF, 4 FW with distinct ratings.
    fn sixteen_player_roster() -> Vec<Arc<Player>> {
        vec![
            make_player("Keeper A", Position::Gk, 80),
            make_player("Keeper B", Position::Gk, 70),
            make_player("Back A", Position::Df, 85),
            make_player("Back B", Position::Df, 83),
            make_player("Back C", Position::Df, 81),
            make_player("Back D", Position::Df, 79),
            make_player("Back E", Position::Df, 77),
            make_player("Mid A", Position::Mf, 86),
            make_player("Mid B", Position::Mf, 84),
            make_player("Mid C", Position::Mf, 82),
            make_player("Mid D", Position::Mf, 80),
            make_player("Mid E", Position::Mf, 78),
            make_player("Striker A", Position::Fw, 88),
            make_player("Striker B", Position::Fw, 86),
            make_player("Striker C", Position::Fw, 84),
            make_player("Striker D", Position::Fw, 82),
        ]
    }

    #[test]
    fn test_invalid_formation() {
        assert!(matches!(
            Formation::new("4-4-3"),
            Err(FormationError::InvalidFormation(_))
        ));
        assert!(Formation::new("").is_err());
        assert!(Formation::new("4-4-2-0").is_err());
    }

    #[test]
    fn test_all_shapes_parse_and_total_eleven() {
        for shape in FormationShape::iter() {
            let parsed: FormationShape = shape.code().parse().unwrap();
            assert_eq!(parsed, shape);
            // The serde rename is the same string as the parse code.
            assert_eq!(
                serde_json::to_value(shape).unwrap(),
                serde_json::Value::String(shape.code().to_string())
            );
            let (df, mf, fw) = shape.slot_counts();
            assert_eq!(df + mf + fw + 1, 11, "shape {}", shape);

            let table = shape.slot_table();
            assert_eq!(table[0], Position::Gk);
            let defenders = table.iter().filter(|p| **p == Position::Df).count();
            let midfielders = table.iter().filter(|p| **p == Position::Mf).count();
            let forwards = table.iter().filter(|p| **p == Position::Fw).count();
            assert_eq!(
                (defenders, midfielders, forwards),
                (df as usize, mf as usize, fw as usize)
            );
        }
    }

    #[test]
    fn test_get_slot_counts() {
        let formation = Formation::new("4-3-3").unwrap();
        assert_eq!(formation.slot_counts(), (4, 3, 3));
    }

    #[test]
    fn test_add_gk_to_formation() {
        let mut formation = Formation::new("4-4-2").unwrap();
        // An outfielder dropped at index 0 still goes in goal.
        let player = make_player("Stopgap", Position::Df, 70);
        formation.add_player(0, PlayerSlot::from(player.clone()));
        let keeper = formation.goalkeeper().unwrap();
        assert_eq!(keeper.id(), player.id);
        assert_eq!(keeper.current_position, Position::Gk);
    }

    #[test]
    fn test_add_df_to_formation() {
        let mut formation = Formation::new("4-4-2").unwrap();
        for i in 0..4 {
            let player = make_player(&format!("Back {}", i), Position::Df, 70);
            formation.add_player(i + 1, PlayerSlot::from(player.clone()));
            assert_eq!(formation.defenders()[i].id(), player.id);
            assert_eq!(formation.defenders()[i].current_position, Position::Df);
        }
    }

    #[test]
    fn test_add_mf_to_formation() {
        let mut formation = Formation::new("4-4-2").unwrap();
        for i in 0..4 {
            let player = make_player(&format!("Mid {}", i), Position::Mf, 70);
            formation.add_player(i + 5, PlayerSlot::from(player.clone()));
            assert_eq!(formation.midfielders()[i].id(), player.id);
            assert_eq!(formation.midfielders()[i].current_position, Position::Mf);
        }
    }

    #[test]
    fn test_add_fw_to_formation() {
        let mut formation = Formation::new("4-4-2").unwrap();
        for i in 0..2 {
            let player = make_player(&format!("Striker {}", i), Position::Fw, 70);
            formation.add_player(i + 9, PlayerSlot::from(player.clone()));
            assert_eq!(formation.forwards()[i].id(), player.id);
            assert_eq!(formation.forwards()[i].current_position, Position::Fw);
        }
    }

    #[test]
    fn test_full_bucket_overflows_to_bench_with_own_position() {
        let mut formation = Formation::new("4-4-2").unwrap();
        for i in 0..2 {
            formation.add_player(
                i + 9,
                PlayerSlot::from(make_player(&format!("Striker {}", i), Position::Fw, 70)),
            );
        }
        // Third striker aimed at a forward index: the bucket is full.
        let extra = make_player("Late Striker", Position::Fw, 60);
        formation.add_player(9, PlayerSlot::from(extra.clone()));
        assert_eq!(formation.forwards().len(), 2);
        assert_eq!(formation.bench().len(), 1);
        assert_eq!(formation.bench()[0].id(), extra.id);
        assert_eq!(formation.bench()[0].current_position, Position::Fw);

        // Out-of-range index goes straight to the bench too.
        let spare = make_player("Spare Back", Position::Df, 55);
        formation.add_player(11, PlayerSlot::from(spare.clone()));
        assert_eq!(formation.bench().len(), 2);
        assert_eq!(formation.bench()[1].current_position, Position::Df);
    }

    #[test]
    fn test_assign_best_lineup_fills_by_rating() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();

        assert_eq!(formation.goalkeeper().unwrap().player.name, "Keeper A");
        let backs: Vec<_> = formation
            .defenders()
            .iter()
            .map(|s| s.player.name.as_str())
            .collect();
        assert_eq!(backs, vec!["Back A", "Back B", "Back C", "Back D"]);
        let mids: Vec<_> = formation
            .midfielders()
            .iter()
            .map(|s| s.player.name.as_str())
            .collect();
        assert_eq!(mids, vec!["Mid A", "Mid B", "Mid C", "Mid D"]);
        let strikers: Vec<_> = formation
            .forwards()
            .iter()
            .map(|s| s.player.name.as_str())
            .collect();
        assert_eq!(strikers, vec!["Striker A", "Striker B"]);

        // Bench: the remaining five, keeper first, sorted by position rank.
        let bench: Vec<_> = formation
            .bench()
            .iter()
            .map(|s| s.player.name.as_str())
            .collect();
        assert_eq!(
            bench,
            vec!["Keeper B", "Back E", "Mid E", "Striker C", "Striker D"]
        );
        for slot in formation.bench() {
            assert_eq!(slot.current_position, slot.player.best_position);
        }
    }

    #[test]
    fn test_assign_best_lineup_never_duplicates_players() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-3-3").unwrap();
        formation.assign_best_lineup(&roster).unwrap();

        let mut seen = std::collections::HashSet::new();
        for slot in formation.all_players() {
            assert!(seen.insert(slot.id()), "{} appears twice", slot.player.name);
        }
        assert_eq!(seen.len(), roster.len());
        assert_eq!(formation.players().len(), 11);
        assert_eq!(formation.bench().len(), 5);
    }

    #[test]
    fn test_assign_best_lineup_breaks_ties_by_roster_order() {
        let mut roster = vec![
            make_player("Keeper", Position::Gk, 70),
            make_player("First Equal", Position::Df, 75),
            make_player("Second Equal", Position::Df, 75),
            make_player("Third Back", Position::Df, 74),
        ];
        roster.extend((0..4).map(|i| make_player(&format!("Mid {}", i), Position::Mf, 70)));
        roster.extend((0..2).map(|i| make_player(&format!("Fw {}", i), Position::Fw, 70)));
        roster.push(make_player("Fourth Back", Position::Df, 60));

        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();
        assert_eq!(formation.defenders()[0].player.name, "First Equal");
        assert_eq!(formation.defenders()[1].player.name, "Second Equal");
    }

    #[test]
    fn test_assign_best_lineup_fails_on_short_roster() {
        // No goalkeeper at all.
        let roster: Vec<_> = (0..11)
            .map(|i| make_player(&format!("Outfielder {}", i), Position::Mf, 70))
            .collect();
        let mut formation = Formation::new("4-4-2").unwrap();
        assert!(matches!(
            formation.assign_best_lineup(&roster),
            Err(FormationError::NoEligiblePlayer(Position::Gk))
        ));
    }

    #[test]
    fn test_change_formation_reassigns_by_slot_order() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();

        formation.change_formation("3-5-2").unwrap();
        assert_eq!(formation.shape(), FormationShape::F352);
        assert_eq!(formation.defenders().len(), 3);
        assert_eq!(formation.midfielders().len(), 5);
        assert_eq!(formation.forwards().len(), 2);
        assert_eq!(formation.players().len(), 11);

        // Order-driven replay: the old fourth defender now opens the
        // midfield block, whatever their intrinsic position.
        assert_eq!(formation.midfielders()[0].player.name, "Back D");
        assert_eq!(formation.midfielders()[0].current_position, Position::Mf);

        assert!(formation.change_formation("2-4-4").is_err());
    }

    #[test]
    fn test_substitute_player() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();
        let history_before = formation.history_len();

        let out_id = formation.midfielders()[1].id();
        let in_id = formation.bench()[2].id(); // Mid E
        formation.substitute_player(out_id, in_id).unwrap();

        assert_eq!(formation.history_len(), history_before + 1);
        let replacement = &formation.midfielders()[1];
        assert_eq!(replacement.id(), in_id);
        assert_eq!(replacement.current_position, Position::Mf);
        assert!(!formation.bench().iter().any(|slot| slot.id() == in_id));
        let benched = formation
            .bench()
            .iter()
            .find(|slot| slot.id() == out_id)
            .unwrap();
        assert!(benched.subbed);
        assert_eq!(formation.players().len(), 11);
        assert_eq!(formation.all_players().len(), 16);
    }

    #[test]
    fn test_substitute_rejects_strangers() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();
        let history_before = formation.history_len();

        let stranger = make_player("Stranger", Position::Mf, 90);
        let out_id = formation.midfielders()[0].id();
        assert!(matches!(
            formation.substitute_player(out_id, stranger.id),
            Err(FormationError::PlayerNotFound(_))
        ));
        // Two active players cannot be "substituted" either.
        let other_active = formation.forwards()[0].id();
        assert!(formation.substitute_player(out_id, other_active).is_err());
        // Failed attempts push no snapshot.
        assert_eq!(formation.history_len(), history_before);
    }

    #[test]
    fn test_move_player_swaps_positions_symmetrically() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();
        let history_before = formation.history_len();

        let back_id = formation.defenders()[0].id();
        let striker_id = formation.forwards()[1].id();
        formation.move_player(back_id, striker_id).unwrap();

        assert_eq!(formation.history_len(), history_before + 1);
        assert_eq!(formation.defenders()[0].id(), striker_id);
        assert_eq!(formation.defenders()[0].current_position, Position::Df);
        assert_eq!(formation.forwards()[1].id(), back_id);
        assert_eq!(formation.forwards()[1].current_position, Position::Fw);

        // Benched players are in no bucket and cannot be swapped.
        let benched_id = formation.bench()[0].id();
        assert!(matches!(
            formation.move_player(back_id, benched_id),
            Err(FormationError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn test_restore_round_trips_snapshot_state() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();

        let starters: Vec<Uuid> = formation.players().iter().map(|s| s.id()).collect();
        let bench: Vec<Uuid> = formation.bench().iter().map(|s| s.id()).collect();

        let out_id = formation.forwards()[0].id();
        let in_id = formation.bench()[3].id();
        formation.substitute_player(out_id, in_id).unwrap();
        assert_ne!(
            formation.players().iter().map(|s| s.id()).collect::<Vec<_>>(),
            starters
        );

        let snapshot = formation.pop_snapshot().unwrap();
        formation.restore(snapshot);
        assert_eq!(
            formation.players().iter().map(|s| s.id()).collect::<Vec<_>>(),
            starters
        );
        assert_eq!(
            formation.bench().iter().map(|s| s.id()).collect::<Vec<_>>(),
            bench
        );
    }

    #[test]
    fn test_clear_history() {
        let roster = sixteen_player_roster();
        let mut formation = Formation::new("4-4-2").unwrap();
        formation.assign_best_lineup(&roster).unwrap();
        formation
            .substitute_player(formation.defenders()[0].id(), formation.bench()[1].id())
            .unwrap();
        assert!(formation.history_len() > 0);
        formation.clear_history();
        assert_eq!(formation.history_len(), 0);
        assert!(formation.pop_snapshot().is_none());
    }
}
