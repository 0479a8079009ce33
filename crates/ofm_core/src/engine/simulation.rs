//! Per-tick match resolver: possession, pitch position, event log.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::clock::MatchMinute;
use crate::engine::events::{
    EventGenerator, PitchPosition, Possession, SimulationEvent, TickContext,
};
use crate::models::team::TeamSimulation;

/// Holds both live sides, tracks possession and ball location, and resolves
/// one tick at a time.
///
/// The engine owns no probability model of its own: event generation is
/// delegated to an installed [`EventGenerator`]. Without one every tick
/// passes without incident — the clock still runs, the score stays put.
pub struct SimulationEngine {
    home_team: TeamSimulation,
    away_team: TeamSimulation,
    possession: Possession,
    pitch_position: PitchPosition,
    event_history: Vec<SimulationEvent>,
    rng: StdRng,
    generator: Option<Box<dyn EventGenerator>>,
}

impl SimulationEngine {
    /// Seeds the engine rng and picks the initially-possessing side
    /// uniformly from it, so a match replays identically from the same
    /// seed.
    pub fn new(home_team: TeamSimulation, away_team: TeamSimulation, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let possession = if rng.gen_bool(0.5) {
            Possession::HomeTeam
        } else {
            Possession::AwayTeam
        };
        let mut engine = Self {
            home_team,
            away_team,
            possession,
            pitch_position: PitchPosition::default(),
            event_history: Vec::new(),
            rng,
            generator: None,
        };
        engine.sync_possession_flags();
        engine
    }

    /// Install the per-tick event source. The core ships none.
    pub fn set_event_generator(&mut self, generator: Box<dyn EventGenerator>) {
        self.generator = Some(generator);
    }

    pub fn home_team(&self) -> &TeamSimulation {
        &self.home_team
    }

    pub fn away_team(&self) -> &TeamSimulation {
        &self.away_team
    }

    pub fn home_team_mut(&mut self) -> &mut TeamSimulation {
        &mut self.home_team
    }

    pub fn away_team_mut(&mut self) -> &mut TeamSimulation {
        &mut self.away_team
    }

    pub fn possession(&self) -> Possession {
        self.possession
    }

    pub fn pitch_position(&self) -> PitchPosition {
        self.pitch_position
    }

    pub fn events(&self) -> &[SimulationEvent] {
        &self.event_history
    }

    pub fn is_game_a_draw(&self) -> bool {
        self.home_team.score == self.away_team.score
    }

    /// (attacking, defending), ordered by current possession.
    pub fn get_team_in_possession(&self) -> (&TeamSimulation, &TeamSimulation) {
        match self.possession {
            Possession::HomeTeam => (&self.home_team, &self.away_team),
            Possession::AwayTeam => (&self.away_team, &self.home_team),
        }
    }

    /// Resolve one 0.1-minute tick: drain stamina for everyone on the
    /// pitch, then let the generator produce at most one event and apply
    /// what it did to score, possession and ball location.
    pub fn run(&mut self, minute: MatchMinute) {
        for slot in self.home_team.formation.players_mut() {
            slot.apply_fatigue();
        }
        for slot in self.away_team.formation.players_mut() {
            slot.apply_fatigue();
        }

        let Some(generator) = self.generator.as_mut() else {
            return;
        };
        let context = TickContext {
            minute,
            possession: self.possession,
            pitch_position: self.pitch_position,
            home_score: self.home_team.score,
            away_score: self.away_team.score,
        };
        let Some(outcome) = generator.generate(&context, &mut self.rng) else {
            return;
        };

        if outcome.scored {
            // Credit goes to the side that had the ball when the tick
            // started, not to whoever ends up with possession afterwards.
            match self.possession {
                Possession::HomeTeam => self.home_team.score_goal(),
                Possession::AwayTeam => self.away_team.score_goal(),
            }
            log::info!(
                "goal at {}: {} {} - {} {}",
                minute,
                self.home_team.team.name,
                self.home_team.score,
                self.away_team.score,
                self.away_team.team.name
            );
        }
        self.possession = outcome.possession;
        self.pitch_position = outcome.pitch_position;
        self.sync_possession_flags();
        self.event_history.push(outcome.event);
    }

    fn sync_possession_flags(&mut self) {
        self.home_team.in_possession = self.possession == Possession::HomeTeam;
        self.away_team.in_possession = self.possession == Possession::AwayTeam;
    }
}
