//! Match clock: fixed-point time and the phase-boundary state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::simulation::SimulationEngine;
use crate::models::team::TeamSimulation;

/// Elapsed match time in tenths of a minute.
///
/// One simulation tick is 0.1 minute, so a `u16` counter is exact at every
/// boundary the clock cares about — no floating point, no process-wide
/// precision setting, one counter per match instance.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct MatchMinute(u16);

impl MatchMinute {
    pub const KICK_OFF: MatchMinute = MatchMinute(0);
    /// 45:00 — half-time.
    pub const FIRST_HALF_END: MatchMinute = MatchMinute(450);
    /// 90:00 — end of regulation.
    pub const REGULATION_END: MatchMinute = MatchMinute(900);
    /// 105:00 — end of the first extra-time period.
    pub const EXTRA_FIRST_HALF_END: MatchMinute = MatchMinute(1050);
    /// 120:00 — end of extra time.
    pub const EXTRA_TIME_END: MatchMinute = MatchMinute(1200);

    pub fn from_tenths(tenths: u16) -> Self {
        MatchMinute(tenths)
    }

    pub fn tenths(&self) -> u16 {
        self.0
    }

    pub fn as_minutes(&self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// Advance by one 0.1-minute tick.
    pub fn tick(&mut self) {
        self.0 += 1;
    }
}

impl fmt::Display for MatchMinute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// The live match: simulated clock, break/full-time flags, and the per-tick
/// engine.
///
/// Single-threaded and tick-granular: `run` yields only at a break or at
/// full time, never mid-tick. Substitutions and swaps are expected while
/// the clock is paused; the clock itself imposes no locking.
pub struct LiveGame {
    minutes: MatchMinute,
    is_half_time: bool,
    is_game_over: bool,
    possible_extra_time: bool,
    possible_penalties: bool,
    engine: SimulationEngine,
}

impl LiveGame {
    /// The extra-time and penalty permissions are fixed for the whole
    /// match; `seed` drives every random draw the engine makes.
    pub fn new(
        home_team: TeamSimulation,
        away_team: TeamSimulation,
        possible_extra_time: bool,
        possible_penalties: bool,
        seed: u64,
    ) -> Self {
        Self {
            minutes: MatchMinute::KICK_OFF,
            is_half_time: false,
            is_game_over: false,
            possible_extra_time,
            possible_penalties,
            engine: SimulationEngine::new(home_team, away_team, seed),
        }
    }

    pub fn minutes(&self) -> MatchMinute {
        self.minutes
    }

    pub fn is_half_time(&self) -> bool {
        self.is_half_time
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    /// Evaluate the phase boundaries for the current minute. Returns false
    /// when the clock just entered a break or finished the game, having set
    /// the matching flag.
    fn game_is_not_in_break(&mut self) -> bool {
        if self.minutes == MatchMinute::EXTRA_TIME_END {
            if self.possible_penalties && self.engine.is_game_a_draw() {
                log::info!("extra time over, still level: penalty shootout");
                self.is_half_time = true;
            } else {
                self.is_game_over = true;
            }
            false
        } else if self.minutes == MatchMinute::FIRST_HALF_END
            || self.minutes == MatchMinute::EXTRA_FIRST_HALF_END
        {
            log::debug!("break at {}", self.minutes);
            self.is_half_time = true;
            false
        } else if self.minutes == MatchMinute::REGULATION_END {
            if self.possible_extra_time && self.engine.is_game_a_draw() {
                log::info!("level after 90: extra time");
                self.is_half_time = true;
            } else {
                self.is_game_over = true;
            }
            false
        } else {
            true
        }
    }

    /// Resume play after a break: clears the break flag and advances one
    /// tick past the boundary minute so the next `run` does not re-trigger
    /// the same boundary.
    pub fn reset_after_half_time(&mut self) {
        self.is_half_time = false;
        self.minutes.tick();
    }

    /// Resolve ticks until a break or full time. Each iteration is one
    /// non-preemptible unit: boundary check, one engine tick, clock
    /// advance.
    pub fn run(&mut self) {
        while !self.is_game_over && !self.is_half_time {
            if self.game_is_not_in_break() {
                self.engine.run(self.minutes);
                self.minutes.tick();
            }
        }
    }
}
