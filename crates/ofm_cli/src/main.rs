//! Demo match runner.
//!
//! Generates two seeded squads, assigns lineups, and drives the match
//! clock from kick-off to the final whistle, printing the timeline and a
//! JSON summary. This binary is the "command layer" the core expects
//! around it: it owns roster generation, pausing at breaks, and
//! presentation.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use ofm_core::{
    Formation, LiveGame, MatchMinute, Player, Position, PositionRatings, Team, TeamSimulation,
};

#[derive(Parser)]
#[command(name = "ofm_cli")]
#[command(about = "Run a demo match between two generated squads", long_about = None)]
struct Cli {
    /// Home team name
    #[arg(long, default_value = "Home FC")]
    home: String,

    /// Away team name
    #[arg(long, default_value = "Away United")]
    away: String,

    /// Formation code for the home side (e.g. 4-4-2)
    #[arg(long, default_value = "4-4-2")]
    home_formation: String,

    /// Formation code for the away side
    #[arg(long, default_value = "4-3-3")]
    away_formation: String,

    /// Simulation seed (same seed = same match)
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Allow extra time when the match is level after 90 minutes
    #[arg(long, default_value_t = false)]
    extra_time: bool,

    /// Allow a penalty shootout after level extra time
    #[arg(long, default_value_t = false)]
    penalties: bool,
}

const SQUAD_SIZE: usize = 16;

/// Position spread for a generated squad: two keepers, five defenders, six
/// midfielders, three forwards — enough cover for every legal formation.
fn nominal_position(index: usize) -> Position {
    match index {
        0 | 1 => Position::Gk,
        n if n <= 6 => Position::Df,
        n if n <= 12 => Position::Mf,
        _ => Position::Fw,
    }
}

fn generate_roster(rng: &mut StdRng, team_name: &str) -> Vec<Arc<Player>> {
    (0..SQUAD_SIZE)
        .map(|index| {
            let best = nominal_position(index);
            let main: u8 = rng.gen_range(62..=88);
            let off: u8 = main.saturating_sub(rng.gen_range(10..=25));
            let ratings = PositionRatings {
                gk: if best == Position::Gk { main } else { 1 },
                df: if best == Position::Df { main } else { off },
                mf: if best == Position::Mf { main } else { off },
                fw: if best == Position::Fw { main } else { off },
            };
            Arc::new(Player::new(
                format!("{} #{:02}", team_name, index + 1),
                best,
                ratings,
            ))
        })
        .collect()
}

fn build_side(
    name: &str,
    formation_code: &str,
    stadium: &str,
    is_players_team: bool,
    rng: &mut StdRng,
) -> Result<TeamSimulation> {
    let roster = generate_roster(rng, name);
    let mut formation = Formation::new(formation_code)
        .with_context(|| format!("bad formation for {}", name))?;
    formation
        .assign_best_lineup(&roster)
        .with_context(|| format!("could not pick a lineup for {}", name))?;
    let team = Team::new(name, roster, stadium, is_players_team);
    Ok(TeamSimulation::new(team, formation))
}

fn print_lineup(side: &TeamSimulation) {
    println!(
        "{} ({}) — starting XI:",
        side.team.name,
        side.formation.shape()
    );
    for slot in side.players() {
        println!(
            "  {}  {}  ({})",
            slot.current_position,
            slot.player.name,
            slot.rating()
        );
    }
    println!("  bench: {}", side.bench().len());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let home = build_side(&cli.home, &cli.home_formation, "Municipal Stadium", true, &mut rng)?;
    let away = build_side(&cli.away, &cli.away_formation, "Municipal Stadium", false, &mut rng)?;

    print_lineup(&home);
    print_lineup(&away);

    let mut game = LiveGame::new(home, away, cli.extra_time, cli.penalties, cli.seed);
    loop {
        game.run();
        if game.is_game_over() {
            break;
        }
        if game.minutes() >= MatchMinute::EXTRA_TIME_END {
            // Level after extra time: the shootout is resolved outside the
            // clock. Report and stop.
            println!("{}' — going to penalties", game.minutes());
            break;
        }
        println!("{}' — break", game.minutes());
        game.reset_after_half_time();
    }

    let engine = game.engine();
    println!(
        "FT {} {} - {} {}",
        engine.home_team().team.name,
        engine.home_team().score,
        engine.away_team().score,
        engine.away_team().team.name
    );
    for event in engine.events() {
        println!("  {}' {:?}", event.minute, event.event_type);
    }

    let summary = serde_json::json!({
        "home": {
            "name": engine.home_team().team.name,
            "score": engine.home_team().score,
            "formation": engine.home_team().formation.shape(),
            "avg_rating": engine.home_team().average_rating(),
        },
        "away": {
            "name": engine.away_team().team.name,
            "score": engine.away_team().score,
            "formation": engine.away_team().formation.shape(),
            "avg_rating": engine.away_team().average_rating(),
        },
        "minutes": game.minutes().as_minutes(),
        "draw": engine.is_game_a_draw(),
        "events": engine.events(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
