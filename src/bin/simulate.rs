use std::io::Write;

use chessboard::engine::{pick_move, AiConfig, Difficulty};
use chessboard::{Color, Game, Terminal};
use clap::Parser;
use log::info;

/// Round-robin between difficulty levels, playing each pairing from both sides.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// Games per pairing (split evenly between colors).
    #[arg(short, long, default_value_t = 4)]
    games: usize,

    /// Games still running after this many plies count as draws.
    #[arg(short, long, default_value_t = 150)]
    max_moves: usize,

    /// Difficulties to include. Defaults to Easy, Medium and Hard.
    #[arg(short, long, value_delimiter = ',')]
    levels: Vec<Difficulty>,
}

#[derive(Debug, Default)]
struct MatchResult {
    a_wins: u32,
    b_wins: u32,
    draws: u32,
}

/// Returns the winning color, or `None` for a draw or an unfinished game.
fn play_game(white: &AiConfig, black: &AiConfig, max_moves: usize) -> Option<Color> {
    let mut game = Game::new();
    while !game.is_over() && game.ply_count() < max_moves {
        let config = if game.state().side_to_move == Color::White { white } else { black };
        let result = pick_move(game.state(), config)?;
        game.apply_move(&result.mv).ok()?;
    }

    match game.status().terminal {
        Some(Terminal::Checkmate) => Some(game.state().side_to_move.opposite()),
        _ => None,
    }
}

fn run_matchup(a: Difficulty, b: Difficulty, games: usize, max_moves: usize) -> MatchResult {
    let (ca, cb) = (AiConfig::from(a), AiConfig::from(b));
    let mut result = MatchResult::default();

    for i in 0..games {
        // Alternate colors: even games A is White.
        let a_is_white = i % 2 == 0;
        let winner = if a_is_white {
            play_game(&ca, &cb, max_moves)
        } else {
            play_game(&cb, &ca, max_moves)
        };
        match winner {
            Some(Color::White) if a_is_white => result.a_wins += 1,
            Some(Color::Black) if !a_is_white => result.a_wins += 1,
            Some(_) => result.b_wins += 1,
            None => result.draws += 1,
        }
        info!("{a} vs {b}: game {} done ({winner:?})", i + 1);
    }

    println!(
        "  {a} vs {b}: {a} wins {}, {b} wins {}, draws {} (out of {games})",
        result.a_wins, result.b_wins, result.draws
    );
    std::io::stdout().flush().ok();
    result
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let levels = if args.levels.is_empty() {
        vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    } else {
        args.levels.clone()
    };

    println!("=== Difficulty round-robin ===");
    println!("Games per pairing: {}, max plies per game: {}\n", args.games, args.max_moves);

    let mut points = vec![0.0f64; levels.len()];
    for i in 0..levels.len() {
        for j in (i + 1)..levels.len() {
            let r = run_matchup(levels[i], levels[j], args.games, args.max_moves);
            points[i] += r.a_wins as f64 + 0.5 * r.draws as f64;
            points[j] += r.b_wins as f64 + 0.5 * r.draws as f64;
        }
    }

    println!("\n=== Standings ===");
    let mut table: Vec<(Difficulty, f64)> = levels.into_iter().zip(points).collect();
    table.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (level, pts) in table {
        println!("  {level:<8} {pts:.1}");
    }
}
