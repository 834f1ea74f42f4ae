use chessboard::engine::{pick_move, AiConfig, Difficulty};
use chessboard::{Color, Game};
use clap::Parser;

/// Play one AI-vs-AI game and print it move by move.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// Difficulty of the White side.
    #[arg(short, long, default_value = "medium")]
    white: Difficulty,

    /// Difficulty of the Black side.
    #[arg(short, long, default_value = "easy")]
    black: Difficulty,

    /// Stop after this many plies.
    #[arg(short, long, default_value_t = 120)]
    max_moves: usize,

    /// Start from this position instead of the standard one.
    #[arg(short, long)]
    fen: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    while !game.is_over() && game.ply_count() < args.max_moves {
        let side = game.state().side_to_move;
        let difficulty = if side == Color::White { args.white } else { args.black };
        let Some(result) = pick_move(game.state(), &AiConfig::from(difficulty)) else {
            break;
        };
        game.apply_move(&result.mv)?;
        println!(
            "{:>3}. {side:<5} {:<6} score {:+.2} ({} evals)",
            game.ply_count(),
            result.mv.to_uci(),
            result.score,
            result.evals
        );
    }

    println!("{}", game.state());
    let status = game.status();
    let result = status
        .result_text(game.state().side_to_move)
        .unwrap_or_else(|| "ongoing".to_string());
    eprintln!("Game over after {} plies: {result} ({:?})", game.ply_count(), status.terminal);
    Ok(())
}
