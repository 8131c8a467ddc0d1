use anyhow::Result;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use valentine_chess::board::Board;
use valentine_chess::engine::pick_move_with;

/// Random against random until a king falls.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for the move picker; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many plies without a result
    #[arg(long, default_value_t = 2000)]
    max_plies: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    info!("seed {seed}");

    let mut board = Board::new();
    let mut plies = 0;
    let mut passes = 0;

    while board.winner().is_none() && plies < args.max_plies {
        let side = board.current_turn;
        match pick_move_with(&board, side, || rng.gen()) {
            Some(mv) => {
                board.apply_move(&mv);
                passes = 0;
            }
            None => {
                info!("{side} has no move; passing");
                board.current_turn = side.opposite();
                passes += 1;
                if passes == 2 {
                    break;
                }
            }
        }
        plies += 1;
    }

    print!("{board}");
    match board.winner() {
        Some(color) => println!("{color} wins after {plies} plies"),
        None => println!("no result after {plies} plies"),
    }
    Ok(())
}
