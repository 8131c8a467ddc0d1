use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use valentine_chess::config::GameConfig;
use valentine_chess::game::{ClickOutcome, Game, Phase};
use valentine_chess::moves::{parse_square, Move};

/// Play White against a random opponent in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON game settings; missing fields take their defaults
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(GameConfig::default()),
    }
}

/// Text rendering of the board. The selected piece is in parentheses, a
/// highlighted target is `*` (empty) or `[x]` (capture), and the squares of
/// the last move are wrapped in `<` `>`.
fn render(game: &Game) -> String {
    let highlights = game.highlights();
    let last = game.board().last_move;
    let mut out = String::new();
    for (r, row) in game.board().to_rows().iter().enumerate() {
        out.push_str(&format!("{} ", 8 - r));
        for (c, ch) in row.chars().enumerate() {
            let cell = if game.selection() == Some((r, c)) {
                format!("({ch})")
            } else if highlights.contains(&(r, c)) {
                if ch == '.' { " * ".to_string() } else { format!("[{ch}]") }
            } else if last.map(|m| m.from == (r, c) || m.to == (r, c)).unwrap_or(false) {
                format!("<{ch}>")
            } else {
                format!(" {ch} ")
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str("   a  b  c  d  e  f  g  h\n");
    out
}

/// Feed one line of input to the game: a square name is a click, four
/// characters are a whole move.
fn handle_input(game: &mut Game, input: &str) -> Result<ClickOutcome> {
    if input.len() == 4 {
        let mv = Move::from_notation(input)?;
        Ok(game.play_move(&mv))
    } else {
        let (row, col) = parse_square(input)?;
        Ok(game.click(row, col))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    debug!("config:\n{}", config.to_json()?);
    let delay = Duration::from_millis(config.opponent_delay_ms as u64);
    let mut game = Game::new(config);

    println!("valentine_chess (built {})", env!("BUILD_TIMESTAMP"));
    println!("You are White. Enter a square to click (e2), a move (e2e4), 'new' or 'quit'.");

    let stdin = io::stdin();
    loop {
        print!("\n{}", render(&game));
        if let Some(banner) = game.banner() {
            println!("\n{banner}");
        }
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "quit" => break,
            "new" => game.reset(),
            input => {
                if let Err(e) = handle_input(&mut game, input) {
                    println!("{e}");
                }
            }
        }

        // Whatever the input did, a pending reply is always played.
        if game.phase() == Phase::OpponentPending {
            print!("\n{}", render(&game));
            std::thread::sleep(delay);
            if let Some(reply) = game.play_opponent() {
                println!("Black plays {}", reply.to_notation());
            }
        }
    }

    Ok(())
}
