use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use klondike_engine::display::{print_board, render_hint, render_playing_edge};
use klondike_engine::hint;
use klondike_engine::selfplay::{self, PlayResult};
use klondike_engine::{EngineConfig, Game, Stats};

/// Deal Klondike games and let the hint-following player try to win them.
#[derive(Parser, Debug)]
#[command(name = "klondike", version, about)]
struct Cli {
    /// Seed for the first deal; later games use seed+1, seed+2, ...
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with engine settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of games to play.
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Give up on a game after this many player steps.
    #[arg(long, default_value_t = 5_000)]
    max_steps: usize,

    /// Log every move (same as RUST_LOG=debug).
    #[arg(long)]
    trace: bool,

    /// Print the final board of every game, with the best move left.
    #[arg(long)]
    show_board: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(path = %path.display(), %err, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let mut stats = Stats::default();
    for n in 0..cli.games {
        let mut config = config.clone();
        if let Some(seed) = cli.seed.or(config.seed) {
            config = config.with_seed(seed.wrapping_add(u64::from(n)));
        }
        let seed = config.seed;
        let mut game = Game::new(config);

        let report = match selfplay::play(&mut game, cli.max_steps) {
            Ok(report) => report,
            Err(err) => {
                error!(game = n + 1, %err, "self-play aborted");
                return ExitCode::FAILURE;
            }
        };
        match report.result {
            PlayResult::Won(ref game_stats) => stats.record_win(game_stats),
            PlayResult::Stuck | PlayResult::OutOfSteps => stats.record_loss(),
        }
        info!(game = n + 1, ?seed, result = ?report.result, steps = report.steps, "game done");
        if cli.show_board {
            print_board(game.board());
            println!("{}", render_playing_edge(game.board()));
            if let Some(best) = hint::candidates(game.board()).first() {
                println!("{}", render_hint(game.board(), best));
            }
        }
    }

    println!("Games played: {}", stats.games_played);
    println!("Games won:    {}", stats.games_won);
    println!("Win rate:     {:.1}%", stats.win_rate() * 100.0);
    if let Some(avg) = stats.average_winning_moves() {
        println!("Average moves in a win: {avg:.1}");
    }
    ExitCode::SUCCESS
}
