use std::path::PathBuf;

use clap::Parser;
use judge::{play_game, Bot, Config, GameResult, RandomBot, Recorder};
use quantum::{HintLevel, MAX_PLAYERS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// How many bots play at the same table
    #[arg(short = 'p', long, default_value_t = 3)]
    num_players: usize,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// The most detailed hint level the table allows: "none", "track" or "full"
    #[arg(long, default_value_t = HintLevel::Full)]
    max_hint_level: HintLevel,

    /// The hint level the bots ask for
    #[arg(long, default_value_t = HintLevel::Full)]
    bot_hint_level: HintLevel,

    /// Abandon games that are still running after this many rounds
    #[arg(long, default_value_t = 200)]
    max_moves: u32,

    /// Stop a game when a bot proposes this many rejected actions in a row.
    /// Targeting always allows at least one attempt per (player, suit) pair
    #[arg(long, default_value_t = 20)]
    max_attempts: usize,

    /// Record the game's actions as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Default)]
struct TournamentScore {
    wins: Vec<usize>,
    stalls: Vec<usize>,
    contradictions: Vec<u32>,
    abandoned: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    if args.num_players < 2 || args.num_players > MAX_PLAYERS {
        anyhow::bail!(
            "Cannot play with {} players, must be between 2 and {}",
            args.num_players,
            MAX_PLAYERS
        );
    }

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut bots: Vec<Box<dyn Bot>> = (0..args.num_players)
        .map(|idx| {
            let bot_rng = StdRng::seed_from_u64(rng.gen());
            let name = format!("Random {}", idx + 1);
            Box::new(RandomBot::new(&name, bot_rng, args.bot_hint_level)) as Box<dyn Bot>
        })
        .collect();

    let recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let mut config = Config {
        rng,
        recorder,
        max_hint_level: args.max_hint_level,
        max_moves: args.max_moves,
        max_attempts: args.max_attempts,
    };

    let mut score = TournamentScore {
        wins: vec![0; bots.len()],
        stalls: vec![0; bots.len()],
        contradictions: vec![0; bots.len()],
        ..Default::default()
    };
    for game_idx in 0..args.num_games {
        let report = play_game(&mut config, &mut bots)?;
        match report.result {
            GameResult::WonByPlayer { player_idx } => {
                debug!(
                    winner = bots[player_idx].name(),
                    game_idx,
                    moves = report.move_number
                );
                score.wins[player_idx] += 1;
            }
            GameResult::Abandoned => {
                info!(game_idx, "Game abandoned");
                score.abandoned += 1;
            }
            GameResult::Stalled { player_idx } => {
                info!(
                    player = bots[player_idx].name(),
                    game_idx, "Bot kept proposing rejected actions"
                );
                score.stalls[player_idx] += 1;
            }
        }
        for (total, count) in score.contradictions.iter_mut().zip(report.contradiction_count) {
            *total += count;
        }
    }

    print_tournament_results(&bots, &score, args.num_games);

    Ok(())
}

fn print_tournament_results(bots: &[Box<dyn Bot>], score: &TournamentScore, num_games: usize) {
    println!("\nTournament results after {} games:\n", num_games);
    println!(" {:19} | {:>6} | {:>6} | {:>14}", "bot", "wins", "win %", "contradictions");
    println!("---------------------|--------|--------|----------------");
    for (idx, bot) in bots.iter().enumerate() {
        let win_percentage = score.wins[idx] as f32 / num_games.max(1) as f32 * 100.0;
        println!(
            " {:19} | {:>6} | {:>5.1}% | {:>14}",
            bot.name(),
            score.wins[idx],
            win_percentage,
            score.contradictions[idx]
        );
    }
    println!("---------------------|--------|--------|----------------");
    println!("{} games abandoned", score.abandoned);
    let stalls: usize = score.stalls.iter().sum();
    if stalls > 0 {
        println!("{} games stalled", stalls);
    }
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
