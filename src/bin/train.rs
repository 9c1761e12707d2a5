#![recursion_limit = "256"]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ml_tictactoe::checkpoint::{
    CheckpointHyperparameters, CheckpointManager, CheckpointMetrics,
};
use ml_tictactoe::config::AppConfig;
use ml_tictactoe::game::{Game, GameStatus, Player};
use ml_tictactoe::policy::PolicyAgent;
use ml_tictactoe::training::{StdoutProgress, Trainer, TrainingSession};

/// Train a tic-tac-toe policy network with REINFORCE.
#[derive(Parser)]
#[command(name = "train", about = "Train a tic-tac-toe RL agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Override games played per iteration
    #[arg(long)]
    games: Option<usize>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Override reward discount rate
    #[arg(long)]
    discount: Option<f32>,

    /// Override hidden layer sizes, e.g. --hidden 128 --hidden 64
    #[arg(long)]
    hidden: Vec<usize>,

    /// Resume training from the latest checkpoint
    #[arg(long)]
    resume: bool,

    /// Seed for action sampling and the random opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Play one demonstration game after training and print the boards
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(iterations) = cli.iterations {
        config.training.num_iterations = iterations;
    }
    if let Some(games) = cli.games {
        config.training.games_per_iteration = games;
    }
    if let Some(lr) = cli.lr {
        config.training.learning_rate = lr;
    }
    if let Some(discount) = cli.discount {
        config.training.discount_rate = discount;
    }
    if !cli.hidden.is_empty() {
        config.network.hidden_layer_sizes = cli.hidden.clone();
    }
    config
        .validate()
        .context("validating configuration after CLI overrides")?;

    let manager = CheckpointManager::new(config.checkpoint.clone());

    let mut resumed_iteration = 0;
    let mut agent = if cli.resume {
        // The checkpoint dictates the architecture, so read its metadata
        // before building the network.
        let dir = manager
            .latest_checkpoint_dir()
            .context("resolving latest checkpoint")?;
        let metadata = manager.read_metadata(&dir).context("reading checkpoint metadata")?;
        let mut agent = build_agent(metadata.hidden_layer_sizes.clone(), cli.seed);
        agent
            .load_from_dir(&dir)
            .context("loading checkpoint weights")?;
        resumed_iteration = metadata.iteration;
        println!(
            "Resumed from iteration {} (hidden layers {:?})",
            metadata.iteration, metadata.hidden_layer_sizes
        );
        agent
    } else {
        build_agent(config.network.hidden_layer_sizes.clone(), cli.seed)
    };

    let mut session = match cli.seed {
        Some(seed) => TrainingSession::with_seed(seed.wrapping_add(1)),
        None => TrainingSession::new(),
    };
    spawn_stop_listener(session.stop_handle());
    println!("Type 'q' and press Enter to stop after the current iteration.");

    let trainer = Trainer::new(config.training.clone());
    let mut sink = StdoutProgress;
    let report = trainer
        .train(&mut agent, &mut session, &mut sink)
        .context("training run failed")?;

    let iterations_completed = resumed_iteration + report.wins_per_iteration.len();
    println!(
        "Training finished: {} games over {} iterations{}",
        report.games_played,
        report.wins_per_iteration.len(),
        if report.stopped_early { " (stopped early)" } else { "" },
    );

    if !report.wins_per_iteration.is_empty() {
        let metrics = CheckpointMetrics {
            win_rate: report
                .final_win_rate(config.training.games_per_iteration)
                .unwrap_or(0.0) as f32,
            games_played: report.games_played,
            iterations_completed,
        };
        let hyperparameters = CheckpointHyperparameters {
            learning_rate: config.training.learning_rate,
            discount_rate: config.training.discount_rate,
            games_per_iteration: config.training.games_per_iteration,
        };
        let path = manager
            .save_checkpoint(&agent, &metrics, &hyperparameters, iterations_completed)
            .context("saving checkpoint")?;
        println!("Saved checkpoint to {}", path.display());
    }

    if cli.demo {
        play_demo_game(&mut agent, cli.seed)?;
    }

    Ok(())
}

/// Watch stdin for a quit request and store it into the session's stop flag.
/// The trainer picks it up at the next iteration boundary, so the current
/// batch still finishes and applies its update.
fn spawn_stop_listener(stop: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if line.trim().eq_ignore_ascii_case("q") {
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                }
            }
        }
    });
}

fn build_agent(hidden_layer_sizes: Vec<usize>, seed: Option<u64>) -> PolicyAgent {
    match seed {
        Some(seed) => PolicyAgent::with_seed(hidden_layer_sizes, seed),
        None => PolicyAgent::new(hidden_layer_sizes),
    }
}

/// One game against the random opponent, printing the board after every move.
fn play_demo_game(agent: &mut PolicyAgent, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(2)),
        None => StdRng::from_os_rng(),
    };

    println!("\nDemonstration game (X: policy, O: random):");
    let mut game = Game::new();
    while !game.status().is_terminal() {
        let slot = agent.select_action(&game.board_state());
        let status = game.perform_move(Player::X, slot)?;
        println!("X plays slot {slot}:\n{}", game.board());
        if status != GameStatus::Playing {
            break;
        }
        game.perform_random_move(Player::O, &mut rng)?;
        println!("O answers:\n{}", game.board());
    }

    match game.status() {
        GameStatus::Won(player) => println!("{player} wins"),
        GameStatus::Draw => println!("draw"),
        GameStatus::Playing => unreachable!(),
    }
    Ok(())
}
