use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::TrainingError;
use crate::policy::PolicyModel;
use crate::training::episode::play_episode;
use crate::training::gradients::scale_and_average_gradients;
use crate::training::rewards::{discount_and_normalize_rewards, expand_terminal_reward};

/// Hyperparameters of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    #[serde(default = "default_num_iterations")]
    pub num_iterations: usize,
    #[serde(default = "default_games_per_iteration")]
    pub games_per_iteration: usize,
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f32,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

fn default_num_iterations() -> usize {
    50
}

fn default_games_per_iteration() -> usize {
    20
}

fn default_discount_rate() -> f32 {
    0.95
}

fn default_learning_rate() -> f64 {
    0.05
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_iterations: default_num_iterations(),
            games_per_iteration: default_games_per_iteration(),
            discount_rate: default_discount_rate(),
            learning_rate: default_learning_rate(),
        }
    }
}

/// Mutable state that outlives a single `train` call: the opponent's RNG and
/// the cooperative stop flag. The flag can be set from another thread (a
/// Ctrl-C handler, say) and is honored at iteration boundaries only, so a
/// batch that has started always finishes and applies its update.
pub struct TrainingSession {
    stop: Arc<AtomicBool>,
    opponent_rng: StdRng,
}

impl TrainingSession {
    pub fn new() -> Self {
        TrainingSession {
            stop: Arc::new(AtomicBool::new(false)),
            opponent_rng: StdRng::from_os_rng(),
        }
    }

    /// Fixed opponent seed for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        TrainingSession {
            stop: Arc::new(AtomicBool::new(false)),
            opponent_rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Shared handle for requesting a stop from outside the loop.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress callbacks for a training run. All methods default to no-ops so a
/// sink only overrides what it cares about.
pub trait ProgressSink {
    /// Called with `(0, total)` before an iteration's first game and then
    /// once after each game completes.
    fn on_game_end(&mut self, _games_completed: usize, _total_games: usize) {}

    /// Called after an iteration's update has been applied, with the number
    /// of iterations completed so far out of the configured total.
    fn on_iteration_end(
        &mut self,
        _iteration: usize,
        _total_iterations: usize,
        _wins: usize,
        _games: usize,
    ) {
    }
}

/// Sink that prints per-iteration win counts.
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn on_iteration_end(
        &mut self,
        iteration: usize,
        total_iterations: usize,
        wins: usize,
        games: usize,
    ) {
        println!(
            "iteration {iteration}/{total_iterations}: won {wins}/{games} games ({:.1}%)",
            100.0 * wins as f64 / games as f64
        );
    }
}

/// What a training run did, for logging and checkpoint metadata.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub wins_per_iteration: Vec<usize>,
    pub games_played: usize,
    pub stopped_early: bool,
}

impl TrainingReport {
    /// Win rate of the final completed iteration, if any.
    pub fn final_win_rate(&self, games_per_iteration: usize) -> Option<f64> {
        self.wins_per_iteration
            .last()
            .map(|&wins| wins as f64 / games_per_iteration as f64)
    }
}

/// REINFORCE training loop: roll a batch of games, shape the rewards, scale
/// and average the captured gradients, and step the policy's optimizer, once
/// per iteration.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn train<P: PolicyModel>(
        &self,
        policy: &mut P,
        session: &mut TrainingSession,
        sink: &mut dyn ProgressSink,
    ) -> Result<TrainingReport, TrainingError> {
        let mut report = TrainingReport {
            wins_per_iteration: Vec::with_capacity(self.config.num_iterations),
            games_played: 0,
            stopped_early: false,
        };

        for iteration in 0..self.config.num_iterations {
            if session.stop_requested() {
                report.stopped_early = true;
                break;
            }

            let total = self.config.games_per_iteration;
            sink.on_game_end(0, total);

            let mut batch = Vec::with_capacity(total);
            let mut reward_sequences = Vec::with_capacity(total);
            let mut wins = 0;
            for game in 0..total {
                let record = play_episode(policy, &mut session.opponent_rng)?;
                if record.won {
                    wins += 1;
                }
                reward_sequences.push(expand_terminal_reward(
                    record.terminal_reward,
                    record.moves(),
                ));
                batch.push(record.gradients);
                report.games_played += 1;
                sink.on_game_end(game + 1, total);
            }

            let shaped = discount_and_normalize_rewards(&reward_sequences, self.config.discount_rate);
            let update = scale_and_average_gradients(batch, &shaped);
            policy.apply_gradients(&update, self.config.learning_rate);

            report.wins_per_iteration.push(wins);
            sink.on_iteration_end(iteration + 1, self.config.num_iterations, wins, total);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::training::episode::tests::ScriptedPolicy;

    struct RecordingSink {
        game_calls: Vec<(usize, usize)>,
        iteration_calls: Vec<(usize, usize, usize, usize)>,
    }

    impl RecordingSink {
        fn new() -> Self {
            RecordingSink {
                game_calls: Vec::new(),
                iteration_calls: Vec::new(),
            }
        }
    }

    impl ProgressSink for RecordingSink {
        fn on_game_end(&mut self, games_completed: usize, total_games: usize) {
            self.game_calls.push((games_completed, total_games));
        }

        fn on_iteration_end(
            &mut self,
            iteration: usize,
            total_iterations: usize,
            wins: usize,
            games: usize,
        ) {
            self.iteration_calls
                .push((iteration, total_iterations, wins, games));
        }
    }

    fn small_config() -> TrainerConfig {
        TrainerConfig {
            num_iterations: 3,
            games_per_iteration: 4,
            discount_rate: 0.95,
            learning_rate: 0.05,
        }
    }

    #[test]
    fn test_full_run_plays_every_game() {
        let mut policy = ScriptedPolicy::cycling((0..9).collect());
        let mut session = TrainingSession::with_seed(7);
        let mut sink = RecordingSink::new();

        let trainer = Trainer::new(small_config());
        let report = trainer.train(&mut policy, &mut session, &mut sink).unwrap();

        assert_eq!(report.games_played, 12);
        assert_eq!(report.wins_per_iteration.len(), 3);
        assert!(!report.stopped_early);
        // One update per iteration.
        assert_eq!(policy.applied.len(), 3);
    }

    #[test]
    fn test_progress_reset_before_each_iteration() {
        let mut policy = ScriptedPolicy::cycling((0..9).collect());
        let mut session = TrainingSession::with_seed(3);
        let mut sink = RecordingSink::new();

        let trainer = Trainer::new(small_config());
        trainer.train(&mut policy, &mut session, &mut sink).unwrap();

        // Each iteration reports (0, total) first, then 1..=total.
        assert_eq!(sink.game_calls.len(), 3 * 5);
        for chunk in sink.game_calls.chunks(5) {
            assert_eq!(chunk, &[(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)]);
        }
        // Each iteration reports its ordinal out of the configured total.
        assert_eq!(sink.iteration_calls.len(), 3);
        assert_eq!(sink.iteration_calls[0].0, 1);
        assert_eq!(sink.iteration_calls[2].0, 3);
        for &(_, total_iterations, _, games) in &sink.iteration_calls {
            assert_eq!(total_iterations, 3);
            assert_eq!(games, 4);
        }
    }

    #[test]
    fn test_stop_flag_honored_at_iteration_boundary() {
        let mut policy = ScriptedPolicy::cycling((0..9).collect());
        let mut session = TrainingSession::with_seed(5);
        session.stop_handle().store(true, Ordering::Relaxed);
        let mut sink = RecordingSink::new();

        let trainer = Trainer::new(small_config());
        let report = trainer.train(&mut policy, &mut session, &mut sink).unwrap();

        assert!(report.stopped_early);
        assert_eq!(report.games_played, 0);
        assert!(policy.applied.is_empty());
    }

    #[test]
    fn test_stop_requested_mid_run_finishes_current_iteration() {
        // A sink standing in for an external watcher thread: it stores into
        // the shared handle during the first iteration, and the loop exits
        // before starting the second.
        struct StopAfterFirst {
            handle: std::sync::Arc<std::sync::atomic::AtomicBool>,
        }

        impl ProgressSink for StopAfterFirst {
            fn on_iteration_end(&mut self, _: usize, _: usize, _: usize, _: usize) {
                self.handle.store(true, Ordering::Relaxed);
            }
        }

        let mut policy = ScriptedPolicy::cycling((0..9).collect());
        let mut session = TrainingSession::with_seed(13);
        let mut sink = StopAfterFirst {
            handle: session.stop_handle(),
        };

        let trainer = Trainer::new(small_config());
        let report = trainer.train(&mut policy, &mut session, &mut sink).unwrap();

        assert!(report.stopped_early);
        assert_eq!(report.wins_per_iteration.len(), 1);
        assert_eq!(report.games_played, 4);
        assert_eq!(policy.applied.len(), 1);
    }

    #[test]
    fn test_losing_batch_applies_zero_update() {
        // Always playing slot 0 loses or draws every game, so the batch has
        // zero reward variance and the shaped rewards are all zero.
        let mut policy = ScriptedPolicy::cycling(vec![0]);
        let mut session = TrainingSession::with_seed(11);
        let mut sink = RecordingSink::new();

        let trainer = Trainer::new(TrainerConfig {
            num_iterations: 1,
            games_per_iteration: 5,
            ..small_config()
        });
        let report = trainer.train(&mut policy, &mut session, &mut sink).unwrap();

        assert_eq!(report.wins_per_iteration, vec![0]);
        assert_eq!(policy.applied.len(), 1);
        let update = &policy.applied[0];
        assert_eq!(update.get("w"), Some(&[0.0][..]));
    }

    #[test]
    fn test_final_win_rate() {
        let report = TrainingReport {
            wins_per_iteration: vec![1, 3],
            games_played: 8,
            stopped_early: false,
        };
        assert_eq!(report.final_win_rate(4), Some(0.75));

        let empty = TrainingReport {
            wins_per_iteration: Vec::new(),
            games_played: 0,
            stopped_early: true,
        };
        assert_eq!(empty.final_win_rate(4), None);
    }

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.num_iterations, 50);
        assert_eq!(config.games_per_iteration, 20);
        assert_eq!(config.discount_rate, 0.95);
        assert_eq!(config.learning_rate, 0.05);
    }
}
