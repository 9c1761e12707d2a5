use rand::Rng;

use crate::error::TrainingError;
use crate::game::{Game, GameStatus, Player, CELLS};
use crate::policy::{GradientCapture, PolicyModel};

/// Everything one rollout produces: a gradient capture per learning-side
/// move plus the game's single terminal reward.
#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    pub gradients: Vec<GradientCapture>,
    pub terminal_reward: f32,
    pub won: bool,
}

impl EpisodeRecord {
    /// Number of learning-side moves in the episode.
    pub fn moves(&self) -> usize {
        self.gradients.len()
    }
}

/// Play one game to completion: X samples from the policy, O answers with a
/// uniform-random move, until the status leaves `Playing` or the nine-move
/// cap is hit (an implicit draw).
///
/// Terminal reward is 1.0 only for an X win; a draw, an O win, and the move
/// cap are all worth 0.0. Any engine error is a defect in this roller and is
/// fatal to the run.
pub fn play_episode<P: PolicyModel, R: Rng + ?Sized>(
    policy: &mut P,
    rng: &mut R,
) -> Result<EpisodeRecord, TrainingError> {
    let mut game = Game::new();
    let mut gradients = Vec::with_capacity(CELLS);

    for _ in 0..CELLS {
        let sample = policy.sample_action(&game.board_state());
        gradients.push(sample.gradients);

        let status = game.perform_move(Player::X, sample.action)?;
        if status == GameStatus::Playing {
            game.perform_random_move(Player::O, rng)?;
        }
        if game.status().is_terminal() {
            break;
        }
    }

    let won = game.status() == GameStatus::Won(Player::X);
    Ok(EpisodeRecord {
        gradients,
        terminal_reward: if won { 1.0 } else { 0.0 },
        won,
    })
}
