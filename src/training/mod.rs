//! The REINFORCE training pipeline: episode rollout, reward shaping,
//! gradient aggregation, and the iteration loop that ties them together.

mod episode;
mod gradients;
mod rewards;
mod trainer;

pub use episode::{play_episode, EpisodeRecord};
pub use gradients::scale_and_average_gradients;
pub use rewards::{discount_and_normalize_rewards, discount_rewards, expand_terminal_reward};
pub use trainer::{
    ProgressSink, StdoutProgress, Trainer, TrainerConfig, TrainingReport, TrainingSession,
};
