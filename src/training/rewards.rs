//! Reward shaping for REINFORCE: expand each game's single terminal reward
//! backward through its steps, then normalize across the whole batch so that
//! above-average outcomes push their moves up and below-average ones push
//! them down.

/// Place `terminal` at the last step of a `len`-step episode, zeros before it.
pub fn expand_terminal_reward(terminal: f32, len: usize) -> Vec<f32> {
    let mut rewards = vec![0.0; len];
    if let Some(last) = rewards.last_mut() {
        *last = terminal;
    }
    rewards
}

/// Discount a per-step reward sequence backward: each step earns its own
/// reward plus `rate` times the running total of everything after it.
pub fn discount_rewards(rewards: &[f32], rate: f32) -> Vec<f32> {
    let mut discounted = vec![0.0; rewards.len()];
    let mut running = 0.0;
    for i in (0..rewards.len()).rev() {
        running = rate * running + rewards[i];
        discounted[i] = running;
    }
    discounted
}

/// Discount every sequence, then shift and scale by the mean and population
/// standard deviation of the whole batch pooled together.
///
/// A batch with zero variance (every game drawn or lost, for example) has no
/// learning signal; it shapes to all zeros rather than dividing by zero.
pub fn discount_and_normalize_rewards(sequences: &[Vec<f32>], rate: f32) -> Vec<Vec<f32>> {
    let discounted: Vec<Vec<f32>> = sequences
        .iter()
        .map(|rewards| discount_rewards(rewards, rate))
        .collect();

    let count: usize = discounted.iter().map(Vec::len).sum();
    if count == 0 {
        return discounted;
    }

    let sum: f32 = discounted.iter().flatten().sum();
    let mean = sum / count as f32;
    let variance: f32 = discounted
        .iter()
        .flatten()
        .map(|r| (r - mean).powi(2))
        .sum::<f32>()
        / count as f32;
    let std = variance.sqrt();

    if std == 0.0 {
        return discounted
            .iter()
            .map(|rewards| vec![0.0; rewards.len()])
            .collect();
    }

    discounted
        .into_iter()
        .map(|rewards| rewards.into_iter().map(|r| (r - mean) / std).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_expand_terminal_reward() {
        assert_eq!(expand_terminal_reward(1.0, 4), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(expand_terminal_reward(1.0, 1), vec![1.0]);
        assert_eq!(expand_terminal_reward(1.0, 0), Vec::<f32>::new());
    }

    #[test]
    fn test_discount_terminal_reward_decays_geometrically() {
        let rewards = expand_terminal_reward(1.0, 5);
        let discounted = discount_rewards(&rewards, 0.9);
        for (i, &value) in discounted.iter().enumerate() {
            let expected = 0.9f32.powi((5 - 1 - i) as i32);
            assert!(close(value, expected), "step {i}: {value} vs {expected}");
        }
    }

    #[test]
    fn test_discount_accumulates_intermediate_rewards() {
        let discounted = discount_rewards(&[1.0, 0.0, 2.0], 0.5);
        assert!(close(discounted[2], 2.0));
        assert!(close(discounted[1], 1.0));
        assert!(close(discounted[0], 1.5));
    }

    #[test]
    fn test_normalized_batch_has_zero_mean_unit_std() {
        let sequences = vec![
            expand_terminal_reward(1.0, 3),
            expand_terminal_reward(0.0, 5),
            expand_terminal_reward(1.0, 7),
        ];
        let shaped = discount_and_normalize_rewards(&sequences, 0.95);

        assert_eq!(shaped.len(), 3);
        for (shaped_seq, seq) in shaped.iter().zip(&sequences) {
            assert_eq!(shaped_seq.len(), seq.len());
        }

        let count: usize = shaped.iter().map(Vec::len).sum();
        let mean: f32 = shaped.iter().flatten().sum::<f32>() / count as f32;
        let variance: f32 = shaped
            .iter()
            .flatten()
            .map(|r| (r - mean).powi(2))
            .sum::<f32>()
            / count as f32;
        assert!(close(mean, 0.0), "mean = {mean}");
        assert!(close(variance.sqrt(), 1.0), "std = {}", variance.sqrt());
    }

    #[test]
    fn test_zero_variance_batch_shapes_to_zeros() {
        let sequences = vec![expand_terminal_reward(0.0, 4), expand_terminal_reward(0.0, 6)];
        let shaped = discount_and_normalize_rewards(&sequences, 0.95);
        for seq in &shaped {
            assert!(seq.iter().all(|&r| r == 0.0));
        }
    }

    #[test]
    fn test_single_step_win_batch_shapes_to_zeros() {
        // One game, one step: the lone value equals the mean, so variance
        // vanishes even though the reward was nonzero.
        let shaped = discount_and_normalize_rewards(&[vec![1.0]], 0.95);
        assert_eq!(shaped, vec![vec![0.0]]);
    }

    #[test]
    fn test_empty_batch() {
        let shaped = discount_and_normalize_rewards(&[], 0.95);
        assert!(shaped.is_empty());
    }
}
