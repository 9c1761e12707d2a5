use serde::{Deserialize, Serialize};

/// Metrics snapshot at checkpoint time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetrics {
    pub win_rate: f32,
    pub games_played: usize,
    pub iterations_completed: usize,
}

/// Hyperparameters recorded in checkpoint metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointHyperparameters {
    pub learning_rate: f64,
    pub discount_rate: f32,
    pub games_per_iteration: usize,
}

/// Top-level checkpoint metadata written to metadata.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub iteration: usize,
    pub timestamp: u64,
    pub algorithm: String,
    pub hidden_layer_sizes: Vec<usize>,
    pub metrics: CheckpointMetrics,
    pub hyperparameters: CheckpointHyperparameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serde_roundtrip() {
        let meta = CheckpointMetadata {
            iteration: 40,
            timestamp: 1700000000,
            algorithm: "REINFORCE".to_string(),
            hidden_layer_sizes: vec![128, 64],
            metrics: CheckpointMetrics {
                win_rate: 0.72,
                games_played: 800,
                iterations_completed: 40,
            },
            hyperparameters: CheckpointHyperparameters {
                learning_rate: 0.05,
                discount_rate: 0.95,
                games_per_iteration: 20,
            },
        };

        let json = serde_json::to_string_pretty(&meta).unwrap();
        let deserialized: CheckpointMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.iteration, 40);
        assert_eq!(deserialized.algorithm, "REINFORCE");
        assert_eq!(deserialized.hidden_layer_sizes, vec![128, 64]);
        assert!((deserialized.metrics.win_rate - 0.72).abs() < 1e-6);
        assert!((deserialized.hyperparameters.discount_rate - 0.95).abs() < 1e-6);
    }
}
