//! Checkpoint persistence: network weights plus a metadata.json per
//! checkpoint directory, with a `latest` symlink and pruning.

mod manager;
mod metadata;

pub use manager::{CheckpointManager, CheckpointManagerConfig};
pub use metadata::{CheckpointHyperparameters, CheckpointMetadata, CheckpointMetrics};
