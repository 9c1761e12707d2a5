use std::collections::BTreeMap;

use crate::game::CELLS;

/// Parameter gradients captured for one sampled action, keyed by parameter
/// name. The handle is opaque to the training loop: all it supports is what
/// the gradient aggregator needs — scalar multiplication and elementwise
/// accumulation — so any numeric backend can stand behind it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientCapture {
    params: BTreeMap<String, Vec<f32>>,
}

impl GradientCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f32>) {
        self.params.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.params.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// One aggregated gradient per trainable parameter, ready to hand to the
/// optimizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedGradients {
    params: BTreeMap<String, Vec<f32>>,
}

impl AggregatedGradients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f32>) {
        self.params.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.params.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A sampled action together with the gradients of its negative
/// log-likelihood, captured before the eventual reward is known.
#[derive(Debug, Clone)]
pub struct ActionSample {
    pub action: usize,
    pub gradients: GradientCapture,
}

/// The policy function approximator as seen by the training loop.
///
/// The trainer only samples actions and hands back aggregated gradients; the
/// network architecture, the optimizer's update rule, and persistence all
/// live behind this boundary.
pub trait PolicyModel {
    /// Sample a slot in `[0, 9)` from the categorical distribution the model
    /// assigns to `board`, capturing the parameter gradients of the sampled
    /// action. No slot is masked out: the model is free to pick an occupied
    /// cell, which the engine treats as a pass.
    fn sample_action(&mut self, board: &[f32; CELLS]) -> ActionSample;

    /// Apply one aggregated gradient per parameter through the model's
    /// optimizer. `learning_rate` is forwarded verbatim.
    fn apply_gradients(&mut self, update: &AggregatedGradients, learning_rate: f64);

    /// Sizes of the model's hidden layers, for persistence metadata.
    fn hidden_layer_sizes(&self) -> Vec<usize>;
}
