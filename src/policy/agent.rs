use std::path::Path;

use burn::backend::ndarray::NdArray;
use burn::backend::Autodiff;
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, Optimizer};
use burn::prelude::*;
use burn::record::DefaultRecorder;
use burn::tensor::{activation, TensorData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CheckpointError;
use crate::game::CELLS;
use crate::policy::model::{ActionSample, AggregatedGradients, PolicyModel};
use crate::policy::network::{PolicyNetwork, PolicyNetworkConfig};

type InferBackend = NdArray<f32>;
type TrainBackend = Autodiff<InferBackend>;

/// File stem the network weights are saved under inside a checkpoint dir.
const NETWORK_FILE: &str = "policy_network";

/// Burn-backed policy: a small MLP over the flat board encoding with an Adam
/// optimizer behind the apply-gradients boundary.
pub struct PolicyAgent {
    network: PolicyNetwork<TrainBackend>,
    optimizer: burn::optim::adaptor::OptimizerAdaptor<
        burn::optim::Adam,
        PolicyNetwork<TrainBackend>,
        TrainBackend,
    >,
    hidden_layer_sizes: Vec<usize>,
    device: <TrainBackend as Backend>::Device,
    rng: StdRng,
}

impl PolicyAgent {
    pub fn new(hidden_layer_sizes: Vec<usize>) -> Self {
        Self::with_rng(hidden_layer_sizes, StdRng::from_os_rng())
    }

    /// Deterministic construction for tests and reproducible runs. The seed
    /// only fixes action sampling; weight init comes from the backend.
    pub fn with_seed(hidden_layer_sizes: Vec<usize>, seed: u64) -> Self {
        Self::with_rng(hidden_layer_sizes, StdRng::seed_from_u64(seed))
    }

    fn with_rng(hidden_layer_sizes: Vec<usize>, rng: StdRng) -> Self {
        let device = Default::default();
        let network = PolicyNetworkConfig::new(hidden_layer_sizes.clone()).init(&device);
        let optimizer = AdamConfig::new().init();
        PolicyAgent {
            network,
            optimizer,
            hidden_layer_sizes,
            device,
            rng,
        }
    }

    /// Sample one move without capturing gradients (evaluation/demo play).
    pub fn select_action(&mut self, board: &[f32; CELLS]) -> usize {
        let probs = self.action_probabilities(board);
        sample_categorical(&probs, &mut self.rng)
    }

    /// Softmax distribution over the nine slots for a board encoding.
    pub fn action_probabilities(&self, board: &[f32; CELLS]) -> Vec<f32> {
        let input = Tensor::<InferBackend, 1>::from_data(
            TensorData::from(board.as_slice()),
            &self.device,
        )
        .reshape([1, CELLS as i32]);
        let logits = self.network.valid().forward(input);
        activation::softmax(logits, 1).into_data().to_vec().unwrap()
    }

    /// Save network weights to a directory.
    pub fn save_to_dir(&self, dir: &Path) -> Result<(), CheckpointError> {
        let recorder = DefaultRecorder::default();
        self.network
            .clone()
            .valid()
            .save_file(dir.join(NETWORK_FILE), &recorder)
            .map_err(|e| CheckpointError::ModelSave(e.to_string()))?;
        Ok(())
    }

    /// Load network weights from a directory. The agent must have been
    /// constructed with the same hidden layer sizes the weights were saved
    /// with.
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<(), CheckpointError> {
        let recorder = DefaultRecorder::default();
        let config = PolicyNetworkConfig::new(self.hidden_layer_sizes.clone());
        let network: PolicyNetwork<TrainBackend> = config
            .init(&self.device)
            .load_file(dir.join(NETWORK_FILE), &recorder, &self.device)
            .map_err(|e| CheckpointError::ModelLoad(e.to_string()))?;
        self.network = network;
        Ok(())
    }
}

impl PolicyModel for PolicyAgent {
    fn sample_action(&mut self, board: &[f32; CELLS]) -> ActionSample {
        let input = Tensor::<TrainBackend, 1>::from_data(
            TensorData::from(board.as_slice()),
            &self.device,
        )
        .reshape([1, CELLS as i32]);
        let logits = self.network.forward(input);

        let probs: Vec<f32> = activation::softmax(logits.clone(), 1)
            .into_data()
            .to_vec()
            .unwrap();
        let action = sample_categorical(&probs, &mut self.rng);

        // Gradients of the sampled slot's negative log-likelihood. They are
        // captured now and scaled by the shaped reward once it is known.
        let mut onehot = [0.0f32; CELLS];
        onehot[action] = 1.0;
        let mask = Tensor::<TrainBackend, 1>::from_data(
            TensorData::from(onehot.as_slice()),
            &self.device,
        )
        .reshape([1, CELLS as i32]);
        let loss = -(activation::log_softmax(logits, 1) * mask).sum();
        let grads = loss.backward();

        ActionSample {
            action,
            gradients: self.network.capture_gradients(&grads),
        }
    }

    fn apply_gradients(&mut self, update: &AggregatedGradients, learning_rate: f64) {
        let grads = self.network.update_as_grads_params(update, &self.device);
        self.network = self
            .optimizer
            .step(learning_rate, self.network.clone(), grads);
    }

    fn hidden_layer_sizes(&self) -> Vec<usize> {
        self.hidden_layer_sizes.clone()
    }
}

/// Sample an index from a categorical distribution defined by probs.
fn sample_categorical(probs: &[f32], rng: &mut StdRng) -> usize {
    let r: f32 = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    // Fallback to last non-zero probability index
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}
