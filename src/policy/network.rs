use burn::module::Param;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::optim::GradientsParams;
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::TensorData;

use crate::game::CELLS;
use crate::policy::model::{AggregatedGradients, GradientCapture};

/// Policy network for controlling the tic-tac-toe game.
///
/// ```text
/// Input:   [batch, 9]   flat board encoding (0 / +1 / -1)
/// Hidden:  Linear + ReLU per configured layer size
/// Output:  Linear -> 9  (one logit per slot)
/// ```
#[derive(Module, Debug)]
pub struct PolicyNetwork<B: Backend> {
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
    relu: Relu,
}

#[derive(Config, Debug)]
pub struct PolicyNetworkConfig {
    pub hidden_layer_sizes: Vec<usize>,
}

impl PolicyNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PolicyNetwork<B> {
        let mut hidden = Vec::with_capacity(self.hidden_layer_sizes.len());
        let mut in_features = CELLS;
        for &size in &self.hidden_layer_sizes {
            hidden.push(LinearConfig::new(in_features, size).init(device));
            in_features = size;
        }
        PolicyNetwork {
            hidden,
            output: LinearConfig::new(in_features, CELLS).init(device),
            relu: Relu::new(),
        }
    }
}

impl<B: Backend> PolicyNetwork<B> {
    /// Forward pass: input [batch, 9] -> logits [batch, 9].
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = input;
        for layer in &self.hidden {
            x = self.relu.forward(layer.forward(x));
        }
        self.output.forward(x)
    }
}

impl<B: AutodiffBackend> PolicyNetwork<B> {
    /// Flatten the gradient of every trainable parameter out of a backward
    /// pass into a named capture.
    pub fn capture_gradients(&self, grads: &B::Gradients) -> GradientCapture {
        let mut capture = GradientCapture::new();
        for (i, layer) in self.hidden.iter().enumerate() {
            capture.insert(format!("hidden{i}.weight"), grad_values(&layer.weight, grads));
            if let Some(bias) = &layer.bias {
                capture.insert(format!("hidden{i}.bias"), grad_values(bias, grads));
            }
        }
        capture.insert("output.weight", grad_values(&self.output.weight, grads));
        if let Some(bias) = &self.output.bias {
            capture.insert("output.bias", grad_values(bias, grads));
        }
        capture
    }

    /// Rebuild an aggregated update as optimizer-ready gradients, matching
    /// each named value back to its parameter's id and shape.
    pub fn update_as_grads_params(
        &self,
        update: &AggregatedGradients,
        device: &B::Device,
    ) -> GradientsParams {
        let mut params = GradientsParams::new();
        for (i, layer) in self.hidden.iter().enumerate() {
            register_grad(
                &mut params,
                &layer.weight,
                update.get(&format!("hidden{i}.weight")),
                device,
            );
            if let Some(bias) = &layer.bias {
                register_grad(&mut params, bias, update.get(&format!("hidden{i}.bias")), device);
            }
        }
        register_grad(&mut params, &self.output.weight, update.get("output.weight"), device);
        if let Some(bias) = &self.output.bias {
            register_grad(&mut params, bias, update.get("output.bias"), device);
        }
        params
    }
}

fn grad_values<B: AutodiffBackend, const D: usize>(
    param: &Param<Tensor<B, D>>,
    grads: &B::Gradients,
) -> Vec<f32> {
    match param.grad(grads) {
        Some(grad) => grad.into_data().to_vec().unwrap(),
        None => vec![0.0; param.shape().num_elements()],
    }
}

fn register_grad<B: AutodiffBackend, const D: usize>(
    params: &mut GradientsParams,
    param: &Param<Tensor<B, D>>,
    values: Option<&[f32]>,
    device: &B::Device,
) {
    let Some(values) = values else {
        return;
    };
    if values.len() != param.shape().num_elements() {
        return;
    }
    let tensor = Tensor::<B::InnerBackend, 1>::from_data(TensorData::from(values), device)
        .reshape(param.dims());
    params.register(param.id, tensor);
}
