//! The policy function approximator boundary: the [`PolicyModel`] trait the
//! trainer drives, the opaque gradient value types, and the concrete
//! burn-backed network + agent.

mod agent;
mod model;
mod network;

pub use agent::PolicyAgent;
pub use model::{ActionSample, AggregatedGradients, GradientCapture, PolicyModel};
pub use network::{PolicyNetwork, PolicyNetworkConfig};
