//! The REINFORCE gradient aggregation step: scale each captured per-step
//! gradient by its shaped reward, then average every step of every game in
//! the batch with equal weight.

use std::collections::BTreeMap;

use crate::policy::{AggregatedGradients, GradientCapture};

/// Combine a batch of per-step gradient captures into one update.
///
/// `batch[g][s]` is the capture for step `s` of game `g` and `shaped[g][s]`
/// its shaped reward. Every step contributes with the same weight regardless
/// of how long its game ran. Parameters are matched by name; a parameter
/// missing from some capture simply contributes nothing for that step.
pub fn scale_and_average_gradients(
    batch: Vec<Vec<GradientCapture>>,
    shaped: &[Vec<f32>],
) -> AggregatedGradients {
    let steps: usize = batch.iter().map(Vec::len).sum();
    let mut sums: BTreeMap<String, Vec<f32>> = BTreeMap::new();

    for (captures, rewards) in batch.iter().zip(shaped) {
        for (capture, &reward) in captures.iter().zip(rewards) {
            for (name, values) in capture.iter() {
                let sum = sums
                    .entry(name.to_string())
                    .or_insert_with(|| vec![0.0; values.len()]);
                for (acc, &v) in sum.iter_mut().zip(values) {
                    *acc += v * reward;
                }
            }
        }
    }

    let mut update = AggregatedGradients::new();
    if steps == 0 {
        return update;
    }
    for (name, mut sum) in sums {
        for value in &mut sum {
            *value /= steps as f32;
        }
        update.insert(name, sum);
    }
    update
}
