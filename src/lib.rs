//! # ML Tic-Tac-Toe
//!
//! A tic-tac-toe playing agent trained with the REINFORCE policy gradient
//! algorithm against a uniform-random opponent, built on the Burn ML
//! framework.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, state machine
//! - [`policy`] — Policy model trait, neural network, and Burn-backed agent
//! - [`training`] — Episode rollout, reward shaping, gradient aggregation, trainer
//! - [`checkpoint`] — Model persistence and versioning
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

#![recursion_limit = "256"]

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod policy;
pub mod training;
