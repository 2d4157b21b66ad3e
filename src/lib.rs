//! Ant Colony Optimization for the Traveling Salesman Problem.
//!
//! Provides the colony loop and its building blocks:
//!
//! - **Tour construction**: roulette-wheel selection over
//!   `pheromone^alpha * (1/distance)^beta`, with a uniform fallback when
//!   every candidate has zero desirability.
//! - **Pheromone policies**: plain Ant System, elitist reinforcement, and
//!   the Min-Max Ant System (capped deposits, floored evaporation).
//! - **Runner**: evaluation-budget driven generations with seeded,
//!   schedule-independent randomness (optional rayon parallelism behind
//!   the `parallel` feature).
//!
//! # Architecture
//!
//! Graph loading, plotting and parameter sweeps live with the caller: the
//! crate takes a [`aco::DistanceMatrix`] and an [`aco::AcoConfig`] and
//! returns an [`aco::AcoResult`].

pub mod aco;
pub mod error;

pub use error::{AcoError, Result};
