//! Colony execution loop.
//!
//! [`AcoRunner`] drives generations until the evaluation budget is spent:
//! build `colony_size` tours against a frozen trail → track the best →
//! reinforce → evaporate → repeat. There is no stagnation exit.

use super::config::AcoConfig;
use super::construct::TourConstructor;
use super::heuristic::HeuristicMatrix;
use super::pheromone::PheromoneMatrix;
use super::types::{DistanceMatrix, ScoredTour, Tour};
use crate::error::{AcoError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a colony run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Length of the best tour found.
    pub best_fitness: f64,

    /// The best tour found. The first tour reaching `best_fitness` wins.
    pub best_tour: Tour,

    /// Mean tour length of every full generation, in order.
    ///
    /// A trailing generation cut short by the budget is not recorded.
    pub generation_means: Vec<f64>,

    /// Number of generations executed, including a trailing partial one.
    pub generations: usize,

    /// Number of tours evaluated.
    pub evaluations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Trail after the last update.
    pub final_pheromone: PheromoneMatrix,
}

/// Executes the ant colony loop.
///
/// # Usage
///
/// ```
/// use u_aco::aco::{AcoConfig, AcoRunner, DistanceMatrix};
///
/// let dist = DistanceMatrix::new(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ]).unwrap();
/// let config = AcoConfig::default()
///     .with_colony_size(5)
///     .with_evaluation_budget(200)
///     .with_seed(42);
///
/// let result = AcoRunner::run(&dist, &config).unwrap();
/// assert_eq!(result.best_fitness, 6.0);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the colony.
    ///
    /// # Errors
    ///
    /// Configuration errors and degenerate graphs are reported before the
    /// first generation; [`AcoError::ZeroFitness`] can surface from a
    /// generation update.
    pub fn run(dist: &DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        Self::run_with_cancel(dist, config, None)
    }

    /// Runs the colony with an optional cancellation token.
    ///
    /// The flag is checked between generations; a generation that has
    /// started always completes its update.
    pub fn run_with_cancel(
        dist: &DistanceMatrix,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        config.validate()?;
        if config.start_node >= dist.n() {
            return Err(AcoError::Configuration(format!(
                "start_node {} out of range for {} nodes",
                config.start_node,
                dist.n()
            )));
        }

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let (heuristic, mut pheromone) = initialize(dist, config.accuracy, &mut rng)?;

        info!(
            nodes = dist.n(),
            colony = config.colony_size,
            budget = config.evaluation_budget,
            policy = %config.policy,
            "starting ant colony run"
        );

        let mut best_fitness = f64::INFINITY;
        let mut best_tour = Tour::default();
        let mut generation_means = Vec::new();
        let mut evaluations = 0usize;
        let mut generations = 0usize;
        let mut cancelled = false;

        while evaluations < config.evaluation_budget {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let batch = config
                .colony_size
                .min(config.evaluation_budget - evaluations);
            // One seed per ant, drawn in ant order, so the tours do not
            // depend on how the batch is scheduled.
            let seeds: Vec<u64> = (0..batch).map(|_| rng.random()).collect();

            let tours = {
                let constructor = TourConstructor::new(
                    &heuristic,
                    &pheromone,
                    config.alpha,
                    config.beta,
                    config.start_node,
                );
                build_generation(&constructor, dist, &seeds, config.parallel)
            };
            evaluations += batch;

            for scored in &tours {
                if scored.fitness < best_fitness {
                    best_fitness = scored.fitness;
                    best_tour = scored.tour.clone();
                }
            }

            pheromone.reinforce(&config.policy, &tours, config.q, config.colony_size)?;
            pheromone.evaporate(config.evaporation_rate, config.policy.evaporation_floor());
            generations += 1;

            if batch == config.colony_size {
                let mean = tours.iter().map(|t| t.fitness).sum::<f64>() / batch as f64;
                generation_means.push(mean);
                debug!(generation = generations, mean, best = best_fitness, "generation done");
            }
        }

        info!(
            best = best_fitness,
            generations,
            evaluations,
            cancelled,
            "ant colony run finished"
        );

        Ok(AcoResult {
            best_fitness,
            best_tour,
            generation_means,
            generations,
            evaluations,
            cancelled,
            final_pheromone: pheromone,
        })
    }
}

/// Derives the heuristic and draws the initial trail for `dist`.
///
/// # Errors
///
/// [`AcoError::DegenerateGraph`] on a zero-cost off-diagonal edge.
pub fn initialize<R: Rng>(
    dist: &DistanceMatrix,
    accuracy: Option<u32>,
    rng: &mut R,
) -> Result<(HeuristicMatrix, PheromoneMatrix)> {
    let heuristic = HeuristicMatrix::from_distances(dist, accuracy)?;
    let pheromone = PheromoneMatrix::random(dist.n(), accuracy, rng);
    Ok((heuristic, pheromone))
}

/// Builds and scores one tour per seed, in seed order.
fn build_generation(
    constructor: &TourConstructor<'_>,
    dist: &DistanceMatrix,
    seeds: &[u64],
    parallel: bool,
) -> Vec<ScoredTour> {
    let build = |&seed: &u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        ScoredTour::new(constructor.construct(&mut rng), dist)
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            return seeds.par_iter().map(build).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    seeds.iter().map(build).collect()
}
