//! Probabilistic tour construction for a single ant.
//!
//! The ant starts at the start node and repeatedly moves to an unvisited
//! node chosen by roulette wheel over `pher^alpha * heuristic^beta`, then
//! closes the cycle. Construction only reads the shared matrices, so ants
//! of one generation can be built independently.
//!
//! `powf` follows IEEE-754: `0^0 == 1`, so with `alpha == 0` an edge with
//! zero pheromone is still weighted by its heuristic alone.

use super::heuristic::HeuristicMatrix;
use super::pheromone::PheromoneMatrix;
use super::types::{DistanceMatrix, Tour};
use rand::Rng;
use tracing::{trace, warn};

/// Read-only view of everything an ant needs to build a tour.
#[derive(Debug, Clone, Copy)]
pub struct TourConstructor<'a> {
    heuristic: &'a HeuristicMatrix,
    pheromone: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
    start_node: usize,
}

impl<'a> TourConstructor<'a> {
    /// # Panics
    ///
    /// Panics if the matrices disagree in size or `start_node` is out of range.
    pub fn new(
        heuristic: &'a HeuristicMatrix,
        pheromone: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
        start_node: usize,
    ) -> Self {
        assert_eq!(
            heuristic.n(),
            pheromone.n(),
            "heuristic and pheromone matrices differ in size"
        );
        assert!(
            start_node < heuristic.n(),
            "start node {start_node} out of range for {} nodes",
            heuristic.n()
        );
        Self {
            heuristic,
            pheromone,
            alpha,
            beta,
            start_node,
        }
    }

    /// Builds one closed tour.
    pub fn construct<R: Rng>(&self, rng: &mut R) -> Tour {
        let n = self.heuristic.n();
        let mut unvisited: Vec<usize> = (0..n).filter(|&j| j != self.start_node).collect();
        let mut nodes = Vec::with_capacity(n + 1);
        nodes.push(self.start_node);

        let mut weights = Vec::with_capacity(unvisited.len());
        let mut current = self.start_node;
        while !unvisited.is_empty() {
            let pos = self.choose_next(current, &unvisited, &mut weights, rng);
            current = unvisited.remove(pos);
            nodes.push(current);
        }

        nodes.push(self.start_node);
        Tour::from_nodes(nodes)
    }

    /// Position in `unvisited` of the next node.
    ///
    /// `unvisited` is kept in ascending node order, which fixes the scan
    /// order of the roulette wheel for a given random draw.
    fn choose_next<R: Rng>(
        &self,
        current: usize,
        unvisited: &[usize],
        weights: &mut Vec<f64>,
        rng: &mut R,
    ) -> usize {
        let pher = self.pheromone.row(current);
        let heur = self.heuristic.row(current);

        weights.clear();
        weights.extend(
            unvisited
                .iter()
                .map(|&j| pher[j].powf(self.alpha) * heur[j].powf(self.beta)),
        );
        let total: f64 = weights.iter().sum();

        // All-zero (or overflowed) desirability: pick uniformly instead.
        if !(total > 0.0 && total.is_finite()) {
            trace!(current, total, "no usable desirability, choosing uniformly");
            return rng.random_range(0..unvisited.len());
        }

        let r: f64 = rng.random();
        let mut cumulative = 0.0;
        for (pos, w) in weights.iter().enumerate() {
            cumulative += w / total;
            if cumulative >= r {
                return pos;
            }
        }

        // Rounding left the cumulative sum a hair below r.
        warn!(current, cumulative, r, "roulette scan overran, taking last candidate");
        weights
            .iter()
            .rposition(|&w| w > 0.0)
            .unwrap_or(unvisited.len() - 1)
    }
}

/// Builds one tour; see [`TourConstructor`].
///
/// `dist` is only consulted for its size, which must match the matrices.
///
/// # Panics
///
/// Panics if `dist`, `heuristic` and `pheromone` differ in size, or if
/// `start_node` is out of range. [`AcoRunner`](super::AcoRunner) checks
/// both before its first generation.
pub fn construct_tour<R: Rng>(
    dist: &DistanceMatrix,
    heuristic: &HeuristicMatrix,
    pheromone: &PheromoneMatrix,
    alpha: f64,
    beta: f64,
    start_node: usize,
    rng: &mut R,
) -> Tour {
    assert_eq!(dist.n(), heuristic.n(), "distance and heuristic matrices differ in size");
    TourConstructor::new(heuristic, pheromone, alpha, beta, start_node).construct(rng)
}
