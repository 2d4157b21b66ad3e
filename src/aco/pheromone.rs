//! Pheromone trail storage and the reinforce/evaporate update.
//!
//! The trail is mutated once per generation, after every ant of that
//! generation has finished: [`PheromoneMatrix::reinforce`] first, then
//! [`PheromoneMatrix::evaporate`] on the reinforced values.

use super::config::PheromonePolicy;
use super::heuristic::round_to;
use super::types::{DistanceMatrix, ScoredTour, Tour};
use crate::error::{AcoError, Result};
use rand::Rng;

/// N×N grid of pheromone intensities with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PheromoneMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PheromoneMatrix {
    /// Off-diagonal entries drawn independently from uniform `[0, 1)`,
    /// row-major, optionally rounded to `accuracy` decimal places.
    pub fn random<R: Rng>(n: usize, accuracy: Option<u32>, rng: &mut R) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    data[i * n + j] = round_to(rng.random::<f64>(), accuracy);
                }
            }
        }
        Self { n, data }
    }

    /// Every off-diagonal entry set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative.
    pub fn filled(n: usize, value: f64) -> Self {
        assert!(value >= 0.0, "pheromone cannot be negative, got {value}");
        let mut data = vec![value; n * n];
        for i in 0..n {
            data[i * n + i] = 0.0;
        }
        Self { n, data }
    }

    /// Number of nodes.
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Deposits pheromone along the tours the policy lets through.
    ///
    /// Plain deposits from every tour. Elitist and Min-Max keep only the
    /// best `floor(elite_proportion * colony_size)` tours (ties keep the
    /// earlier tour). Min-Max caps each single deposit at `upper_bound`
    /// but leaves the accumulated value unclamped.
    ///
    /// Returns the number of tours that deposited.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidTour`] if any tour is not a closed cycle over this
    /// matrix's nodes or has a non-finite length, and
    /// [`AcoError::ZeroFitness`] if a depositing tour has zero length. The
    /// matrix is left untouched in both cases.
    pub fn reinforce(
        &mut self,
        policy: &PheromonePolicy,
        tours: &[ScoredTour],
        q: f64,
        colony_size: usize,
    ) -> Result<usize> {
        for scored in tours {
            self.check_tour(scored)?;
        }

        let elite = select_elite(tours, policy.elite_count(colony_size));

        if let Some(zero) = elite.iter().find(|t| t.fitness <= 0.0) {
            return Err(AcoError::ZeroFitness {
                tour: zero.tour.to_string(),
            });
        }

        let cap = policy.deposit_cap();
        for scored in &elite {
            let deposit = match cap {
                Some(upper) => (q / scored.fitness).min(upper),
                None => q / scored.fitness,
            };
            for (i, j) in scored.tour.edges() {
                self.data[i * self.n + j] += deposit;
            }
        }
        Ok(elite.len())
    }

    fn check_tour(&self, scored: &ScoredTour) -> Result<()> {
        let reason = if !scored.tour.is_valid_cycle(self.n) {
            "not a closed Hamiltonian cycle"
        } else if !scored.fitness.is_finite() {
            "length is not finite"
        } else {
            return Ok(());
        };
        Err(AcoError::InvalidTour {
            tour: scored.tour.to_string(),
            nodes: self.n,
            reason: reason.into(),
        })
    }

    /// Multiplies every off-diagonal entry by `1 - rate`, then raises it to
    /// `floor` if one is given. The diagonal stays at zero.
    pub fn evaporate(&mut self, rate: f64, floor: Option<f64>) {
        let keep = 1.0 - rate;
        let n = self.n;
        for (idx, value) in self.data.iter_mut().enumerate() {
            if idx / n == idx % n {
                continue;
            }
            *value *= keep;
            if let Some(lower) = floor {
                *value = value.max(lower);
            }
        }
    }
}

/// Scores `tours` against `dist` and reinforces `pheromone` with them.
///
/// Same as [`PheromoneMatrix::reinforce`], but the lengths come from the
/// distance matrix rather than from the caller.
///
/// # Errors
///
/// [`AcoError::DegenerateGraph`] if `dist` and `pheromone` differ in size;
/// otherwise as [`PheromoneMatrix::reinforce`].
pub fn update_pheromone(
    policy: &PheromonePolicy,
    dist: &DistanceMatrix,
    tours: &[Tour],
    pheromone: &mut PheromoneMatrix,
    q: f64,
    colony_size: usize,
) -> Result<usize> {
    if dist.n() != pheromone.n() {
        return Err(AcoError::DegenerateGraph(format!(
            "distance matrix has {} nodes, pheromone matrix has {}",
            dist.n(),
            pheromone.n()
        )));
    }
    // Score only cycles over this graph; anything else fails in reinforce.
    let scored: Vec<ScoredTour> = tours
        .iter()
        .map(|tour| {
            let fitness = if tour.is_valid_cycle(dist.n()) {
                tour.fitness(dist)
            } else {
                f64::NAN
            };
            ScoredTour {
                tour: tour.clone(),
                fitness,
            }
        })
        .collect();
    pheromone.reinforce(policy, &scored, q, colony_size)
}

/// The `count` shortest tours, in their original order.
///
/// Equal lengths are resolved in favour of the earlier tour.
pub fn select_elite(tours: &[ScoredTour], count: usize) -> Vec<&ScoredTour> {
    if count >= tours.len() {
        return tours.iter().collect();
    }

    let mut order: Vec<usize> = (0..tours.len()).collect();
    // sort_by is stable: ties stay in discovery order
    order.sort_by(|&a, &b| {
        tours[a]
            .fitness
            .partial_cmp(&tours[b].fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(count);
    order.sort_unstable();
    order.into_iter().map(|k| &tours[k]).collect()
}
