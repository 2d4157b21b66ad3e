//! Ant Colony Optimization for the Traveling Salesman Problem.
//!
//! A colony of ants builds tours over a distance graph, biased by a
//! pheromone trail and a static inverse-distance heuristic. After each
//! generation the trail is reinforced along the tours and then decays.
//! Three reinforcement policies share the same loop:
//!
//! - **Plain** (Ant System): every ant deposits.
//! - **Elitist**: only the best fraction of the colony deposits.
//! - **Min-Max**: elitist deposits, each capped, with a floor on decay.
//!
//! # Key Types
//!
//! - [`DistanceMatrix`]: the caller-supplied graph
//! - [`AcoConfig`] / [`PheromonePolicy`]: parameters
//! - [`AcoRunner`]: executes the generation loop
//! - [`AcoResult`]: best tour, its length and per-generation means
//!
//! The run stops when `evaluation_budget` tours have been built; there is
//! no early exit on stagnation.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Stützle & Hoos (2000), "MAX-MIN Ant System"

mod config;
mod construct;
mod heuristic;
mod pheromone;
mod runner;
mod types;

pub use config::{AcoConfig, PheromonePolicy};
pub use construct::{construct_tour, TourConstructor};
pub use heuristic::{HeuristicMatrix, MAX_ACCURACY};
pub use pheromone::{select_elite, update_pheromone, PheromoneMatrix};
pub use runner::{initialize, AcoResult, AcoRunner};
pub use types::{DistanceMatrix, ScoredTour, Tour};
