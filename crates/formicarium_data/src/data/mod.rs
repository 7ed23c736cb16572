//! Core data structures for the Formicarium simulation.

pub mod ant;
pub mod events;
pub mod pheromone;
pub mod resource;
pub mod stats;
pub mod termite;
