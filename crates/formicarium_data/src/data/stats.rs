use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ant::{AntRole, AntState};
use super::pheromone::PheromoneKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Raining,
}

/// Queen reproduction cycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueenPhase {
    #[default]
    Idle,
    NuptialFlight,
    PostFlight,
}

/// Reproduction pipeline counts. Individuals move strictly forward:
/// egg -> larva -> pupa -> adult -> spawned ant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroodCounts {
    pub eggs: u32,
    pub larvae: u32,
    pub pupae: u32,
    pub adults: u32,
}

impl BroodCounts {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.eggs + self.larvae + self.pupae + self.adults
    }
}

/// Read-only view of the simulation state for presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub tick: u64,
    pub sim_time: f64,
    pub population: usize,
    pub role_counts: HashMap<AntRole, usize>,
    pub state_counts: HashMap<AntState, usize>,
    pub food_storage: f64,
    pub brood: BroodCounts,
    pub generation: u32,
    pub queen_present: bool,
    pub queen_phase: QueenPhase,
    pub deposit_counts: HashMap<PheromoneKind, usize>,
    pub active_food_sources: usize,
    pub termites: usize,
    pub corpses: usize,
    pub puddles: usize,
    pub weather: Weather,
    pub under_attack: bool,
    pub total_deaths: u64,
}
