//! Per-tick agent systems.
//!
//! Ants read the world through a [`SystemContext`] and mutate only
//! themselves directly; every write to a shared subsystem is expressed as
//! an [`AntCommand`] and applied sequentially by the world after the
//! pass. This keeps the transition logic a function of
//! `(state, context)` and makes the tick order auditable.

pub mod behavior;
pub mod movement;

use formicarium_data::{Corpse, PheromoneKind, Termite, Weather};

use crate::config::SimConfig;
use crate::food::FoodManager;
use crate::hazard::HazardField;
use crate::pheromone::PheromoneField;
use crate::terrain::{TerrainQuery, WorldBounds};

/// By-value facts about the colony an ant can act on without borrowing
/// the roster it lives in.
#[derive(Debug, Clone, Copy)]
pub struct ColonyView {
    pub home_x: f64,
    pub home_y: f64,
    pub under_attack: bool,
}

/// Shared subsystem references for one ant pass.
pub struct SystemContext<'a> {
    pub config: &'a SimConfig,
    pub pheromones: &'a PheromoneField,
    pub food: &'a FoodManager,
    pub hazards: &'a HazardField,
    pub termites: &'a [Termite],
    pub corpses: &'a [Corpse],
    pub colony: ColonyView,
    pub terrain: &'a dyn TerrainQuery,
    pub bounds: WorldBounds,
    pub weather: Weather,
    pub dt: f64,
}

/// Deferred mutation of shared state, applied by the world in emission
/// order once the ant pass is complete.
#[derive(Debug, Clone)]
pub enum AntCommand {
    DropPheromone {
        x: f64,
        y: f64,
        kind: PheromoneKind,
        base: f32,
    },
    BeginFollow {
        deposit: u64,
    },
    EndFollow {
        deposit: u64,
    },
    CollectFood {
        ant: usize,
        source: u64,
    },
    StoreFood {
        amount: f64,
    },
    StrikeTermite {
        termite: u64,
        damage: f64,
    },
    CollectCorpse {
        corpse: u64,
    },
    NourishBrood,
    HazardBurst {
        puddle: u64,
    },
}
