//! Read-only snapshot assembly for presentation layers.

use std::collections::HashMap;

use formicarium_data::{PheromoneKind, SimSnapshot};

use crate::world::World;

/// Collects the plain numeric view of the world the host is allowed to
/// see. Nothing here can mutate simulation state.
#[must_use]
pub fn capture(world: &World) -> SimSnapshot {
    let mut role_counts = HashMap::new();
    let mut state_counts = HashMap::new();
    for ant in &world.colony.ants {
        *role_counts.entry(ant.role).or_insert(0) += 1;
        *state_counts.entry(ant.state).or_insert(0) += 1;
    }

    let mut deposit_counts = HashMap::new();
    for kind in PheromoneKind::ALL {
        deposit_counts.insert(kind, world.pheromones.count_of(kind));
    }

    SimSnapshot {
        tick: world.tick,
        sim_time: world.sim_time(),
        population: world.colony.population(),
        role_counts,
        state_counts,
        food_storage: world.colony.storage,
        brood: world.colony.brood,
        generation: world.colony.generation,
        queen_present: world.colony.queen.is_some(),
        queen_phase: world.colony.queen_phase,
        deposit_counts,
        active_food_sources: world.food.active_count(),
        termites: world.termites.len(),
        corpses: world.corpses.len(),
        puddles: world.hazards.len(),
        weather: world.weather,
        under_attack: world.under_attack,
        total_deaths: world.colony.total_deaths,
    }
}
