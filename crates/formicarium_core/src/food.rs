//! Food resource management: depletable nodes, seeding, collection.

use formicarium_data::FoodSource;
use rand::Rng;

use crate::config::{EventConfig, WorldConfig};

/// Seconds a drained source may linger near-empty before it is forced
/// inactive.
const DEPLETION_GRACE: f64 = 2.0;
/// Remaining amount below which the grace window starts counting.
const NEAR_EMPTY: f64 = 1e-3;

pub struct FoodManager {
    sources: Vec<FoodSource>,
    next_id: u64,
}

impl FoodManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            next_id: 0,
        }
    }

    /// Seeds the initial sources uniformly inside the world bounds.
    pub fn seed<R: Rng>(&mut self, world: &WorldConfig, events: &EventConfig, rng: &mut R) {
        for _ in 0..world.initial_food_sources {
            let x = rng.gen_range(0.0..world.width);
            let y = rng.gen_range(0.0..world.height);
            let amount = rng.gen_range(events.food_amount_min..=events.food_amount_max);
            self.add_source(x, y, amount);
        }
    }

    pub fn add_source(&mut self, x: f64, y: f64, amount: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.sources.push(FoodSource::new(id, x, y, amount));
        id
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&FoodSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// An id resolves only while the source is still active.
    #[must_use]
    pub fn is_valid(&self, id: u64) -> bool {
        self.get(id).is_some_and(|s| s.active)
    }

    /// Nearest active source within `radius` of the query point.
    #[must_use]
    pub fn nearest_active(&self, x: f64, y: f64, radius: f64) -> Option<&FoodSource> {
        let mut best: Option<(&FoodSource, f64)> = None;
        for source in self.sources.iter().filter(|s| s.active) {
            let dx = source.x - x;
            let dy = source.y - y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > radius * radius {
                continue;
            }
            if best.map_or(true, |(_, d)| dist_sq < d) {
                best = Some((source, dist_sq));
            }
        }
        best.map(|(s, _)| s)
    }

    /// Transfers up to `want` units out of a source. Returns the amount
    /// actually taken; a stale or depleted id yields zero.
    pub fn collect(&mut self, id: u64, want: f64) -> f64 {
        let Some(source) = self.sources.iter_mut().find(|s| s.id == id && s.active) else {
            return 0.0;
        };
        let taken = want.min(source.amount).max(0.0);
        source.amount -= taken;
        taken
    }

    /// Advances grace windows; returns sources that depleted this tick.
    pub fn tick(&mut self, dt: f64) -> Vec<u64> {
        let mut depleted = Vec::new();
        for source in &mut self.sources {
            if !source.active {
                continue;
            }
            if source.amount <= NEAR_EMPTY {
                source.grace += dt;
                if source.amount <= 0.0 || source.grace >= DEPLETION_GRACE {
                    source.amount = 0.0;
                    source.active = false;
                    depleted.push(source.id);
                }
            } else {
                source.grace = 0.0;
            }
        }
        depleted
    }

    /// Destroys a source outright (termite attack). Returns false for a
    /// stale id.
    pub fn destroy(&mut self, id: u64) -> bool {
        match self.sources.iter_mut().find(|s| s.id == id && s.active) {
            Some(source) => {
                source.amount = 0.0;
                source.active = false;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sources.iter().filter(|s| s.active).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodSource> {
        self.sources.iter()
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }
}

impl Default for FoodManager {
    fn default() -> Self {
        Self::new()
    }
}
