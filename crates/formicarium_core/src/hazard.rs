//! Puddle hazards: static damage zones that teach the colony to stay away
//! through emergent Danger signal reinforcement.
//!
//! The field itself holds no per-ant state; exposure clocks live on the
//! ants. What it owns is the puddle set, the per-puddle death tally, and
//! the warning-burst emission: the more ants a puddle has killed, the
//! stronger and denser the Danger marks radiating from it.

use std::f64::consts::TAU;

use formicarium_data::{PheromoneKind, Puddle};
use rand::Rng;

use crate::config::HazardConfig;
use crate::pheromone::PheromoneField;

pub struct HazardField {
    config: HazardConfig,
    puddles: Vec<Puddle>,
    next_id: u64,
}

impl HazardField {
    #[must_use]
    pub fn new(config: HazardConfig) -> Self {
        Self {
            config,
            puddles: Vec::new(),
            next_id: 0,
        }
    }

    /// Seeds the initial puddles inside the world bounds.
    pub fn seed<R: Rng>(&mut self, count: usize, width: f64, height: f64, rng: &mut R) {
        for _ in 0..count {
            let x = rng.gen_range(0.0..width);
            let y = rng.gen_range(0.0..height);
            self.add_puddle(x, y);
        }
    }

    /// Adds a puddle unless the cap is reached. Returns its id.
    pub fn add_puddle(&mut self, x: f64, y: f64) -> Option<u64> {
        if self.puddles.len() >= self.config.max_puddles {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.puddles
            .push(Puddle::new(id, x, y, self.config.puddle_radius));
        Some(id)
    }

    /// The puddle containing the point, if any.
    #[must_use]
    pub fn puddle_at(&self, x: f64, y: f64) -> Option<&Puddle> {
        self.puddles.iter().find(|p| p.contains(x, y))
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Puddle> {
        self.puddles.iter().find(|p| p.id == id)
    }

    /// Records a death inside a puddle. The tally only ever grows.
    pub fn record_death(&mut self, id: u64) {
        if let Some(puddle) = self.puddles.iter_mut().find(|p| p.id == id) {
            puddle.death_count += 1;
        }
    }

    /// Per-deposit intensity of a warning burst:
    /// `min(base · deaths / norm, cap)`.
    #[must_use]
    pub fn burst_intensity(&self, death_count: u32) -> f32 {
        (self.config.burst_base_intensity * (death_count as f32 / self.config.burst_deaths_norm))
            .min(self.config.burst_intensity_cap)
    }

    /// Number of deposits in a warning burst, scaling with the tally up to
    /// a cap.
    #[must_use]
    pub fn burst_count(&self, death_count: u32) -> u32 {
        (self.config.burst_count_base + death_count * self.config.burst_count_per_death)
            .min(self.config.burst_count_cap)
    }

    /// Emits a ring of Danger deposits radiating from a puddle's center.
    /// Deadlier puddles shout louder and wider.
    pub fn emit_danger_burst<R: Rng>(
        &self,
        id: u64,
        pheromones: &mut PheromoneField,
        rng: &mut R,
    ) {
        let Some(puddle) = self.get(id) else {
            return;
        };
        let intensity = self.burst_intensity(puddle.death_count);
        if intensity <= 0.0 {
            return;
        }
        let count = self.burst_count(puddle.death_count);
        for i in 0..count {
            let angle = TAU * f64::from(i) / f64::from(count) + rng.gen_range(-0.3..0.3);
            let dist = puddle.radius * rng.gen_range(0.6..1.2);
            let x = puddle.x + angle.cos() * dist;
            let y = puddle.y + angle.sin() * dist;
            pheromones.deposit(x, y, PheromoneKind::Danger, intensity);
        }
    }

    /// Exposure time after which the warning burst fires.
    #[must_use]
    pub fn warning_time(&self) -> f64 {
        self.config.exposure_death_time * self.config.warning_fraction
    }

    #[must_use]
    pub fn penalty_time(&self) -> f64 {
        self.config.exposure_penalty_time
    }

    #[must_use]
    pub fn death_time(&self) -> f64 {
        self.config.exposure_death_time
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puddles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puddles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puddle> {
        self.puddles.iter()
    }

    /// Drops every puddle; only a full colony reset does this.
    pub fn clear(&mut self) {
        self.puddles.clear();
    }
}
