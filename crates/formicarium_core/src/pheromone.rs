//! Spatial pheromone field: typed, decaying scent deposits over a uniform
//! grid index.
//!
//! Deposits live in an ordered map keyed by a monotone id so iteration is
//! deterministic; a grid of cell buckets keyed by `floor(p / cell_size)`
//! answers neighborhood queries without scanning the whole field. Every
//! deposit is present in exactly one bucket, and buckets are dropped when
//! they empty.
//!
//! Decay is type-specific: Danger deposits are immortal, FoodTrail
//! deposits fade linearly over a fixed lifetime (reinforced by ants
//! currently tracking them) and are force-removed at max age, everything
//! else decays exponentially and is removed below a small threshold.

use std::collections::{BTreeMap, HashMap};

use formicarium_data::{PheromoneDeposit, PheromoneKind};

use crate::config::PheromoneConfig;

pub struct PheromoneField {
    config: PheromoneConfig,
    deposits: BTreeMap<u64, PheromoneDeposit>,
    grid: HashMap<(i64, i64), Vec<u64>>,
    next_id: u64,
}

impl PheromoneField {
    #[must_use]
    pub fn new(config: PheromoneConfig) -> Self {
        Self {
            config,
            deposits: BTreeMap::new(),
            grid: HashMap::new(),
            next_id: 0,
        }
    }

    #[inline]
    fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.config.cell_size).floor() as i64,
            (y / self.config.cell_size).floor() as i64,
        )
    }

    /// Type multiplier and intensity cap applied at deposit time.
    fn scale_intensity(&self, kind: PheromoneKind, base: f32) -> f32 {
        let (mult, cap) = match kind {
            PheromoneKind::Danger => (self.config.danger_multiplier, self.config.danger_cap),
            PheromoneKind::FoodTrail => (
                self.config.food_trail_multiplier,
                self.config.food_trail_cap,
            ),
            PheromoneKind::Exploration => (1.0, self.config.exploration_cap),
        };
        (base * mult).clamp(0.0, cap)
    }

    /// Adds a deposit and returns its id.
    pub fn deposit(&mut self, x: f64, y: f64, kind: PheromoneKind, base_intensity: f32) -> u64 {
        let intensity = self.scale_intensity(kind, base_intensity);
        let id = self.next_id;
        self.next_id += 1;

        let deposit = PheromoneDeposit {
            id,
            x,
            y,
            kind,
            intensity,
            initial_intensity: intensity,
            age: 0.0,
            followers: 0,
        };
        self.grid.entry(self.cell_of(x, y)).or_default().push(id);
        self.deposits.insert(id, deposit);

        self.enforce_capacity();
        id
    }

    /// Ages and decays every deposit, removing the expired ones.
    pub fn tick(&mut self, dt: f64) {
        let mut expired: Vec<u64> = Vec::new();

        for deposit in self.deposits.values_mut() {
            deposit.age += dt;
            match deposit.kind {
                PheromoneKind::Danger => {}
                PheromoneKind::FoodTrail => {
                    if deposit.age >= self.config.food_trail_max_age {
                        expired.push(deposit.id);
                        continue;
                    }
                    let remaining =
                        1.0 - (deposit.age / self.config.food_trail_max_age) as f32;
                    let bonus = (deposit.followers as f32 * self.config.follower_bonus_step)
                        .min(self.config.follower_bonus_cap);
                    deposit.intensity = (deposit.initial_intensity * remaining + bonus)
                        .clamp(0.0, self.config.food_trail_cap);
                    if deposit.intensity < self.config.removal_threshold
                        && deposit.followers == 0
                    {
                        expired.push(deposit.id);
                    }
                }
                PheromoneKind::Exploration => {
                    deposit.intensity = deposit.initial_intensity
                        * (-deposit.age as f32 * self.config.exploration_decay_rate).exp();
                    if deposit.intensity < self.config.removal_threshold {
                        expired.push(deposit.id);
                    }
                }
            }
        }

        for id in expired {
            self.remove(id);
        }
    }

    fn remove(&mut self, id: u64) -> Option<PheromoneDeposit> {
        let deposit = self.deposits.remove(&id)?;
        let cell = self.cell_of(deposit.x, deposit.y);
        if let Some(bucket) = self.grid.get_mut(&cell) {
            bucket.retain(|&d| d != id);
            if bucket.is_empty() {
                self.grid.remove(&cell);
            }
        }
        Some(deposit)
    }

    /// Oldest-first purge once the hard deposit bound is exceeded. Danger
    /// deposits are spared unless the field is saturated with them.
    fn enforce_capacity(&mut self) {
        let excess = self.deposits.len().saturating_sub(self.config.max_deposits);
        if excess == 0 {
            return;
        }

        let mut candidates: Vec<(u64, f64)> = self
            .deposits
            .values()
            .filter(|d| d.kind != PheromoneKind::Danger)
            .map(|d| (d.id, d.age))
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut victims: Vec<u64> = candidates.iter().take(excess).map(|(id, _)| *id).collect();

        if victims.len() < excess {
            let mut danger: Vec<(u64, f64)> = self
                .deposits
                .values()
                .filter(|d| d.kind == PheromoneKind::Danger)
                .map(|d| (d.id, d.age))
                .collect();
            danger.sort_by(|a, b| b.1.total_cmp(&a.1));
            victims.extend(
                danger
                    .iter()
                    .take(excess - victims.len())
                    .map(|(id, _)| *id),
            );
        }

        for id in victims {
            self.remove(id);
        }
    }

    fn cells_overlapping(&self, x: f64, y: f64, radius: f64) -> impl Iterator<Item = (i64, i64)> {
        let cell = self.config.cell_size;
        let min_cx = ((x - radius) / cell).floor() as i64;
        let max_cx = ((x + radius) / cell).floor() as i64;
        let min_cy = ((y - radius) / cell).floor() as i64;
        let max_cy = ((y + radius) / cell).floor() as i64;
        (min_cy..=max_cy).flat_map(move |cy| (min_cx..=max_cx).map(move |cx| (cx, cy)))
    }

    /// Single deposit with the greatest distance-weighted intensity inside
    /// the query disk, or `None`. Never returns a deposit farther than
    /// `radius`.
    #[must_use]
    pub fn strongest_near(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        kind: Option<PheromoneKind>,
    ) -> Option<&PheromoneDeposit> {
        self.strongest_near_excluding(x, y, radius, kind, None)
    }

    /// `strongest_near` with one deposit masked out; used when hopping
    /// from a just-reached trail mark to the next one.
    #[must_use]
    pub fn strongest_near_excluding(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        kind: Option<PheromoneKind>,
        exclude: Option<u64>,
    ) -> Option<&PheromoneDeposit> {
        if radius <= 0.0 {
            return None;
        }
        let mut best: Option<(u64, f64)> = None;
        for cell in self.cells_overlapping(x, y, radius) {
            let Some(bucket) = self.grid.get(&cell) else {
                continue;
            };
            for &id in bucket {
                if exclude == Some(id) {
                    continue;
                }
                let Some(deposit) = self.deposits.get(&id) else {
                    continue;
                };
                if let Some(k) = kind {
                    if deposit.kind != k {
                        continue;
                    }
                }
                let dist = deposit.distance_to(x, y);
                if dist > radius {
                    continue;
                }
                let weighted = f64::from(deposit.intensity) * (1.0 - dist / radius);
                if best.map_or(true, |(_, w)| weighted > w) {
                    best = Some((id, weighted));
                }
            }
        }
        best.and_then(|(id, _)| self.deposits.get(&id))
    }

    /// All matching deposits inside the disk with their distances, sorted
    /// ascending by distance.
    #[must_use]
    pub fn find_in_radius(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        kind: Option<PheromoneKind>,
    ) -> Vec<(&PheromoneDeposit, f64)> {
        let mut found: Vec<(&PheromoneDeposit, f64)> = Vec::new();
        if radius <= 0.0 {
            return found;
        }
        for cell in self.cells_overlapping(x, y, radius) {
            let Some(bucket) = self.grid.get(&cell) else {
                continue;
            };
            for &id in bucket {
                let Some(deposit) = self.deposits.get(&id) else {
                    continue;
                };
                if let Some(k) = kind {
                    if deposit.kind != k {
                        continue;
                    }
                }
                let dist = deposit.distance_to(x, y);
                if dist <= radius {
                    found.push((deposit, dist));
                }
            }
        }
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found
    }

    /// Sum of distance-weighted intensities; aggregate trail strength.
    #[must_use]
    pub fn density_at(&self, x: f64, y: f64, radius: f64, kind: Option<PheromoneKind>) -> f64 {
        self.find_in_radius(x, y, radius, kind)
            .iter()
            .map(|(d, dist)| f64::from(d.intensity) * (1.0 - dist / radius))
            .sum()
    }

    /// Registers an ant as tracking a FoodTrail deposit.
    pub fn add_follower(&mut self, id: u64) -> bool {
        match self.deposits.get_mut(&id) {
            Some(d) if d.kind == PheromoneKind::FoodTrail => {
                d.followers += 1;
                true
            }
            _ => false,
        }
    }

    /// Releases a follower registration. A vanished deposit is a no-op.
    pub fn remove_follower(&mut self, id: u64) {
        if let Some(d) = self.deposits.get_mut(&id) {
            d.followers = d.followers.saturating_sub(1);
        }
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&PheromoneDeposit> {
        self.deposits.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PheromoneDeposit> {
        self.deposits.values()
    }

    #[must_use]
    pub fn count_of(&self, kind: PheromoneKind) -> usize {
        self.deposits.values().filter(|d| d.kind == kind).count()
    }

    /// Clears every deposit; used on full simulation reset.
    pub fn clear(&mut self) {
        self.deposits.clear();
        self.grid.clear();
    }

    /// Checks the list/grid mutual-membership invariant.
    #[must_use]
    pub fn index_consistent(&self) -> bool {
        let indexed: usize = self.grid.values().map(Vec::len).sum();
        if indexed != self.deposits.len() {
            return false;
        }
        self.grid.iter().all(|(cell, bucket)| {
            !bucket.is_empty()
                && bucket.iter().all(|id| {
                    self.deposits
                        .get(id)
                        .is_some_and(|d| self.cell_of(d.x, d.y) == *cell)
                })
        })
    }
}
