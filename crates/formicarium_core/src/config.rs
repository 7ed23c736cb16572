//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. Defaults are hardcoded in the `Default` impls; a TOML file
//! overrides them.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 2000.0
//! height = 1200.0
//! initial_ants = 30
//! seed = 42
//!
//! [pheromone]
//! exploration_decay_rate = 0.35
//! food_trail_max_age = 15.0
//! ```

use serde::{Deserialize, Serialize};

/// World-level parameters: bounds, seeding, initial entity counts.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_ants: usize,
    pub initial_food_sources: usize,
    pub initial_puddles: usize,
    pub seed: Option<u64>,
    /// Fixed tick duration in seconds.
    pub tick_step: f64,
    /// Host-settable time scale applied to `advance()` deltas.
    pub speed_multiplier: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 1200.0,
            initial_ants: 30,
            initial_food_sources: 8,
            initial_puddles: 2,
            seed: None,
            tick_step: 0.05,
            speed_multiplier: 1.0,
        }
    }
}

/// Scent field tuning: caps, decay curves, grid layout, emission cadence.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PheromoneConfig {
    /// Uniform grid cell edge length in world units.
    pub cell_size: f64,
    /// Hard bound on live deposits before oldest-first eviction.
    pub max_deposits: usize,
    /// Exponential decay rate for Exploration deposits, per second.
    pub exploration_decay_rate: f32,
    /// Deposits below this intensity are removed.
    pub removal_threshold: f32,
    /// FoodTrail deposits are deleted once this old, whatever their
    /// intensity.
    pub food_trail_max_age: f64,
    pub danger_multiplier: f32,
    pub danger_cap: f32,
    pub food_trail_multiplier: f32,
    pub food_trail_cap: f32,
    pub exploration_cap: f32,
    /// Additive trail reinforcement per tracking ant.
    pub follower_bonus_step: f32,
    pub follower_bonus_cap: f32,
    /// Seconds between pheromone drops from a single ant.
    pub drop_interval: f64,
    pub food_trail_base: f32,
    pub exploration_base: f32,
    /// Carry fullness at which a returning ant thickens its trail.
    pub cluster_fullness: f64,
    pub cluster_extra_deposits: u32,
    pub cluster_intensity_scale: f32,
    pub cluster_jitter: f64,
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            max_deposits: 4096,
            exploration_decay_rate: 0.35,
            removal_threshold: 0.01,
            food_trail_max_age: 15.0,
            danger_multiplier: 3.0,
            danger_cap: 5.0,
            food_trail_multiplier: 2.5,
            food_trail_cap: 3.0,
            exploration_cap: 1.5,
            follower_bonus_step: 0.25,
            follower_bonus_cap: 2.0,
            drop_interval: 0.6,
            food_trail_base: 1.0,
            exploration_base: 0.3,
            cluster_fullness: 0.9,
            cluster_extra_deposits: 2,
            cluster_intensity_scale: 0.4,
            cluster_jitter: 6.0,
        }
    }
}

/// Which event flips the `carrying` flag on. The source history is
/// inconsistent here, so it is an explicit knob rather than a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CarryTrigger {
    /// Carrying as soon as any amount is held.
    #[default]
    AnyAmount,
    /// Carrying only once the capacity is full.
    FullCapacity,
}

/// Per-ant tuning: energy, movement, senses, combat.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AntConfig {
    pub max_energy: f64,
    /// Continuous energy drain per second, in every state.
    pub energy_drain_rate: f64,
    pub base_speed: f64,
    pub carry_capacity: f64,
    pub carry_trigger: CarryTrigger,
    pub collect_range: f64,
    pub home_range: f64,
    pub hide_range: f64,
    pub corpse_collect_range: f64,
    pub melee_range: f64,
    pub melee_damage: f64,
    pub melee_energy_cost: f64,
    pub melee_cooldown: f64,
    pub danger_detect_range: f64,
    pub corpse_detect_range: f64,
    pub soldier_engage_range: f64,
    pub food_detect_range: f64,
    pub trail_detect_range: f64,
    pub trail_accept_range: f64,
    /// Speed boost while fleeing danger.
    pub avoid_speed_mult: f64,
    pub speed_mult_cap: f64,
    /// Energy granted when food is deposited at the nest.
    pub deposit_energy_bonus: f64,
    /// Energy regained per second while resting.
    pub rest_recovery_rate: f64,
    pub rest_short_min: f64,
    pub rest_short_max: f64,
    pub rest_long_min: f64,
    pub rest_long_max: f64,
    /// Wander bearing drift per second, radians.
    pub wander_drift: f64,
    /// Per-tick wander jitter, radians.
    pub wander_jitter: f64,
    pub brood_feed_energy_cost: f64,
    /// Success chance for non-nurse roles attempting to feed brood.
    pub brood_feed_fallback_chance: f64,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            energy_drain_rate: 0.8,
            base_speed: 40.0,
            carry_capacity: 10.0,
            carry_trigger: CarryTrigger::AnyAmount,
            collect_range: 20.0,
            home_range: 30.0,
            hide_range: 50.0,
            corpse_collect_range: 15.0,
            melee_range: 20.0,
            melee_damage: 15.0,
            melee_energy_cost: 5.0,
            melee_cooldown: 1.0,
            danger_detect_range: 80.0,
            corpse_detect_range: 100.0,
            soldier_engage_range: 150.0,
            food_detect_range: 120.0,
            trail_detect_range: 100.0,
            trail_accept_range: 12.0,
            avoid_speed_mult: 1.8,
            speed_mult_cap: 2.0,
            deposit_energy_bonus: 20.0,
            rest_recovery_rate: 2.0,
            rest_short_min: 3.0,
            rest_short_max: 5.0,
            rest_long_min: 4.0,
            rest_long_max: 7.0,
            wander_drift: 1.2,
            wander_jitter: 0.35,
            brood_feed_energy_cost: 5.0,
            brood_feed_fallback_chance: 0.3,
        }
    }
}

/// Colony life-cycle tuning: spawning, queen flights, brood pipeline,
/// generational evolution, emergency relief.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ColonyConfig {
    pub initial_storage: f64,
    pub spawn_interval: f64,
    pub spawn_cost: f64,
    pub max_population: usize,
    /// Chance a spawn in a queen-less colony is designated queen.
    pub queen_chance: f64,
    pub flight_idle_threshold: f64,
    pub flight_cost: f64,
    pub flight_duration: f64,
    pub post_flight_delay: f64,
    pub eggs_min: u32,
    pub eggs_max: u32,
    pub egg_window: f64,
    pub larva_window: f64,
    pub larva_food_cost: f64,
    pub pupa_window: f64,
    pub pupa_food_cost: f64,
    /// Per-tick chance that matured adults emerge.
    pub emergence_chance: f64,
    pub emergence_batch_max: u32,
    pub evolution_interval: f64,
    pub evolution_chance: f64,
    /// Storage required before an evolution roll is allowed.
    pub evolution_storage_floor: f64,
    pub spawn_cost_step: f64,
    pub spawn_cost_floor: f64,
    pub population_cap_step: usize,
    pub population_cap_ceiling: usize,
    /// Storage level considered critical.
    pub relief_threshold: f64,
    pub relief_energy: f64,
    pub relief_cooldown: f64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            initial_storage: 50.0,
            spawn_interval: 4.0,
            spawn_cost: 10.0,
            max_population: 150,
            queen_chance: 0.05,
            flight_idle_threshold: 90.0,
            flight_cost: 40.0,
            flight_duration: 12.0,
            post_flight_delay: 8.0,
            eggs_min: 20,
            eggs_max: 50,
            egg_window: 20.0,
            larva_window: 30.0,
            larva_food_cost: 0.5,
            pupa_window: 25.0,
            pupa_food_cost: 1.0,
            emergence_chance: 0.3,
            emergence_batch_max: 3,
            evolution_interval: 60.0,
            evolution_chance: 0.25,
            evolution_storage_floor: 120.0,
            spawn_cost_step: 1.0,
            spawn_cost_floor: 4.0,
            population_cap_step: 25,
            population_cap_ceiling: 400,
            relief_threshold: 5.0,
            relief_energy: 10.0,
            relief_cooldown: 30.0,
        }
    }
}

/// Termite raid tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TermiteConfig {
    pub max_health: f64,
    pub speed: f64,
    pub food_range: f64,
    pub colony_range: f64,
    pub ant_range: f64,
    /// Range factor applied when soldiers are alive and only non-soldier
    /// ants may be targeted.
    pub guarded_range_factor: f64,
    pub damage: f64,
    pub attack_cooldown: f64,
    pub contact_range: f64,
    /// Colony storage drained per landed hit on the nest.
    pub storage_drain: f64,
    pub raid_chance: f64,
    pub raid_min: u32,
    pub raid_max: u32,
}

impl Default for TermiteConfig {
    fn default() -> Self {
        Self {
            max_health: 60.0,
            speed: 30.0,
            food_range: 300.0,
            colony_range: 400.0,
            ant_range: 120.0,
            guarded_range_factor: 0.5,
            damage: 12.0,
            attack_cooldown: 1.5,
            contact_range: 18.0,
            storage_drain: 4.0,
            raid_chance: 0.0015,
            raid_min: 2,
            raid_max: 5,
        }
    }
}

/// Puddle hazard tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HazardConfig {
    pub puddle_radius: f64,
    pub max_puddles: usize,
    /// Continuous exposure seconds before the one-time energy penalty.
    pub exposure_penalty_time: f64,
    /// Continuous exposure seconds before death.
    pub exposure_death_time: f64,
    /// Fraction of the lethal exposure time at which a warning burst of
    /// Danger deposits is emitted.
    pub warning_fraction: f64,
    pub burst_base_intensity: f32,
    pub burst_deaths_norm: f32,
    pub burst_intensity_cap: f32,
    pub burst_count_base: u32,
    pub burst_count_per_death: u32,
    pub burst_count_cap: u32,
    /// Per-tick chance a new puddle forms while it is raining.
    pub rain_puddle_chance: f64,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            puddle_radius: 60.0,
            max_puddles: 6,
            exposure_penalty_time: 3.0,
            exposure_death_time: 6.0,
            warning_fraction: 0.6,
            burst_base_intensity: 2.0,
            burst_deaths_norm: 3.0,
            burst_intensity_cap: 4.0,
            burst_count_base: 6,
            burst_count_per_death: 2,
            burst_count_cap: 16,
            rain_puddle_chance: 0.002,
        }
    }
}

/// Random world event tuning.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EventConfig {
    pub rain_chance: f64,
    pub rain_min_duration: f64,
    pub rain_max_duration: f64,
    /// Terrain speed factor applied while raining (open ground default).
    pub rain_speed_factor: f64,
    pub food_reseed: bool,
    pub food_reseed_chance: f64,
    pub food_amount_min: f64,
    pub food_amount_max: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            rain_chance: 0.001,
            rain_min_duration: 20.0,
            rain_max_duration: 60.0,
            rain_speed_factor: 0.7,
            food_reseed: true,
            food_reseed_chance: 0.0008,
            food_amount_min: 40.0,
            food_amount_max: 120.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub pheromone: PheromoneConfig,
    pub ant: AntConfig,
    pub colony: ColonyConfig,
    pub termite: TermiteConfig,
    pub hazard: HazardConfig,
    pub events: EventConfig,
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` describing
    /// the first failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0.0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0.0, "World height must be positive");
        anyhow::ensure!(self.world.tick_step > 0.0, "Tick step must be positive");
        anyhow::ensure!(
            self.world.speed_multiplier > 0.0,
            "Speed multiplier must be positive"
        );
        anyhow::ensure!(
            self.world.initial_ants <= 10_000,
            "Initial ant count too large (max 10000)"
        );

        anyhow::ensure!(self.pheromone.cell_size > 0.0, "Cell size must be positive");
        anyhow::ensure!(
            self.pheromone.max_deposits > 0,
            "Max deposits must be positive"
        );
        anyhow::ensure!(
            self.pheromone.exploration_decay_rate > 0.0,
            "Exploration decay rate must be positive"
        );
        anyhow::ensure!(
            self.pheromone.removal_threshold > 0.0,
            "Removal threshold must be positive"
        );
        anyhow::ensure!(
            self.pheromone.food_trail_max_age > 0.0,
            "FoodTrail max age must be positive"
        );
        anyhow::ensure!(
            self.pheromone.follower_bonus_cap >= 0.0,
            "Follower bonus cap must be non-negative"
        );
        anyhow::ensure!(
            self.pheromone.drop_interval > 0.0,
            "Drop interval must be positive"
        );

        anyhow::ensure!(self.ant.max_energy > 0.0, "Max energy must be positive");
        anyhow::ensure!(
            self.ant.energy_drain_rate > 0.0,
            "Energy drain rate must be positive"
        );
        anyhow::ensure!(self.ant.base_speed > 0.0, "Base speed must be positive");
        anyhow::ensure!(
            self.ant.carry_capacity > 0.0,
            "Carry capacity must be positive"
        );
        anyhow::ensure!(
            self.ant.avoid_speed_mult >= 1.0,
            "Avoid speed multiplier must be at least 1.0"
        );
        anyhow::ensure!(
            self.ant.speed_mult_cap >= self.ant.avoid_speed_mult,
            "Speed multiplier cap below avoid boost"
        );
        anyhow::ensure!(
            self.ant.rest_short_min <= self.ant.rest_short_max
                && self.ant.rest_long_min <= self.ant.rest_long_max,
            "Rest duration ranges must be ordered"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.ant.brood_feed_fallback_chance),
            "Brood feed fallback chance must be in [0.0, 1.0]"
        );

        anyhow::ensure!(self.colony.spawn_cost > 0.0, "Spawn cost must be positive");
        anyhow::ensure!(
            self.colony.max_population > 0,
            "Population cap must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.colony.queen_chance),
            "Queen chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.colony.eggs_min <= self.colony.eggs_max,
            "Egg batch range must be ordered"
        );
        anyhow::ensure!(
            self.colony.egg_window > 0.0
                && self.colony.larva_window > 0.0
                && self.colony.pupa_window > 0.0,
            "Brood stage windows must be positive"
        );
        anyhow::ensure!(
            self.colony.spawn_cost_floor > 0.0,
            "Spawn cost floor must be positive"
        );
        anyhow::ensure!(
            self.colony.population_cap_ceiling >= self.colony.max_population,
            "Population cap ceiling below initial cap"
        );

        anyhow::ensure!(
            self.termite.max_health > 0.0,
            "Termite health must be positive"
        );
        anyhow::ensure!(
            self.termite.attack_cooldown > 0.0,
            "Termite attack cooldown must be positive"
        );
        anyhow::ensure!(
            self.termite.raid_min <= self.termite.raid_max,
            "Raid size range must be ordered"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.termite.raid_chance),
            "Raid chance must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.hazard.exposure_penalty_time < self.hazard.exposure_death_time,
            "Exposure penalty time must precede the lethal time"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.hazard.warning_fraction),
            "Warning fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.hazard.burst_deaths_norm > 0.0,
            "Burst death normalization must be positive"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.events.rain_chance),
            "Rain chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.events.rain_min_duration <= self.events.rain_max_duration,
            "Rain duration range must be ordered"
        );
        anyhow::ensure!(
            self.events.food_amount_min <= self.events.food_amount_max,
            "Food amount range must be ordered"
        );

        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of the behavior-relevant sections, for reproducibility logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.pheromone).as_bytes());
        hasher.update(format!("{:?}", self.ant).as_bytes());
        hasher.update(format!("{:?}", self.colony).as_bytes());
        hasher.update(format!("{:?}", self.termite).as_bytes());
        hasher.update(format!("{:?}", self.hazard).as_bytes());
        hasher.update(format!("{:?}", self.events).as_bytes());
        hex::encode(hasher.finalize())
    }
}
