use formicarium_core::config::SimConfig;
use formicarium_core::world::World;
use formicarium_data::{Ant, AntRole, AntState, Target};
use rand::SeedableRng;

/// Builds a quiet world: no initial entities, no random weather, no
/// raids. Tests add exactly what they need.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: SimConfig,
    ants: Vec<Ant>,
    food: Vec<(f64, f64, f64)>,
    puddles: Vec<(f64, f64)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.world.seed = Some(0xA17);
        config.world.initial_ants = 0;
        config.world.initial_food_sources = 0;
        config.world.initial_puddles = 0;
        config.events.rain_chance = 0.0;
        config.events.food_reseed = false;
        config.termite.raid_chance = 0.0;
        Self {
            config,
            ants: Vec::new(),
            food: Vec::new(),
            puddles: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_ant(mut self, ant: Ant) -> Self {
        self.ants.push(ant);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64, amount: f64) -> Self {
        self.food.push((x, y, amount));
        self
    }

    pub fn with_puddle(mut self, x: f64, y: f64) -> Self {
        self.puddles.push((x, y));
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config).expect("failed to build test world");
        for (x, y, amount) in self.food {
            world.food.add_source(x, y, amount);
        }
        for (x, y) in self.puddles {
            world
                .hazards
                .add_puddle(x, y)
                .expect("puddle cap reached in test builder");
        }
        for ant in self.ants {
            world.colony.ants.push(ant);
        }
        world
    }
}

/// Fluent ant construction with a deterministic identity derived from
/// the spawn position, so repeated builds are reproducible.
#[allow(dead_code)]
pub struct AntBuilder {
    x: f64,
    y: f64,
    role: AntRole,
    energy: f64,
    carried: f64,
    state: AntState,
    target: Option<Target>,
}

#[allow(dead_code)]
impl AntBuilder {
    pub fn new() -> Self {
        Self {
            x: 1000.0,
            y: 600.0,
            role: AntRole::Worker,
            energy: 100.0,
            carried: 0.0,
            state: AntState::Exploring,
            target: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn role(mut self, role: AntRole) -> Self {
        self.role = role;
        self
    }

    pub fn energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn carrying(mut self, amount: f64) -> Self {
        self.carried = amount;
        self
    }

    pub fn state(mut self, state: AntState) -> Self {
        self.state = state;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn build(self) -> Ant {
        let seed = (self.x.to_bits() ^ self.y.to_bits()).wrapping_mul(0x9E3779B97F4A7C15);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let config = SimConfig::default();
        let mut ant =
            formicarium_core::colony::create_ant_with_rng(self.role, self.x, self.y, &config, &mut rng);
        ant.x = self.x;
        ant.y = self.y;
        ant.energy = self.energy;
        ant.carried_food = self.carried;
        ant.carrying = self.carried > 0.0;
        ant.state = self.state;
        ant.target = self.target;
        ant
    }
}
