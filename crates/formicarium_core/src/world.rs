//! World orchestration: the owner of every subsystem and the fixed tick
//! order that ties them together.
//!
//! Per tick: pheromone decay, the ant pass (mark dead, never remove
//! mid-pass), colony reconciliation (sweep, spawn, brood, queen, relief),
//! hazard bookkeeping, termites, then the event scheduler. All agent
//! writes to shared state flow through command buffers applied between
//! passes, so mutation stays strictly sequential and deterministic for a
//! given seed.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use formicarium_data::{Corpse, DeathCause, SimEvent, Termite, Weather};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::clock::SimulationClock;
use crate::colony::Colony;
use crate::config::{CarryTrigger, SimConfig};
use crate::events::EventSink;
use crate::food::FoodManager;
use crate::hazard::HazardField;
use crate::metrics::Metrics;
use crate::pheromone::PheromoneField;
use crate::scheduler::{EventScheduler, WorldDirective};
use crate::snapshot;
use crate::systems::{behavior, AntCommand, ColonyView, SystemContext};
use crate::terrain::{OpenGround, TerrainQuery, WorldBounds};
use crate::termite::{self, TermiteCommand};

pub struct World {
    pub config: SimConfig,
    pub clock: SimulationClock,
    pub tick: u64,
    pub rng: ChaCha8Rng,
    pub pheromones: PheromoneField,
    pub food: FoodManager,
    pub hazards: HazardField,
    pub colony: Colony,
    pub termites: Vec<Termite>,
    pub corpses: Vec<Corpse>,
    pub weather: Weather,
    pub under_attack: bool,
    pub metrics: Metrics,
    scheduler: EventScheduler,
    terrain: Arc<dyn TerrainQuery>,
    sink: Option<Box<dyn EventSink>>,
    next_entity_id: u64,
    time: f64,
    seed: u64,
}

impl World {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.world.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut food = FoodManager::new();
        food.seed(&config.world, &config.events, &mut rng);

        let mut hazards = HazardField::new(config.hazard.clone());
        hazards.seed(
            config.world.initial_puddles,
            config.world.width,
            config.world.height,
            &mut rng,
        );

        let mut colony = Colony::new(&config, config.world.width / 2.0, config.world.height / 2.0);
        colony.seed_initial(config.world.initial_ants, &config, &mut rng);

        tracing::info!(
            seed = seed,
            fingerprint = %config.fingerprint(),
            ants = colony.population(),
            food_sources = food.active_count(),
            "World created"
        );

        Ok(Self {
            clock: SimulationClock::new(config.world.tick_step, config.world.speed_multiplier),
            pheromones: PheromoneField::new(config.pheromone.clone()),
            food,
            hazards,
            colony,
            termites: Vec::new(),
            corpses: Vec::new(),
            weather: Weather::Clear,
            under_attack: false,
            metrics: Metrics::new(),
            scheduler: EventScheduler::new(),
            terrain: Arc::new(OpenGround::default()),
            sink: None,
            next_entity_id: 0,
            tick: 0,
            time: 0.0,
            rng,
            seed,
            config,
        })
    }

    /// Replaces the default open-ground terrain with a host lookup.
    #[must_use]
    pub fn with_terrain(mut self, terrain: Arc<dyn TerrainQuery>) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }

    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.config.world.width,
            height: self.config.world.height,
        }
    }

    /// Simulated seconds executed so far.
    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Drives the simulation from host wall-clock time. Executes every
    /// whole fixed step covered by the (speed-scaled) delta and returns
    /// the events from all of them.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<SimEvent> {
        let due = self.clock.advance(delta_ms);
        let step = self.clock.step();
        let mut events = Vec::new();
        for _ in 0..due {
            events.extend(self.step(step));
        }
        events
    }

    /// Executes exactly one fixed tick; test hosts drive this directly.
    pub fn tick_once(&mut self) -> Vec<SimEvent> {
        let step = self.config.world.tick_step;
        self.step(step)
    }

    fn step(&mut self, dt: f64) -> Vec<SimEvent> {
        let started = Instant::now();
        self.tick += 1;
        self.time += dt;
        let mut events = Vec::new();

        // Scent decay first: agents act on this tick's field.
        self.pheromones.tick(dt);

        // Attack state flips on raid arrival and on the last termite
        // falling; hiding ants are released by the transition chain.
        let attacked = self.termites.iter().any(|t| !t.is_dead());
        if attacked != self.under_attack {
            self.under_attack = attacked;
            events.push(if attacked {
                SimEvent::AttackStarted
            } else {
                SimEvent::AttackEnded
            });
        }

        let commands = self.run_ant_pass(dt);
        self.apply_ant_commands(commands, &mut events);

        let depleted = self.food.tick(dt);
        for id in depleted {
            if let Some(source) = self.food.get(id) {
                events.push(SimEvent::FoodDepleted {
                    id,
                    x: source.x,
                    y: source.y,
                });
            }
            self.metrics.increment_counter("food_depleted");
        }

        self.sweep_dead(&mut events);
        self.colony
            .reconcile(&self.config, dt, &mut self.rng, &mut events);

        self.termites.retain(|t| {
            if t.is_dead() {
                events.push(SimEvent::TermiteSlain { id: t.id });
                false
            } else {
                true
            }
        });

        let home = (self.colony.home_x, self.colony.home_y);
        let bounds = self.bounds();
        let termite_commands = termite::update_termites(
            &mut self.termites,
            &self.colony.ants,
            &self.food,
            home,
            &self.config.termite,
            bounds,
            dt,
        );
        self.apply_termite_commands(termite_commands, &mut events);

        let directives = self
            .scheduler
            .tick(&self.config, self.weather, dt, &mut self.rng);
        self.apply_directives(directives, &mut events);

        self.metrics.record_tick(
            started.elapsed(),
            self.colony.population(),
            self.pheromones.len(),
        );
        if let Some(sink) = self.sink.as_mut() {
            for event in &events {
                sink.on_event(self.tick, event);
            }
        }
        events
    }

    fn run_ant_pass(&mut self, dt: f64) -> Vec<AntCommand> {
        let ctx = SystemContext {
            config: &self.config,
            pheromones: &self.pheromones,
            food: &self.food,
            hazards: &self.hazards,
            termites: &self.termites,
            corpses: &self.corpses,
            colony: ColonyView {
                home_x: self.colony.home_x,
                home_y: self.colony.home_y,
                under_attack: self.under_attack,
            },
            terrain: self.terrain.as_ref(),
            bounds: WorldBounds {
                width: self.config.world.width,
                height: self.config.world.height,
            },
            weather: self.weather,
            dt,
        };
        let mut commands = Vec::new();
        for (idx, ant) in self.colony.ants.iter_mut().enumerate() {
            if ant.is_dead() {
                continue;
            }
            behavior::update_ant(idx, ant, &ctx, &mut self.rng, &mut commands);
        }
        commands
    }

    fn apply_ant_commands(&mut self, commands: Vec<AntCommand>, events: &mut Vec<SimEvent>) {
        let capacity = self.config.ant.carry_capacity;
        let trigger = self.config.ant.carry_trigger;
        for command in commands {
            match command {
                AntCommand::DropPheromone { x, y, kind, base } => {
                    self.pheromones.deposit(x, y, kind, base);
                }
                AntCommand::BeginFollow { deposit } => {
                    self.pheromones.add_follower(deposit);
                }
                AntCommand::EndFollow { deposit } => {
                    self.pheromones.remove_follower(deposit);
                }
                AntCommand::CollectFood { ant, source } => {
                    let Some(a) = self.colony.ants.get_mut(ant) else {
                        continue;
                    };
                    let want = capacity - a.carried_food;
                    if want > 0.0 {
                        let taken = self.food.collect(source, want);
                        if taken > 0.0 {
                            a.carried_food += taken;
                            a.carrying = match trigger {
                                CarryTrigger::AnyAmount => a.carried_food > 0.0,
                                CarryTrigger::FullCapacity => {
                                    a.carried_food >= capacity - 1e-9
                                }
                            };
                        }
                    }
                    // Full, or the source just ran dry under us: let go.
                    if a.carried_food >= capacity - 1e-9 || !self.food.is_valid(source) {
                        a.target = None;
                    }
                }
                AntCommand::StoreFood { amount } => {
                    self.colony.storage += amount;
                    self.metrics.increment_counter("food_stored");
                }
                AntCommand::StrikeTermite { termite, damage } => {
                    if let Some(t) = self
                        .termites
                        .iter_mut()
                        .find(|t| t.id == termite && !t.is_dead())
                    {
                        t.health = (t.health - damage).max(0.0);
                    }
                }
                AntCommand::CollectCorpse { corpse } => {
                    if let Some(pos) = self
                        .corpses
                        .iter()
                        .position(|c| c.id == corpse && !c.collected)
                    {
                        self.corpses.remove(pos);
                        self.colony.corpses_recovered += 1;
                        events.push(SimEvent::CorpseCollected { id: corpse });
                    }
                }
                AntCommand::NourishBrood => {
                    self.colony.note_nourishment();
                }
                AntCommand::HazardBurst { puddle } => {
                    self.hazards
                        .emit_danger_burst(puddle, &mut self.pheromones, &mut self.rng);
                }
            }
        }
    }

    /// Converts marked-dead ants into corpses, tallies puddle kills, and
    /// reports the deaths. A kill inside a puddle re-emits its warning
    /// burst, now scaled by the grown tally.
    fn sweep_dead(&mut self, events: &mut Vec<SimEvent>) {
        for ant in self.colony.sweep_dead() {
            let cause = ant.death_cause.unwrap_or(DeathCause::Starvation);
            if cause == DeathCause::Hazard {
                let puddle = self.hazards.puddle_at(ant.x, ant.y).map(|p| p.id);
                if let Some(id) = puddle {
                    self.hazards.record_death(id);
                    self.hazards
                        .emit_danger_burst(id, &mut self.pheromones, &mut self.rng);
                }
            }
            let id = self.next_entity_id;
            self.next_entity_id += 1;
            self.corpses.push(Corpse {
                id,
                x: ant.x,
                y: ant.y,
                collected: false,
            });
            events.push(SimEvent::AntDied {
                id: ant.id,
                cause,
                x: ant.x,
                y: ant.y,
            });
            self.metrics.increment_counter("ant_deaths");
        }
    }

    fn apply_termite_commands(
        &mut self,
        commands: Vec<TermiteCommand>,
        events: &mut Vec<SimEvent>,
    ) {
        for command in commands {
            match command {
                TermiteCommand::DestroyFood { source } => {
                    let pos = self.food.get(source).map(|s| (s.x, s.y));
                    if self.food.destroy(source) {
                        if let Some((x, y)) = pos {
                            events.push(SimEvent::FoodDepleted { id: source, x, y });
                        }
                        self.metrics.increment_counter("food_destroyed");
                    }
                }
                TermiteCommand::DrainColony => {
                    self.colony.storage =
                        (self.colony.storage - self.config.termite.storage_drain).max(0.0);
                }
                TermiteCommand::DamageAnt { ant, damage } => {
                    if let Some(a) = self
                        .colony
                        .ants
                        .iter_mut()
                        .find(|a| a.id == ant && !a.is_dead())
                    {
                        a.energy -= damage;
                        if a.energy <= 0.0 {
                            a.energy = 0.0;
                            a.death_cause = Some(DeathCause::Combat);
                        }
                    }
                }
            }
        }
    }

    fn apply_directives(&mut self, directives: Vec<WorldDirective>, events: &mut Vec<SimEvent>) {
        for directive in directives {
            match directive {
                WorldDirective::StartRain { .. } => {
                    self.weather = Weather::Raining;
                    events.push(SimEvent::RainStarted);
                }
                WorldDirective::StopRain => {
                    self.weather = Weather::Clear;
                    events.push(SimEvent::RainEnded);
                }
                WorldDirective::FormPuddle { x, y } => {
                    if let Some(id) = self.hazards.add_puddle(x, y) {
                        events.push(SimEvent::PuddleFormed { id, x, y });
                    }
                }
                WorldDirective::SpawnRaid { count } => {
                    let group = termite::spawn_raid(
                        count,
                        self.bounds(),
                        &self.config.termite,
                        &mut self.next_entity_id,
                        &mut self.rng,
                    );
                    for t in &group {
                        events.push(SimEvent::TermiteSpawned { id: t.id });
                    }
                    self.termites.extend(group);
                    self.metrics.increment_counter("raids");
                }
                WorldDirective::SeedFood { x, y, amount } => {
                    let id = self.food.add_source(x, y, amount);
                    events.push(SimEvent::FoodSeeded { id, x, y });
                }
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> formicarium_data::SimSnapshot {
        snapshot::capture(self)
    }

    /// Full reset: every component is torn down and recreated from the
    /// configuration. The terrain hook and event sink survive.
    pub fn reset(&mut self) -> Result<()> {
        let config = self.config.clone();
        let terrain = Arc::clone(&self.terrain);
        let sink = self.sink.take();
        *self = World::new(config)?;
        self.terrain = terrain;
        self.sink = sink;
        Ok(())
    }
}
