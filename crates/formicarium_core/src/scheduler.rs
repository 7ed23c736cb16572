//! Random world events: rain, termite raids, food reseeding.
//!
//! The scheduler never mutates subsystems itself; it rolls the dice each
//! tick and hands the world a list of directives to apply, which keeps
//! the tick order and the RNG stream in one auditable place.

use formicarium_data::Weather;
use rand::Rng;

use crate::config::SimConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum WorldDirective {
    StartRain { duration: f64 },
    StopRain,
    SpawnRaid { count: u32 },
    FormPuddle { x: f64, y: f64 },
    SeedFood { x: f64, y: f64, amount: f64 },
}

pub struct EventScheduler {
    rain_remaining: f64,
}

impl EventScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self { rain_remaining: 0.0 }
    }

    pub fn tick<R: Rng>(
        &mut self,
        config: &SimConfig,
        weather: Weather,
        dt: f64,
        rng: &mut R,
    ) -> Vec<WorldDirective> {
        let mut directives = Vec::new();

        match weather {
            Weather::Raining => {
                self.rain_remaining -= dt;
                if self.rain_remaining <= 0.0 {
                    self.rain_remaining = 0.0;
                    directives.push(WorldDirective::StopRain);
                } else if rng.gen_bool(config.hazard.rain_puddle_chance) {
                    directives.push(WorldDirective::FormPuddle {
                        x: rng.gen_range(0.0..config.world.width),
                        y: rng.gen_range(0.0..config.world.height),
                    });
                }
            }
            Weather::Clear => {
                if rng.gen_bool(config.events.rain_chance) {
                    let duration = rng
                        .gen_range(config.events.rain_min_duration..=config.events.rain_max_duration);
                    self.rain_remaining = duration;
                    directives.push(WorldDirective::StartRain { duration });
                }
            }
        }

        if rng.gen_bool(config.termite.raid_chance) {
            directives.push(WorldDirective::SpawnRaid {
                count: rng.gen_range(config.termite.raid_min..=config.termite.raid_max),
            });
        }

        if config.events.food_reseed && rng.gen_bool(config.events.food_reseed_chance) {
            directives.push(WorldDirective::SeedFood {
                x: rng.gen_range(0.0..config.world.width),
                y: rng.gen_range(0.0..config.world.height),
                amount: rng.gen_range(config.events.food_amount_min..=config.events.food_amount_max),
            });
        }

        directives
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
