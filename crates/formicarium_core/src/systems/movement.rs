//! Reactive local steering: wander, pursuit, repulsion, containment.
//!
//! There is no pathfinding; every motion is a heading plus a speed, with
//! the heading re-aimed each tick. Zero-length vectors are guarded before
//! normalization so an agent standing exactly on its goal never produces
//! a NaN bearing.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use formicarium_data::Ant;
use rand::Rng;

use super::SystemContext;

/// Smooth random walk: the wander bearing drifts slowly and the actual
/// heading jitters around it, which reads as purposeful meandering
/// instead of noise.
pub fn wander<R: Rng>(ant: &mut Ant, ctx: &SystemContext, rng: &mut R) {
    let cfg = &ctx.config.ant;
    ant.wander_angle += rng.gen_range(-1.0..1.0) * cfg.wander_drift * ctx.dt;
    ant.wander_angle = ant.wander_angle.rem_euclid(TAU);
    ant.heading = ant.wander_angle + rng.gen_range(-cfg.wander_jitter..cfg.wander_jitter);
    step(ant, ctx);
}

/// Aims the heading at a goal point. A zero-distance goal leaves the
/// heading unchanged.
pub fn steer_toward(ant: &mut Ant, x: f64, y: f64) {
    let dx = x - ant.x;
    let dy = y - ant.y;
    if dx * dx + dy * dy > 0.0 {
        ant.heading = dy.atan2(dx);
    }
}

/// Bearing pointing away from a repulsor, jittered by up to ±45° so a
/// crowd fleeing the same deposit fans out instead of clustering.
pub fn repulsion_heading<R: Rng>(ant: &Ant, from_x: f64, from_y: f64, rng: &mut R) -> f64 {
    let dx = ant.x - from_x;
    let dy = ant.y - from_y;
    let away = if dx * dx + dy * dy > 0.0 {
        dy.atan2(dx)
    } else {
        // Standing exactly on the repulsor: any direction is away.
        rng.gen_range(0.0..TAU)
    };
    away + rng.gen_range(-FRAC_PI_4..FRAC_PI_4)
}

/// Advances the ant along its heading, applying the terrain speed factor
/// and the transient state multiplier, then contains it in the world
/// rectangle by reflecting off the edges.
pub fn step(ant: &mut Ant, ctx: &SystemContext) {
    let cfg = &ctx.config.ant;
    let terrain_factor = ctx.terrain.speed_modifier(ant.x, ant.y, ctx.weather);
    let speed = cfg.base_speed * ant.speed_mult.min(cfg.speed_mult_cap) * terrain_factor;

    let nx = ant.x + ant.heading.cos() * speed * ctx.dt;
    let ny = ant.y + ant.heading.sin() * speed * ctx.dt;
    if !nx.is_finite() || !ny.is_finite() {
        return;
    }

    let (cx, cy) = ctx.bounds.clamp(nx, ny);
    if cx != nx {
        ant.heading = PI - ant.heading;
        ant.wander_angle = PI - ant.wander_angle;
    }
    if cy != ny {
        ant.heading = -ant.heading;
        ant.wander_angle = -ant.wander_angle;
    }
    ant.x = cx;
    ant.y = cy;
}

/// Moves toward a goal, stopping dead once within `arrive_range`.
/// Returns true when inside the range after the move.
pub fn approach(ant: &mut Ant, ctx: &SystemContext, x: f64, y: f64, arrive_range: f64) -> bool {
    if ant.distance_to(x, y) <= arrive_range {
        return true;
    }
    steer_toward(ant, x, y);
    step(ant, ctx);
    ant.distance_to(x, y) <= arrive_range
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::food::FoodManager;
    use crate::hazard::HazardField;
    use crate::pheromone::PheromoneField;
    use crate::terrain::{OpenGround, WorldBounds};
    use crate::systems::ColonyView;
    use formicarium_data::{AntRole, AntState, Weather};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    pub(crate) struct Fixture {
        pub config: SimConfig,
        pub pheromones: PheromoneField,
        pub food: FoodManager,
        pub hazards: HazardField,
        pub termites: Vec<formicarium_data::Termite>,
        pub corpses: Vec<formicarium_data::Corpse>,
        pub terrain: OpenGround,
    }

    impl Fixture {
        pub fn new() -> Self {
            let config = SimConfig::default();
            Self {
                pheromones: PheromoneField::new(config.pheromone.clone()),
                food: FoodManager::new(),
                hazards: HazardField::new(config.hazard.clone()),
                termites: Vec::new(),
                corpses: Vec::new(),
                terrain: OpenGround::default(),
                config,
            }
        }

        pub fn ctx(&self, dt: f64) -> SystemContext<'_> {
            SystemContext {
                config: &self.config,
                pheromones: &self.pheromones,
                food: &self.food,
                hazards: &self.hazards,
                termites: &self.termites,
                corpses: &self.corpses,
                colony: ColonyView {
                    home_x: 1000.0,
                    home_y: 600.0,
                    under_attack: false,
                },
                terrain: &self.terrain,
                bounds: WorldBounds {
                    width: self.config.world.width,
                    height: self.config.world.height,
                },
                weather: Weather::Clear,
                dt,
            }
        }
    }

    pub(crate) fn test_ant(x: f64, y: f64) -> Ant {
        Ant {
            id: uuid::Uuid::nil(),
            role: AntRole::Worker,
            x,
            y,
            heading: 0.0,
            wander_angle: 0.0,
            energy: 100.0,
            carried_food: 0.0,
            carrying: false,
            state: AntState::Exploring,
            target: None,
            drop_timer: 1.0,
            rest_timer: 0.0,
            melee_timer: 0.0,
            exposure: 0.0,
            exposure_penalized: false,
            exposure_warned: false,
            speed_mult: 1.0,
            brood_fed: false,
            death_cause: None,
        }
    }

    #[test]
    fn test_step_moves_along_heading() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx(1.0);
        let mut ant = test_ant(100.0, 100.0);
        ant.heading = 0.0;
        step(&mut ant, &ctx);
        assert!((ant.x - 140.0).abs() < 1e-9);
        assert_eq!(ant.y, 100.0);
    }

    #[test]
    fn test_step_reflects_off_bounds() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx(1.0);
        let mut ant = test_ant(5.0, 100.0);
        ant.heading = PI; // straight at the x=0 wall
        step(&mut ant, &ctx);
        assert_eq!(ant.x, 0.0);
        // Reflected heading now points into the world.
        assert!(ant.heading.cos() > 0.0);
    }

    #[test]
    fn test_steer_toward_zero_distance_is_nan_free() {
        let mut ant = test_ant(50.0, 50.0);
        ant.heading = 1.0;
        steer_toward(&mut ant, 50.0, 50.0);
        assert_eq!(ant.heading, 1.0);
        assert!(ant.heading.is_finite());
    }

    #[test]
    fn test_repulsion_points_away() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ant = test_ant(110.0, 100.0);
        for _ in 0..50 {
            let heading = repulsion_heading(&ant, 100.0, 100.0, &mut rng);
            assert!(heading.is_finite());
            // Away bearing is 0 rad ± 45°; cos stays positive.
            assert!(heading.cos() > 0.0);
        }
    }

    #[test]
    fn test_repulsion_atop_source_is_finite() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ant = test_ant(100.0, 100.0);
        let heading = repulsion_heading(&ant, 100.0, 100.0, &mut rng);
        assert!(heading.is_finite());
    }

    #[test]
    fn test_approach_stops_inside_range() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx(0.05);
        let mut ant = test_ant(100.0, 100.0);
        let arrived = approach(&mut ant, &ctx, 105.0, 100.0, 10.0);
        assert!(arrived);
        // Already in range: no movement happened.
        assert_eq!(ant.x, 100.0);
    }

    #[test]
    fn test_rain_slows_movement() {
        let fixture = Fixture::new();
        let mut ctx = fixture.ctx(1.0);
        ctx.weather = Weather::Raining;
        let mut ant = test_ant(100.0, 100.0);
        ant.heading = 0.0;
        step(&mut ant, &ctx);
        assert!((ant.x - 128.0).abs() < 1e-9); // 40 * 0.7
    }
}
