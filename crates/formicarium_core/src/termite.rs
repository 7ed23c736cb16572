//! Termite raids: the adversarial agent state machine.
//!
//! Targeting priority is the mirror image of the ants' chain: the
//! nearest active food source in range, else the colony nest in range,
//! else an individual ant. While soldiers live, termites only dare pick
//! off non-soldiers at reduced range; once the soldiers are gone, any
//! ant anywhere in range is prey. Damage lands on a fixed cooldown.

use formicarium_data::{Ant, AntRole, Termite, TermiteState};
use rand::Rng;

use crate::config::TermiteConfig;
use crate::food::FoodManager;
use crate::terrain::WorldBounds;

/// Deferred attack effects, applied by the world after the termite pass.
#[derive(Debug, Clone)]
pub enum TermiteCommand {
    DestroyFood { source: u64 },
    DrainColony,
    DamageAnt { ant: uuid::Uuid, damage: f64 },
}

/// Spawns a raid group along the world edge.
pub fn spawn_raid<R: Rng>(
    count: u32,
    bounds: WorldBounds,
    config: &TermiteConfig,
    next_id: &mut u64,
    rng: &mut R,
) -> Vec<Termite> {
    (0..count)
        .map(|_| {
            let (x, y) = match rng.gen_range(0..4) {
                0 => (rng.gen_range(0.0..bounds.width), 0.0),
                1 => (rng.gen_range(0.0..bounds.width), bounds.height),
                2 => (0.0, rng.gen_range(0.0..bounds.height)),
                _ => (bounds.width, rng.gen_range(0.0..bounds.height)),
            };
            let id = *next_id;
            *next_id += 1;
            Termite::new(id, x, y, config.max_health)
        })
        .collect()
}

/// One tick for the whole termite set: retargeting, movement, attacks.
pub fn update_termites(
    termites: &mut [Termite],
    ants: &[Ant],
    food: &FoodManager,
    home: (f64, f64),
    config: &TermiteConfig,
    bounds: WorldBounds,
    dt: f64,
) -> Vec<TermiteCommand> {
    let soldiers_alive = ants
        .iter()
        .any(|a| a.role == AntRole::Soldier && !a.is_dead());
    let mut commands = Vec::new();

    for termite in termites.iter_mut().filter(|t| !t.is_dead()) {
        termite.attack_timer = (termite.attack_timer - dt).max(0.0);
        retarget(termite, ants, food, home, soldiers_alive, config);

        let goal = match termite.state {
            TermiteState::Seeking => Some(home),
            TermiteState::AttackingFood { source } => {
                food.get(source).filter(|s| s.active).map(|s| (s.x, s.y))
            }
            TermiteState::AttackingColony => Some(home),
            TermiteState::AttackingAnt { ant } => ants
                .iter()
                .find(|a| a.id == ant && !a.is_dead())
                .map(|a| (a.x, a.y)),
        };
        let Some((gx, gy)) = goal else {
            termite.state = TermiteState::Seeking;
            continue;
        };

        let dist = termite.distance_to(gx, gy);
        if dist > config.contact_range {
            // No NaN bearing: dist is known positive here.
            let dx = gx - termite.x;
            let dy = gy - termite.y;
            let step = config.speed * dt;
            termite.x += dx / dist * step.min(dist);
            termite.y += dy / dist * step.min(dist);
            let (cx, cy) = bounds.clamp(termite.x, termite.y);
            termite.x = cx;
            termite.y = cy;
            continue;
        }

        if termite.attack_timer > 0.0 {
            continue;
        }
        termite.attack_timer = config.attack_cooldown;
        match termite.state {
            TermiteState::AttackingFood { source } => {
                commands.push(TermiteCommand::DestroyFood { source });
                termite.state = TermiteState::Seeking;
            }
            TermiteState::AttackingColony => commands.push(TermiteCommand::DrainColony),
            TermiteState::AttackingAnt { ant } => commands.push(TermiteCommand::DamageAnt {
                ant,
                damage: config.damage,
            }),
            TermiteState::Seeking => {}
        }
    }
    commands
}

/// Priority targeting. Existing valid targets are kept; lost ones fall
/// back down the chain.
fn retarget(
    termite: &mut Termite,
    ants: &[Ant],
    food: &FoodManager,
    home: (f64, f64),
    soldiers_alive: bool,
    config: &TermiteConfig,
) {
    // Re-validate the current objective before looking for a new one.
    match termite.state {
        TermiteState::AttackingFood { source } if food.is_valid(source) => return,
        TermiteState::AttackingAnt { ant }
            if ants.iter().any(|a| a.id == ant && !a.is_dead()) =>
        {
            return
        }
        TermiteState::AttackingColony => return,
        _ => {}
    }

    if let Some(source) = food.nearest_active(termite.x, termite.y, config.food_range) {
        termite.state = TermiteState::AttackingFood { source: source.id };
        return;
    }

    if termite.distance_to(home.0, home.1) <= config.colony_range {
        termite.state = TermiteState::AttackingColony;
        return;
    }

    let range = if soldiers_alive {
        config.ant_range * config.guarded_range_factor
    } else {
        config.ant_range
    };
    let victim = ants
        .iter()
        .filter(|a| !a.is_dead())
        .filter(|a| !soldiers_alive || a.role != AntRole::Soldier)
        .map(|a| (a, termite.distance_to(a.x, a.y)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    match victim {
        Some((ant, _)) => termite.state = TermiteState::AttackingAnt { ant: ant.id },
        None => termite.state = TermiteState::Seeking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::create_ant_with_rng;
    use crate::config::SimConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const BOUNDS: WorldBounds = WorldBounds {
        width: 2000.0,
        height: 1200.0,
    };

    fn ant_at(x: f64, y: f64, role: AntRole) -> Ant {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ant = create_ant_with_rng(role, x, y, &config, &mut rng);
        ant.x = x;
        ant.y = y;
        ant
    }

    #[test]
    fn test_raid_spawns_on_edges() {
        let config = TermiteConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut next_id = 0;
        let raid = spawn_raid(5, BOUNDS, &config, &mut next_id, &mut rng);
        assert_eq!(raid.len(), 5);
        assert_eq!(next_id, 5);
        for t in &raid {
            let on_edge = t.x == 0.0 || t.y == 0.0 || t.x == BOUNDS.width || t.y == BOUNDS.height;
            assert!(on_edge, "termite spawned inside the field");
            assert_eq!(t.health, config.max_health);
        }
    }

    #[test]
    fn test_food_outranks_colony_and_ants() {
        let config = TermiteConfig::default();
        let mut food = FoodManager::new();
        let source = food.add_source(150.0, 100.0, 50.0);
        let ants = vec![ant_at(105.0, 100.0, AntRole::Worker)];
        let mut termite = Termite::new(0, 100.0, 100.0, config.max_health);
        retarget(
            &mut termite,
            &ants,
            &food,
            (120.0, 100.0),
            false,
            &config,
        );
        assert_eq!(termite.state, TermiteState::AttackingFood { source });
    }

    #[test]
    fn test_colony_outranks_ants() {
        let config = TermiteConfig::default();
        let food = FoodManager::new();
        let ants = vec![ant_at(105.0, 100.0, AntRole::Worker)];
        let mut termite = Termite::new(0, 100.0, 100.0, config.max_health);
        retarget(
            &mut termite,
            &ants,
            &food,
            (300.0, 100.0),
            false,
            &config,
        );
        assert_eq!(termite.state, TermiteState::AttackingColony);
    }

    #[test]
    fn test_guarded_colony_limits_ant_hunting() {
        let config = TermiteConfig::default();
        let food = FoodManager::new();
        // Home far away so the colony branch cannot fire.
        let home = (5000.0, 5000.0);

        // A worker at 100 units: reachable only when no soldiers live.
        let worker = ant_at(200.0, 100.0, AntRole::Worker);
        let soldier = ant_at(190.0, 100.0, AntRole::Soldier);
        let mut termite = Termite::new(0, 100.0, 100.0, config.max_health);

        let ants = vec![worker.clone(), soldier];
        retarget(&mut termite, &ants, &food, home, true, &config);
        // 100 > 120 * 0.5, and the closer soldier is never a target.
        assert_eq!(termite.state, TermiteState::Seeking);

        let ants = vec![worker.clone()];
        retarget(&mut termite, &ants, &food, home, false, &config);
        assert_eq!(
            termite.state,
            TermiteState::AttackingAnt { ant: worker.id }
        );
    }

    #[test]
    fn test_contact_attack_respects_cooldown() {
        let config = TermiteConfig::default();
        let sim = SimConfig::default();
        let mut food = FoodManager::new();
        let _ = food.add_source(5000.0, 5000.0, 1.0); // out of range
        let victim = ant_at(105.0, 100.0, AntRole::Worker);
        let victim_id = victim.id;
        let ants = vec![victim];
        let mut termites = vec![Termite::new(0, 100.0, 100.0, sim.termite.max_health)];

        let commands = update_termites(
            &mut termites,
            &ants,
            &food,
            (5000.0, 5000.0),
            &config,
            BOUNDS,
            0.05,
        );
        assert!(matches!(
            commands.as_slice(),
            [TermiteCommand::DamageAnt { ant, .. }] if *ant == victim_id
        ));
        // Cooldown active: the immediate next tick lands nothing.
        let commands = update_termites(
            &mut termites,
            &ants,
            &food,
            (5000.0, 5000.0),
            &config,
            BOUNDS,
            0.05,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn test_destroying_food_resets_to_seeking() {
        let config = TermiteConfig::default();
        let mut food = FoodManager::new();
        let source = food.add_source(110.0, 100.0, 50.0);
        let mut termites = vec![Termite::new(0, 100.0, 100.0, config.max_health)];
        let commands = update_termites(
            &mut termites,
            &[],
            &food,
            (5000.0, 5000.0),
            &config,
            BOUNDS,
            0.05,
        );
        assert!(matches!(
            commands.as_slice(),
            [TermiteCommand::DestroyFood { source: s }] if *s == source
        ));
        assert_eq!(termites[0].state, TermiteState::Seeking);
    }

    #[test]
    fn test_seeking_marches_on_the_nest() {
        let config = TermiteConfig::default();
        let food = FoodManager::new();
        let mut termites = vec![Termite::new(0, 0.0, 0.0, config.max_health)];
        let home = (1000.0, 600.0);
        let before = termites[0].distance_to(home.0, home.1);
        update_termites(&mut termites, &[], &food, home, &config, BOUNDS, 1.0);
        let after = termites[0].distance_to(home.0, home.1);
        assert!(after < before);
    }
}
