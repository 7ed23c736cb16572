//! The ant state machine.
//!
//! One call per live ant per tick. Conflicting drives are resolved by a
//! fixed priority chain: colony defense, brood care, corpse recovery,
//! danger avoidance, then the foraging ladder (carrying -> home, target ->
//! seek, trail -> follow, food in range -> seek, else explore). Each
//! check short-circuits the rest. `Resting` suspends the whole chain
//! until its timer runs out.
//!
//! Stale targets are normal control flow: every handler re-validates its
//! referenced id and falls back to a default state when it has gone.

use formicarium_data::{
    Ant, AntRole, AntState, Corpse, DeathCause, PheromoneKind, Target, Termite,
};
use rand::Rng;

use super::movement;
use super::{AntCommand, SystemContext};

/// Runs one full tick for a live ant: timers, energy, exposure, the
/// transition chain, the active state's behavior, and scent emission.
pub fn update_ant<R: Rng>(
    idx: usize,
    ant: &mut Ant,
    ctx: &SystemContext,
    rng: &mut R,
    out: &mut Vec<AntCommand>,
) {
    let cfg = &ctx.config.ant;

    ant.melee_timer = (ant.melee_timer - ctx.dt).max(0.0);
    ant.drop_timer -= ctx.dt;

    // Energy drains continuously, whatever the ant is doing.
    ant.energy -= cfg.energy_drain_rate * ctx.dt;
    if ant.energy <= 0.0 {
        ant.energy = 0.0;
        ant.death_cause.get_or_insert(DeathCause::Starvation);
        return;
    }

    update_exposure(ant, ctx, out);
    if ant.is_dead() {
        return;
    }

    // Resting suspends all other behavior until the timer elapses.
    if ant.state == AntState::Resting {
        ant.rest_timer -= ctx.dt;
        ant.energy = (ant.energy + cfg.rest_recovery_rate * ctx.dt).min(cfg.max_energy);
        if ant.rest_timer <= 0.0 {
            ant.rest_timer = 0.0;
            ant.state = AntState::Exploring;
        }
        return;
    }

    transition(ant, ctx, rng, out);
    act(idx, ant, ctx, rng, out);
    emit_pheromones(ant, ctx, rng, out);
}

/// Hazard exposure clock: a continuous stay inside a puddle first costs
/// half the ant's energy, then kills it. Ants suffering long enough warn
/// the colony with a Danger burst from the puddle. Leaving resets the
/// clock.
fn update_exposure(ant: &mut Ant, ctx: &SystemContext, out: &mut Vec<AntCommand>) {
    match ctx.hazards.puddle_at(ant.x, ant.y) {
        Some(puddle) => {
            ant.exposure += ctx.dt;
            if !ant.exposure_penalized && ant.exposure >= ctx.hazards.penalty_time() {
                ant.exposure_penalized = true;
                ant.energy *= 0.5;
            }
            if !ant.exposure_warned && ant.exposure >= ctx.hazards.warning_time() {
                ant.exposure_warned = true;
                out.push(AntCommand::HazardBurst { puddle: puddle.id });
            }
            if ant.exposure >= ctx.hazards.death_time() {
                ant.energy = 0.0;
                ant.death_cause = Some(DeathCause::Hazard);
            }
        }
        None => {
            ant.exposure = 0.0;
            ant.exposure_penalized = false;
            ant.exposure_warned = false;
        }
    }
}

/// The priority chain. Mutates `ant.state`/`ant.target`; shared-state
/// side effects go through the command buffer.
fn transition<R: Rng>(ant: &mut Ant, ctx: &SystemContext, rng: &mut R, out: &mut Vec<AntCommand>) {
    let cfg = &ctx.config.ant;

    // 1. Colony under attack: soldiers engage, everyone else hides.
    if ctx.colony.under_attack {
        if ant.role == AntRole::Soldier {
            if let Some(termite) = nearest_termite(ctx.termites, ant, cfg.soldier_engage_range) {
                if ant.target != Some(Target::Termite(termite.id)) {
                    clear_target(ant, out);
                    ant.target = Some(Target::Termite(termite.id));
                }
                ant.state = AntState::AttackingTermite;
                return;
            }
        } else {
            if ant.state != AntState::Hiding {
                clear_target(ant, out);
                ant.state = AntState::Hiding;
            }
            return;
        }
    } else if ant.state == AntState::Hiding {
        ant.state = AntState::Exploring;
    }

    // The queen keeps to the nest; only defense and danger move her.
    if ant.role == AntRole::Queen {
        if !danger_check(ant, ctx, rng, out) && ant.state == AntState::AvoidingDanger {
            ant.speed_mult = 1.0;
            ant.state = AntState::Exploring;
        }
        return;
    }

    // 2. Nurses not hauling food tend the brood.
    if ant.role == AntRole::Nurse && !ant.carrying && ant.state != AntState::FeedingBrood {
        clear_target(ant, out);
        ant.state = AntState::FeedingBrood;
        return;
    }

    // 3. Corpse recovery.
    if !ant.carrying && ant.state != AntState::CollectingCorpse {
        if let Some(corpse) = nearest_corpse(ctx.corpses, ant, cfg.corpse_detect_range) {
            clear_target(ant, out);
            ant.target = Some(Target::Corpse(corpse.id));
            ant.state = AntState::CollectingCorpse;
            return;
        }
    }

    // 4. Danger repulsion.
    if !ant.carrying {
        if danger_check(ant, ctx, rng, out) {
            return;
        }
        if ant.state == AntState::AvoidingDanger {
            ant.speed_mult = 1.0;
            ant.state = AntState::Exploring;
        }
    }

    // States with their own exit conditions are not reassigned here.
    if matches!(
        ant.state,
        AntState::AttackingTermite
            | AntState::FeedingBrood
            | AntState::CollectingCorpse
            | AntState::ReturningHome
    ) {
        return;
    }

    // 5. The foraging ladder.
    if ant.carrying {
        clear_target(ant, out);
        ant.state = AntState::ReturningHome;
        return;
    }

    if let Some(Target::Food(id)) = ant.target {
        if ctx.food.is_valid(id) {
            ant.state = AntState::SeekingFood;
            return;
        }
        ant.target = None;
    }

    if ant.state == AntState::FollowingTrail {
        if let Some(Target::Trail(id)) = ant.target {
            if ctx.pheromones.get(id).is_some() {
                return;
            }
            // The deposit decayed away under us.
            ant.target = None;
        }
        ant.state = AntState::Exploring;
    }

    if let Some(trail) =
        ctx.pheromones
            .strongest_near(ant.x, ant.y, cfg.trail_detect_range, Some(PheromoneKind::FoodTrail))
    {
        out.push(AntCommand::BeginFollow { deposit: trail.id });
        ant.target = Some(Target::Trail(trail.id));
        ant.state = AntState::FollowingTrail;
        return;
    }

    if let Some(source) = ctx.food.nearest_active(ant.x, ant.y, cfg.food_detect_range) {
        ant.target = Some(Target::Food(source.id));
        ant.state = AntState::SeekingFood;
        return;
    }

    ant.state = AntState::Exploring;
}

/// Priority-4 body, shared with the queen's reduced chain. Returns true
/// when danger was found and the ant is now repelling.
fn danger_check<R: Rng>(
    ant: &mut Ant,
    ctx: &SystemContext,
    rng: &mut R,
    out: &mut Vec<AntCommand>,
) -> bool {
    let cfg = &ctx.config.ant;
    let Some(danger) = ctx.pheromones.strongest_near(
        ant.x,
        ant.y,
        cfg.danger_detect_range,
        Some(PheromoneKind::Danger),
    ) else {
        return false;
    };
    ant.heading = movement::repulsion_heading(ant, danger.x, danger.y, rng);
    ant.speed_mult = cfg.avoid_speed_mult.min(cfg.speed_mult_cap);
    clear_target(ant, out);
    ant.state = AntState::AvoidingDanger;
    true
}

/// Per-state behavior for the state chosen by `transition`.
fn act<R: Rng>(
    idx: usize,
    ant: &mut Ant,
    ctx: &SystemContext,
    rng: &mut R,
    out: &mut Vec<AntCommand>,
) {
    let cfg = &ctx.config.ant;
    match ant.state {
        AntState::Exploring => {
            if ant.role == AntRole::Queen {
                // The queen drifts around the nest mouth.
                if ant.distance_to(ctx.colony.home_x, ctx.colony.home_y) > cfg.hide_range {
                    movement::steer_toward(ant, ctx.colony.home_x, ctx.colony.home_y);
                    movement::step(ant, ctx);
                } else {
                    movement::wander(ant, ctx, rng);
                }
            } else {
                movement::wander(ant, ctx, rng);
            }
        }

        AntState::SeekingFood => {
            let Some(Target::Food(id)) = ant.target else {
                ant.state = AntState::Exploring;
                return;
            };
            let Some(source) = ctx.food.get(id).filter(|s| s.active) else {
                ant.target = None;
                ant.state = AntState::Exploring;
                return;
            };
            let (sx, sy) = (source.x, source.y);
            if movement::approach(ant, ctx, sx, sy, cfg.collect_range) {
                let want = cfg.carry_capacity - ant.carried_food;
                if want > 0.0 {
                    out.push(AntCommand::CollectFood { ant: idx, source: id });
                }
            }
        }

        AntState::ReturningHome => {
            let (hx, hy) = (ctx.colony.home_x, ctx.colony.home_y);
            if movement::approach(ant, ctx, hx, hy, cfg.home_range) {
                if ant.carried_food > 0.0 {
                    out.push(AntCommand::StoreFood {
                        amount: ant.carried_food,
                    });
                }
                ant.carried_food = 0.0;
                ant.carrying = false;
                ant.target = None;
                ant.energy = (ant.energy + cfg.deposit_energy_bonus).min(cfg.max_energy);
                let duration = if ant.brood_fed {
                    rng.gen_range(cfg.rest_long_min..=cfg.rest_long_max)
                } else {
                    rng.gen_range(cfg.rest_short_min..=cfg.rest_short_max)
                };
                ant.brood_fed = false;
                start_resting(ant, duration);
            }
        }

        AntState::FollowingTrail => {
            let Some(Target::Trail(id)) = ant.target else {
                ant.state = AntState::Exploring;
                return;
            };
            let Some(deposit) = ctx.pheromones.get(id) else {
                ant.target = None;
                ant.state = AntState::Exploring;
                return;
            };
            let (dx, dy) = (deposit.x, deposit.y);
            if movement::approach(ant, ctx, dx, dy, cfg.trail_accept_range) {
                out.push(AntCommand::EndFollow { deposit: id });
                if let Some(next) = ctx.pheromones.strongest_near_excluding(
                    ant.x,
                    ant.y,
                    cfg.trail_detect_range,
                    Some(PheromoneKind::FoodTrail),
                    Some(id),
                ) {
                    out.push(AntCommand::BeginFollow { deposit: next.id });
                    ant.target = Some(Target::Trail(next.id));
                } else if let Some(source) =
                    ctx.food.nearest_active(ant.x, ant.y, cfg.food_detect_range)
                {
                    ant.target = Some(Target::Food(source.id));
                    ant.state = AntState::SeekingFood;
                } else {
                    ant.target = None;
                    ant.state = AntState::Exploring;
                }
            }
        }

        AntState::AttackingTermite => {
            let Some(Target::Termite(id)) = ant.target else {
                ant.state = AntState::Exploring;
                return;
            };
            let Some(termite) = ctx.termites.iter().find(|t| t.id == id && !t.is_dead())
            else {
                ant.target = None;
                ant.state = AntState::Exploring;
                return;
            };
            let (tx, ty) = (termite.x, termite.y);
            if movement::approach(ant, ctx, tx, ty, cfg.melee_range) && ant.melee_timer <= 0.0 {
                ant.melee_timer = cfg.melee_cooldown;
                ant.energy -= cfg.melee_energy_cost;
                out.push(AntCommand::StrikeTermite {
                    termite: id,
                    damage: cfg.melee_damage,
                });
                if ant.energy <= 0.0 {
                    ant.energy = 0.0;
                    ant.death_cause = Some(DeathCause::Combat);
                }
            }
        }

        AntState::Hiding => {
            let (hx, hy) = (ctx.colony.home_x, ctx.colony.home_y);
            if ant.distance_to(hx, hy) > cfg.hide_range {
                movement::steer_toward(ant, hx, hy);
                movement::step(ant, ctx);
            }
        }

        AntState::FeedingBrood => {
            let succeeded =
                ant.role == AntRole::Nurse || rng.gen_bool(cfg.brood_feed_fallback_chance);
            if succeeded {
                ant.energy = (ant.energy - cfg.brood_feed_energy_cost).max(0.0);
                if ant.energy <= 0.0 {
                    ant.death_cause = Some(DeathCause::Starvation);
                    return;
                }
                ant.brood_fed = true;
                out.push(AntCommand::NourishBrood);
                let duration = rng.gen_range(cfg.rest_short_min..=cfg.rest_short_max);
                start_resting(ant, duration);
            } else {
                ant.state = AntState::Exploring;
            }
        }

        AntState::CollectingCorpse => {
            let Some(Target::Corpse(id)) = ant.target else {
                ant.state = AntState::Exploring;
                return;
            };
            let Some(corpse) = ctx.corpses.iter().find(|c| c.id == id && !c.collected)
            else {
                ant.target = None;
                ant.state = AntState::Exploring;
                return;
            };
            let (cx, cy) = (corpse.x, corpse.y);
            if movement::approach(ant, ctx, cx, cy, cfg.corpse_collect_range) {
                out.push(AntCommand::CollectCorpse { corpse: id });
                ant.target = None;
                ant.state = AntState::ReturningHome;
            }
        }

        AntState::AvoidingDanger => {
            // Heading and boost were set by the danger check; keep
            // repelling.
            movement::step(ant, ctx);
        }

        AntState::Resting => {}
    }
}

/// Scent emission on a fixed cadence: carriers reinforce the food trail
/// proportionally to how full they are (near-full carriers thicken it
/// with a small jittered cluster); explorers leave a weak mark.
fn emit_pheromones<R: Rng>(
    ant: &mut Ant,
    ctx: &SystemContext,
    rng: &mut R,
    out: &mut Vec<AntCommand>,
) {
    if ant.drop_timer > 0.0 {
        return;
    }
    let cfg = &ctx.config.pheromone;
    ant.drop_timer = cfg.drop_interval;

    if ant.carrying {
        let fullness = (ant.carried_food / ctx.config.ant.carry_capacity).clamp(0.0, 1.0);
        out.push(AntCommand::DropPheromone {
            x: ant.x,
            y: ant.y,
            kind: PheromoneKind::FoodTrail,
            base: cfg.food_trail_base * fullness as f32,
        });
        if fullness >= cfg.cluster_fullness {
            for _ in 0..cfg.cluster_extra_deposits {
                let jx = rng.gen_range(-cfg.cluster_jitter..cfg.cluster_jitter);
                let jy = rng.gen_range(-cfg.cluster_jitter..cfg.cluster_jitter);
                out.push(AntCommand::DropPheromone {
                    x: ant.x + jx,
                    y: ant.y + jy,
                    kind: PheromoneKind::FoodTrail,
                    base: cfg.food_trail_base * cfg.cluster_intensity_scale,
                });
            }
        }
    } else if ant.state == AntState::Exploring {
        out.push(AntCommand::DropPheromone {
            x: ant.x,
            y: ant.y,
            kind: PheromoneKind::Exploration,
            base: cfg.exploration_base,
        });
    }
}

pub fn start_resting(ant: &mut Ant, duration: f64) {
    ant.state = AntState::Resting;
    ant.rest_timer = duration;
    ant.speed_mult = 1.0;
}

fn clear_target(ant: &mut Ant, out: &mut Vec<AntCommand>) {
    if let Some(Target::Trail(id)) = ant.target {
        out.push(AntCommand::EndFollow { deposit: id });
    }
    ant.target = None;
}

fn nearest_termite<'a>(termites: &'a [Termite], ant: &Ant, range: f64) -> Option<&'a Termite> {
    termites
        .iter()
        .filter(|t| !t.is_dead())
        .map(|t| (t, t.distance_to(ant.x, ant.y)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(t, _)| t)
}

fn nearest_corpse<'a>(corpses: &'a [Corpse], ant: &Ant, range: f64) -> Option<&'a Corpse> {
    corpses
        .iter()
        .filter(|c| !c.collected)
        .map(|c| (c, ant.distance_to(c.x, c.y)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
