use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caste assigned at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AntRole {
    Worker,
    Soldier,
    Scout,
    Forager,
    Nurse,
    Queen,
}

impl AntRole {
    /// Roles eligible for random assignment at spawn.
    pub const SPAWNABLE: [AntRole; 5] = [
        AntRole::Worker,
        AntRole::Soldier,
        AntRole::Scout,
        AntRole::Forager,
        AntRole::Nurse,
    ];
}

/// Behavioral state. Transitions are resolved by the behavior system in
/// a fixed priority order each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AntState {
    Exploring,
    SeekingFood,
    ReturningHome,
    FollowingTrail,
    AttackingTermite,
    Hiding,
    FeedingBrood,
    CollectingCorpse,
    AvoidingDanger,
    Resting,
}

impl AntState {
    pub const ALL: [AntState; 10] = [
        AntState::Exploring,
        AntState::SeekingFood,
        AntState::ReturningHome,
        AntState::FollowingTrail,
        AntState::AttackingTermite,
        AntState::Hiding,
        AntState::FeedingBrood,
        AntState::CollectingCorpse,
        AntState::AvoidingDanger,
        AntState::Resting,
    ];
}

/// What an ant is currently pursuing. Targets are non-owning ids and may
/// be invalidated at any point; consumers re-validate before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Food(u64),
    Trail(u64),
    Termite(u64),
    Corpse(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    Hazard,
    Combat,
}

/// A single colony member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ant {
    pub id: Uuid,
    pub role: AntRole,
    pub x: f64,
    pub y: f64,
    /// Movement bearing in radians.
    pub heading: f64,
    /// Slowly drifting wander bearing used while exploring.
    pub wander_angle: f64,
    pub energy: f64,
    pub carried_food: f64,
    pub carrying: bool,
    pub state: AntState,
    pub target: Option<Target>,
    /// Seconds until the next pheromone drop.
    pub drop_timer: f64,
    /// Remaining rest seconds; only meaningful in `Resting`.
    pub rest_timer: f64,
    /// Remaining melee cooldown seconds.
    pub melee_timer: f64,
    /// Continuous seconds spent inside a puddle.
    pub exposure: f64,
    pub exposure_penalized: bool,
    pub exposure_warned: bool,
    /// Transient speed multiplier (danger avoidance boost).
    pub speed_mult: f64,
    /// Set when this ant nourished brood since it last rested at home.
    pub brood_fed: bool,
    pub death_cause: Option<DeathCause>,
}

impl Ant {
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.energy <= 0.0
    }

    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}
