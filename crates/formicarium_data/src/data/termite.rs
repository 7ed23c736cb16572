use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Adversarial agent objective. Mirrors the ant state machine but with a
/// fixed hostile priority: food, then the colony, then individual ants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TermiteState {
    Seeking,
    AttackingFood { source: u64 },
    AttackingColony,
    AttackingAnt { ant: Uuid },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Termite {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub health: f64,
    pub state: TermiteState,
    /// Remaining attack cooldown seconds.
    pub attack_timer: f64,
}

impl Termite {
    #[must_use]
    pub fn new(id: u64, x: f64, y: f64, health: f64) -> Self {
        Self {
            id,
            x,
            y,
            health,
            state: TermiteState::Seeking,
            attack_timer: 0.0,
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}
