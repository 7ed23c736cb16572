use serde::{Deserialize, Serialize};

/// A depletable food node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSource {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub amount: f64,
    pub max_amount: f64,
    pub active: bool,
    /// Seconds spent in the near-empty grace window before forced depletion.
    pub grace: f64,
}

impl FoodSource {
    #[must_use]
    pub fn new(id: u64, x: f64, y: f64, amount: f64) -> Self {
        Self {
            id,
            x,
            y,
            amount,
            max_amount: amount,
            active: true,
            grace: 0.0,
        }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        !self.active
    }
}

/// A static circular hazard zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puddle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Ants that have died inside this puddle. Only ever increases.
    pub death_count: u32,
}

impl Puddle {
    #[must_use]
    pub fn new(id: u64, x: f64, y: f64, radius: f64) -> Self {
        Self {
            id,
            x,
            y,
            radius,
            death_count: 0,
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Remains of a dead ant, collectable by workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpse {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub collected: bool,
}
