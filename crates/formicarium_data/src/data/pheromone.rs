use serde::{Deserialize, Serialize};

/// Scent channels ants can deposit and sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PheromoneKind {
    /// Marks a path toward food. Reinforced by followers, gone by max age.
    FoodTrail,
    /// Weak ambient signal laid while wandering.
    Exploration,
    /// Marks a lethal location. Never decays.
    Danger,
}

impl PheromoneKind {
    pub const ALL: [PheromoneKind; 3] = [
        PheromoneKind::FoodTrail,
        PheromoneKind::Exploration,
        PheromoneKind::Danger,
    ];
}

/// A single positioned scent mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PheromoneDeposit {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub kind: PheromoneKind,
    /// Current sensed strength, updated by the decay pass.
    pub intensity: f32,
    /// Strength at deposit time, after the type multiplier and cap.
    pub initial_intensity: f32,
    /// Seconds since deposit.
    pub age: f64,
    /// Ants currently tracking this deposit (FoodTrail only).
    pub followers: u32,
}

impl PheromoneDeposit {
    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}
