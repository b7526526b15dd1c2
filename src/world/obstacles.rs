// Overworld obstacle layout
// Enemies and the menu chest sit at fixed spots on the 800x600 field; all share
// the player's square footprint.
use super::Rect;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub id: &'static str,
    pub x: f64,
    pub y: f64,
    pub label: &'static str,
    pub color: &'static str,
}

impl Obstacle {
    pub const fn new(
        id: &'static str,
        x: f64,
        y: f64,
        label: &'static str,
        color: &'static str,
    ) -> Self {
        Self {
            id,
            x,
            y,
            label,
            color,
        }
    }

    pub fn footprint(&self, size: f64) -> Rect {
        Rect::square(self.x, self.y, size)
    }
}

/// Ordered obstacle list. Collision checks walk it front to back and the first
/// hit wins, so the order is part of the contract and is never changed.
#[derive(Clone, Debug)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        debug_assert!(
            obstacles
                .iter()
                .enumerate()
                .all(|(i, a)| obstacles[i + 1..].iter().all(|b| b.id != a.id)),
            "obstacle ids must be unique"
        );
        Self { obstacles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Obstacle> {
        self.obstacles.get(idx)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Index of the first obstacle whose footprint strictly overlaps `player`.
    pub fn first_overlap(&self, player: &Rect, size: f64) -> Option<usize> {
        self.obstacles
            .iter()
            .position(|o| o.footprint(size).intersects(player))
    }
}

pub fn overworld() -> ObstacleSet {
    ObstacleSet::new(vec![
        Obstacle::new("enemy1", 200.0, 150.0, "Grammar Goblin", "#e74c3c"),
        Obstacle::new("enemy2", 400.0, 150.0, "Math Wizard", "#3498db"),
        Obstacle::new("enemy3", 600.0, 350.0, "Science Slime", "#2ecc71"),
        Obstacle::new("menu", 100.0, 450.0, "Treasure Menu", "#f1c40f"),
    ])
}
