// Directional input: the held-key set written by the keyboard listeners and
// the read-only view the motion loop polls every frame.
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a `KeyboardEvent.key` value; anything but the arrow keys is ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit displacement in screen space (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Read-only capability over "which directions are held right now".
pub trait HeldKeys {
    fn is_held(&self, dir: Direction) -> bool;
}

impl HeldKeys for [Direction] {
    fn is_held(&self, dir: Direction) -> bool {
        self.contains(&dir)
    }
}

impl HeldKeys for HashSet<Direction> {
    fn is_held(&self, dir: Direction) -> bool {
        self.contains(&dir)
    }
}

/// Held arrow keys, fed by keydown/keyup and cleared on blur.
#[derive(Debug, Default)]
pub struct KeySet {
    held: HashSet<Direction>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `key` is an arrow key (caller may suppress scrolling).
    pub fn press(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(dir) => {
                self.held.insert(dir);
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(dir) => {
                self.held.remove(&dir);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl HeldKeys for KeySet {
    fn is_held(&self, dir: Direction) -> bool {
        self.held.contains(&dir)
    }
}
