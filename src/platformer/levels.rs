//! Level geometry: immutable templates and the live instance built from them.
//!
//! Templates are parsed once from the embedded RON table. Every load or retry
//! builds a fresh `Level` with `Level::from_template`, so nothing that happens
//! to a live level can leak back into the catalog.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

const LEVEL_TABLE: &str = include_str!("levels.ron");

/// Axis-aligned box in level pixels (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap: touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectibleDef {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub dir: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub platforms: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub collectibles: Vec<CollectibleDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
}

/// The fixed, ordered level sequence. Indices handed out are 1-based.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelTemplate>,
}

impl LevelCatalog {
    pub fn from_ron(source: &str) -> Result<Self, String> {
        let catalog: LevelCatalog =
            ron::from_str(source).map_err(|e| format!("Level table parse failed: {}", e))?;
        if catalog.levels.is_empty() {
            return Err("Level table contains no levels".to_string());
        }
        Ok(catalog)
    }

    /// The level table compiled into the binary.
    pub fn builtin() -> Result<Self, String> {
        Self::from_ron(LEVEL_TABLE)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, level: usize) -> Option<&LevelTemplate> {
        level.checked_sub(1).and_then(|i| self.levels.get(i))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Live instance
// ─────────────────────────────────────────────────────────────────────────────

/// Carrot pickups are tested as a box of this half-width around their centre.
pub const COLLECTIBLE_HALF_SIZE: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl Collectible {
    pub fn from_def(def: &CollectibleDef) -> Self {
        Self {
            x: def.x,
            y: def.y,
            collected: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - COLLECTIBLE_HALF_SIZE,
            self.y - COLLECTIBLE_HALF_SIZE,
            COLLECTIBLE_HALF_SIZE * 2.0,
            COLLECTIBLE_HALF_SIZE * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub dir: f32,
}

impl Enemy {
    pub fn from_def(def: &EnemyDef) -> Self {
        Self {
            x: def.x,
            y: def.y,
            speed: def.speed,
            min_y: def.min_y,
            max_y: def.max_y,
            dir: def.dir,
        }
    }

    /// Vertical oscillation; the direction flips on reaching either bound.
    pub fn patrol(&mut self) {
        self.y += self.speed * self.dir;
        if self.y <= self.min_y || self.y >= self.max_y {
            self.dir = -self.dir;
        }
    }

    /// 20×24 box centred on the enemy's anchor point.
    pub fn hit_box(&self) -> Rect {
        Rect::new(self.x - 10.0, self.y - 12.0, 20.0, 24.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    pub platforms: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<Enemy>,
}

impl Level {
    pub fn from_template(template: &LevelTemplate) -> Self {
        Self {
            platforms: template.platforms.clone(),
            ladders: template.ladders.clone(),
            collectibles: template.collectibles.iter().map(Collectible::from_def).collect(),
            enemies: template.enemies.iter().map(Enemy::from_def).collect(),
        }
    }

    pub fn all_collected(&self) -> bool {
        self.collectibles.iter().all(|c| c.collected)
    }

    pub fn remaining(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_five_levels() {
        let catalog = LevelCatalog::builtin().expect("embedded level table parses");
        assert_eq!(catalog.len(), 5);
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(6).is_none());
        assert!(catalog.get(1).unwrap().enemies.is_empty());
        assert_eq!(catalog.get(5).unwrap().enemies.len(), 3);
    }

    #[test]
    fn test_every_level_has_a_floor_and_collectibles() {
        let catalog = LevelCatalog::builtin().unwrap();
        for n in 1..=catalog.len() {
            let template = catalog.get(n).unwrap();
            assert_eq!(template.platforms[0], Rect::new(0.0, 500.0, 960.0, 40.0));
            assert!(!template.collectibles.is_empty(), "level {} has no carrots", n);
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(LevelCatalog::from_ron("(levels: [])").is_err());
        assert!(LevelCatalog::from_ron("not ron").is_err());
    }

    #[test]
    fn test_live_level_does_not_touch_template() {
        let catalog = LevelCatalog::builtin().unwrap();
        let template = catalog.get(3).unwrap();
        let mut level = Level::from_template(template);
        level.collectibles[0].collected = true;
        level.enemies[0].y = 999.0;

        let fresh = Level::from_template(template);
        assert!(!fresh.collectibles[0].collected);
        assert_eq!(fresh.enemies[0].y, 250.0);
        assert_eq!(template.enemies[0].y, 250.0);
    }

    #[test]
    fn test_enemy_flips_at_bounds_inclusive() {
        let mut enemy = Enemy {
            x: 0.0,
            y: 278.5,
            speed: 1.5,
            min_y: 120.0,
            max_y: 280.0,
            dir: 1.0,
        };
        enemy.patrol();
        assert_eq!(enemy.y, 280.0);
        assert_eq!(enemy.dir, -1.0);
        enemy.patrol();
        assert_eq!(enemy.y, 278.5);
        assert_eq!(enemy.dir, -1.0);
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }
}
