//! Shared resources, events, and states for Meadowhop.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly; the UI and save
//! layers read the public state of the two games through their modules.

use bevy::prelude::*;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Launcher,
    Platformer,
    Village,
}

// ═══════════════════════════════════════════════════════════════════════
// SCREEN
// ═══════════════════════════════════════════════════════════════════════

/// Logical screen size. Both games simulate in this coordinate space and
/// pointer positions are rescaled into it regardless of window size.
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Pixel size of one village tile.
pub const TILE_SIZE: f32 = 32.0;

/// Axis-aligned rectangle in logical screen pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Edge-inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT: per-frame intents, written once in PreUpdate
// ═══════════════════════════════════════════════════════════════════════

/// Pointer activity relevant to on-screen buttons, in logical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSignal {
    Down(Vec2),
    Up(Vec2),
    Cancel,
    Leave,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlatformerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Jump key went down this frame.
    pub jump_pressed: bool,
    /// Jump key went up this frame.
    pub jump_released: bool,
    pub retry: bool,
    pub exit: bool,
    pub pointer: Option<PointerSignal>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct VillageInput {
    /// Raw direction in tile space: x grows to the right, y grows downwards.
    /// Components are -1, 0 or 1; diagonals are not normalised.
    pub move_dir: Vec2,
    pub interact: bool,
    pub plant: bool,
    pub place: bool,
    pub pickup: bool,
    pub rotate: bool,
    pub toggle_hemisphere: bool,
    pub select_crop: Option<usize>,
    pub furniture_next: bool,
    pub furniture_prev: bool,
    pub menu_prev: bool,
    pub menu_next: bool,
    pub confirm: bool,
    pub back: bool,
    pub exit: bool,
    pub click: Option<Vec2>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct LauncherInput {
    pub choice: Option<GameState>,
    pub quit: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// SCREEN FADE: written by whichever game is running, drawn by the UI
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ScreenFade {
    /// Current opacity 0.0 (transparent) to 1.0 (opaque)
    pub alpha: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// A platformer level instance was (re)built from its template.
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelLoadedEvent {
    pub level: usize,
}

/// The village swapped its active scene, so tile sprites must be rebuilt.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneChangedEvent;

/// Sent when the village clock rolls over into a new day.
#[derive(Event, Debug, Clone, Copy)]
pub struct DayStartEvent {
    pub day: u32,
}

/// Ask the save layer to snapshot the village now.
#[derive(Event, Debug, Clone, Copy)]
pub struct SaveRequestEvent;
