//! Per-frame player integration and collision against level geometry.
//!
//! All values are per simulation frame (60 Hz), not per second. One
//! semi-implicit Euler step per frame with no sub-stepping: a fall fast
//! enough to cross a thin platform inside one frame passes through it.

use bevy::prelude::*;

use super::levels::{Level, Rect};
use crate::shared::SCREEN_WIDTH;

pub const GRAVITY: f32 = 0.7;
pub const FRICTION: f32 = 0.85;
pub const RUN_ACCEL: f32 = 0.5;
pub const MAX_RUN_SPEED: f32 = 4.8;
pub const CLIMB_SPEED: f32 = 2.6;
pub const JUMP_VELOCITY: f32 = -13.0;
/// Depth below a surface top within which a falling player still lands on it.
pub const LANDING_BAND: f32 = 20.0;

pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 56.0;
pub const PLAYER_SPAWN: Vec2 = Vec2::new(80.0, 380.0);

pub const WORLD_WIDTH: f32 = SCREEN_WIDTH;
/// How far past either world edge the player may wander.
pub const WORLD_MARGIN: f32 = 100.0;

/// Held movement keys for one frame plus the latched jump request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub on_ground: bool,
    pub climbing: bool,
    pub spawn: Vec2,
    /// Walk cycle frame, 0..=3.
    pub frame: u8,
    pub frame_timer: u32,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::at_spawn(PLAYER_SPAWN)
    }
}

impl Player {
    pub fn at_spawn(spawn: Vec2) -> Self {
        Self {
            x: spawn.x,
            y: spawn.y,
            vx: 0.0,
            vy: 0.0,
            w: PLAYER_WIDTH,
            h: PLAYER_HEIGHT,
            on_ground: false,
            climbing: false,
            spawn,
            frame: 0,
            frame_timer: 0,
            facing: 1.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Back to the spawn point without touching level state.
    pub fn respawn(&mut self) {
        self.x = self.spawn.x;
        self.y = self.spawn.y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.climbing = false;
    }

    fn overlaps_horizontally(&self, rect: &Rect) -> bool {
        self.x + self.w > rect.x && self.x < rect.right()
    }

    /// Snap onto `surface_top` if falling into the band `(surface_top, band_bottom)`.
    fn try_land(&mut self, rect: &Rect, band_bottom: f32) -> bool {
        let bottom = self.bottom();
        if self.overlaps_horizontally(rect)
            && bottom > rect.y
            && bottom < band_bottom
            && self.vy >= 0.0
        {
            self.y = rect.y - self.h;
            self.vy = 0.0;
            self.on_ground = true;
            self.climbing = false;
            return true;
        }
        false
    }

    /// Advance the walk cycle. Only animates while running on the ground;
    /// stopping snaps back to the idle frame.
    pub fn animate(&mut self) {
        if self.vx.abs() > 0.5 && self.on_ground {
            self.frame_timer += 1;
            let cadence = ((self.vx.abs() * 3.0).floor() as u32).clamp(1, 6);
            if self.frame_timer >= 8 - cadence {
                self.frame = (self.frame + 1) % 4;
                self.frame_timer = 0;
            }
        } else {
            self.frame = 0;
            self.frame_timer = 0;
        }
    }
}

/// Integrate one frame of player motion against `level`.
///
/// Returns `true` when the latched jump request was spent on a jump, so the
/// caller can clear its latch. A request made in mid-air stays latched.
pub fn step_player(player: &mut Player, intent: &MoveIntent, level: &Level) -> bool {
    // Horizontal: accelerate, clamp, then friction.
    if intent.left {
        player.vx -= RUN_ACCEL;
        player.facing = -1.0;
    }
    if intent.right {
        player.vx += RUN_ACCEL;
        player.facing = 1.0;
    }
    player.vx = player.vx.clamp(-MAX_RUN_SPEED, MAX_RUN_SPEED);
    player.vx *= FRICTION;

    // Ladders drive vy directly and suspend gravity.
    let bounds = player.bounds();
    player.climbing = level.ladders.iter().any(|ladder| bounds.intersects(ladder));
    if player.climbing {
        player.vy = if intent.up {
            -CLIMB_SPEED
        } else if intent.down {
            CLIMB_SPEED
        } else {
            0.0
        };
    } else {
        player.vy += GRAVITY;
    }

    player.x += player.vx;
    player.y += player.vy;

    // Landing. Every candidate is evaluated; the last match wins.
    player.on_ground = false;
    for platform in &level.platforms {
        player.try_land(platform, platform.bottom() + LANDING_BAND);
    }
    for ladder in &level.ladders {
        player.try_land(ladder, ladder.y + LANDING_BAND);
    }

    let mut jumped = false;
    if intent.jump && (player.on_ground || player.climbing) {
        player.vy = JUMP_VELOCITY;
        player.on_ground = false;
        player.climbing = false;
        jumped = true;
    }

    player.x = player
        .x
        .clamp(-WORLD_MARGIN, WORLD_WIDTH - player.w + WORLD_MARGIN);

    jumped
}
