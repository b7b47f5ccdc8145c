//! Scene selection and the two-phase door transition.

use bevy::math::Vec2;

use super::actors::cell_at;
use super::grid::SolidGrid;

/// Seconds after a door trip before another door will trigger.
pub const DOOR_COOLDOWN: f32 = 0.6;
/// Fade alpha change per second in each phase.
pub const FADE_RATE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scene {
    #[default]
    Village,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    None,
    /// Darkening towards the swap.
    In,
    /// Brightening after the swap.
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneTransition {
    pub phase: TransitionPhase,
    pub alpha: f32,
    pub target: Scene,
    pub spawn: Vec2,
}

impl SceneTransition {
    pub fn is_running(&self) -> bool {
        self.phase != TransitionPhase::None
    }

    /// Begin darkening towards `target`. Ignored while already running.
    pub fn start(&mut self, target: Scene, spawn: Vec2) -> bool {
        if self.is_running() {
            return false;
        }
        *self = Self {
            phase: TransitionPhase::In,
            alpha: 0.0,
            target,
            spawn,
        };
        true
    }

    /// Advance the fade. Returns the scene and spawn to swap to on the frame
    /// the screen reaches full black.
    pub fn tick(&mut self, dt: f32) -> Option<(Scene, Vec2)> {
        match self.phase {
            TransitionPhase::None => None,
            TransitionPhase::In => {
                self.alpha += dt * FADE_RATE;
                if self.alpha >= 1.0 {
                    self.alpha = 1.0;
                    self.phase = TransitionPhase::Out;
                    Some((self.target, self.spawn))
                } else {
                    None
                }
            }
            TransitionPhase::Out => {
                self.alpha -= dt * FADE_RATE;
                if self.alpha <= 0.0 {
                    self.alpha = 0.0;
                    self.phase = TransitionPhase::None;
                }
                None
            }
        }
    }
}

/// First walkable of: the spawn, below, above, right, left. Falls back to
/// the spawn itself.
pub fn safe_spawn(spawn: Vec2, solids: &SolidGrid) -> Vec2 {
    [
        spawn,
        spawn + Vec2::new(0.0, 1.0),
        spawn + Vec2::new(0.0, -1.0),
        spawn + Vec2::new(1.0, 0.0),
        spawn + Vec2::new(-1.0, 0.0),
    ]
    .into_iter()
    .find(|&candidate| solids.is_walkable(cell_at(candidate)))
    .unwrap_or(spawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::village::grid::Cell;

    #[test]
    fn test_fade_swaps_once_at_full_black() {
        let mut fade = SceneTransition::default();
        assert!(fade.start(Scene::Home, Vec2::new(15.0, 11.0)));
        assert!(!fade.start(Scene::Village, Vec2::ZERO));
        assert_eq!(fade.tick(0.25), None);
        assert!((fade.alpha - 0.5).abs() < 1e-6);
        assert_eq!(fade.tick(0.25), Some((Scene::Home, Vec2::new(15.0, 11.0))));
        assert_eq!(fade.phase, TransitionPhase::Out);
        assert_eq!(fade.tick(0.3), None);
        assert_eq!(fade.tick(0.3), None);
        assert_eq!(fade.phase, TransitionPhase::None);
        assert_eq!(fade.alpha, 0.0);
    }

    #[test]
    fn test_safe_spawn_prefers_target_then_below() {
        let mut solids = SolidGrid::default();
        let spawn = Vec2::new(5.0, 5.0);
        assert_eq!(safe_spawn(spawn, &solids), spawn);
        solids.set(Cell::new(5, 5), true);
        assert_eq!(safe_spawn(spawn, &solids), Vec2::new(5.0, 6.0));
        solids.set(Cell::new(6, 5), true);
        solids.set(Cell::new(4, 5), true);
        assert_eq!(safe_spawn(spawn, &solids), Vec2::new(6.0, 5.0));
    }

    #[test]
    fn test_safe_spawn_falls_back_to_target() {
        let mut solids = SolidGrid::default();
        solids.set_rect(4, 4, 3, 3, true);
        let spawn = Vec2::new(5.0, 5.0);
        assert_eq!(safe_spawn(spawn, &solids), spawn);
    }
}
