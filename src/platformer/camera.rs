use bevy::prelude::*;

use crate::shared::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Fraction of the remaining distance covered each frame.
pub const CAMERA_LERP: f32 = 0.12;
/// Keeps a little more of the ground below the player in view.
pub const CAMERA_DOWN_BIAS: f32 = 40.0;

/// Smoothed follow camera in level pixels. `offset` is the top-left corner
/// of the viewport; it never goes negative on either axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FollowCamera {
    pub offset: Vec2,
    pub target: Vec2,
}

impl FollowCamera {
    pub fn follow(&mut self, focus: Vec2) {
        self.target = Vec2::new(
            (focus.x - SCREEN_WIDTH / 2.0).max(0.0),
            (focus.y - SCREEN_HEIGHT / 2.0 + CAMERA_DOWN_BIAS).max(0.0),
        );
        self.offset += (self.target - self.offset) * CAMERA_LERP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_clamped_to_origin() {
        let mut camera = FollowCamera::default();
        camera.follow(Vec2::new(100.0, 100.0));
        assert_eq!(camera.target, Vec2::ZERO);
        assert_eq!(camera.offset, Vec2::ZERO);
    }

    #[test]
    fn test_offset_eases_toward_target() {
        let mut camera = FollowCamera::default();
        let focus = Vec2::new(SCREEN_WIDTH / 2.0 + 100.0, SCREEN_HEIGHT / 2.0 + 60.0);
        camera.follow(focus);
        assert_eq!(camera.target, Vec2::new(100.0, 100.0));
        assert!((camera.offset.x - 12.0).abs() < 1e-4);
        for _ in 0..200 {
            camera.follow(focus);
        }
        assert!((camera.offset - camera.target).length() < 0.01);
    }
}
