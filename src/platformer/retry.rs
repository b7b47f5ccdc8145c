//! On-screen retry button shown over the death and victory screens.
//!
//! Activation is press-then-release inside the button. Leaving the canvas or
//! a cancelled pointer drops the pressed state without activating.

use crate::shared::{PointerSignal, ScreenRect, SCREEN_HEIGHT, SCREEN_WIDTH};

pub const RETRY_BUTTON_RECT: ScreenRect =
    ScreenRect::new(SCREEN_WIDTH / 2.0 - 80.0, SCREEN_HEIGHT / 2.0 + 20.0, 160.0, 50.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryButton {
    pub pressed: bool,
}

impl RetryButton {
    /// Feed one pointer signal. Returns `true` when the button fires.
    /// `visible` is false while the button is not on screen.
    pub fn handle(&mut self, signal: PointerSignal, visible: bool) -> bool {
        if !visible {
            self.pressed = false;
            return false;
        }
        match signal {
            PointerSignal::Down(pos) => {
                if RETRY_BUTTON_RECT.contains(pos) {
                    self.pressed = true;
                }
                false
            }
            PointerSignal::Up(pos) => {
                let fired = self.pressed && RETRY_BUTTON_RECT.contains(pos);
                self.pressed = false;
                fired
            }
            PointerSignal::Cancel | PointerSignal::Leave => {
                self.pressed = false;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;

    fn inside() -> Vec2 {
        Vec2::new(RETRY_BUTTON_RECT.x + 10.0, RETRY_BUTTON_RECT.y + 10.0)
    }

    #[test]
    fn test_press_and_release_inside_fires() {
        let mut button = RetryButton::default();
        assert!(!button.handle(PointerSignal::Down(inside()), true));
        assert!(button.pressed);
        assert!(button.handle(PointerSignal::Up(inside()), true));
        assert!(!button.pressed);
    }

    #[test]
    fn test_release_outside_does_not_fire() {
        let mut button = RetryButton::default();
        button.handle(PointerSignal::Down(inside()), true);
        assert!(!button.handle(PointerSignal::Up(Vec2::ZERO), true));
        assert!(!button.pressed);
    }

    #[test]
    fn test_release_without_press_does_not_fire() {
        let mut button = RetryButton::default();
        assert!(!button.handle(PointerSignal::Up(inside()), true));
    }

    #[test]
    fn test_leave_and_cancel_clear_press() {
        let mut button = RetryButton::default();
        button.handle(PointerSignal::Down(inside()), true);
        button.handle(PointerSignal::Leave, true);
        assert!(!button.handle(PointerSignal::Up(inside()), true));

        button.handle(PointerSignal::Down(inside()), true);
        button.handle(PointerSignal::Cancel, true);
        assert!(!button.pressed);
    }

    #[test]
    fn test_hidden_button_ignores_input() {
        let mut button = RetryButton::default();
        assert!(!button.handle(PointerSignal::Down(inside()), false));
        assert!(!button.pressed);
    }
}
