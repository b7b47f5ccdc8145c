use bevy::prelude::*;
use bevy::input::touch::Touches;
use bevy::window::{CursorLeft, PrimaryWindow};
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, reset_and_read_input);
    }
}

const JUMP_KEYS: [KeyCode; 3] = [KeyCode::ArrowUp, KeyCode::KeyW, KeyCode::Space];

/// The single point where hardware input becomes game intents. Only the
/// intent resource of the running game is filled; the others stay default.
fn reset_and_read_input(
    state: Res<State<GameState>>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cursor_left: EventReader<CursorLeft>,
    mut launcher: ResMut<LauncherInput>,
    mut platformer: ResMut<PlatformerInput>,
    mut village: ResMut<VillageInput>,
) {
    *launcher = LauncherInput::default();
    *platformer = PlatformerInput::default();
    *village = VillageInput::default();

    let cursor = windows.get_single().ok().and_then(logical_cursor);
    let left_canvas = cursor_left.read().count() > 0;

    match *state.get() {
        GameState::Launcher => {
            if keys.any_just_pressed([KeyCode::Digit1, KeyCode::Numpad1]) {
                launcher.choice = Some(GameState::Platformer);
            } else if keys.any_just_pressed([KeyCode::Digit2, KeyCode::Numpad2]) {
                launcher.choice = Some(GameState::Village);
            }
            launcher.quit = keys.just_pressed(KeyCode::Escape);
        }

        GameState::Platformer => {
            platformer.left = keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]);
            platformer.right = keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]);
            platformer.up = keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]);
            platformer.down = keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]);
            platformer.jump_pressed = keys.any_just_pressed(JUMP_KEYS);
            platformer.jump_released = keys.any_just_released(JUMP_KEYS);
            platformer.retry = keys.just_pressed(KeyCode::KeyR);
            platformer.exit = keys.just_pressed(KeyCode::Escape);

            // Release wins over press when both land in one frame.
            platformer.pointer = if left_canvas {
                Some(PointerSignal::Leave)
            } else if touches.iter_just_canceled().next().is_some() {
                Some(PointerSignal::Cancel)
            } else if mouse.just_released(MouseButton::Left) {
                Some(cursor.map_or(PointerSignal::Cancel, PointerSignal::Up))
            } else if mouse.just_pressed(MouseButton::Left) {
                cursor.map(PointerSignal::Down)
            } else {
                None
            };
        }

        GameState::Village => {
            let mut dir = Vec2::ZERO;
            if keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) {
                dir.y -= 1.0;
            }
            if keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
                dir.y += 1.0;
            }
            if keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
                dir.x -= 1.0;
            }
            if keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
                dir.x += 1.0;
            }
            village.move_dir = dir;

            village.interact = keys.just_pressed(KeyCode::KeyE);
            village.plant = keys.just_pressed(KeyCode::KeyQ);
            village.place = keys.just_pressed(KeyCode::KeyF);
            village.pickup = keys.just_pressed(KeyCode::KeyX);
            village.rotate = keys.just_pressed(KeyCode::KeyR);
            village.toggle_hemisphere = keys.just_pressed(KeyCode::KeyH);
            village.furniture_prev = keys.just_pressed(KeyCode::KeyZ);
            village.furniture_next = keys.just_pressed(KeyCode::KeyC);
            for (i, key) in [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3]
                .iter()
                .enumerate()
            {
                if keys.just_pressed(*key) {
                    village.select_crop = Some(i);
                    break;
                }
            }

            // Menu navigation. WASD + Arrows, same as movement.
            village.menu_prev = keys.any_just_pressed([
                KeyCode::ArrowUp,
                KeyCode::ArrowLeft,
                KeyCode::KeyW,
                KeyCode::KeyA,
            ]);
            village.menu_next = keys.any_just_pressed([
                KeyCode::ArrowDown,
                KeyCode::ArrowRight,
                KeyCode::KeyS,
                KeyCode::KeyD,
            ]);
            village.confirm = keys.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter]);
            // Escape means "back" inside a dialogue and "leave" outside one;
            // the village decides which applies.
            village.back = keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyB]);
            village.exit = keys.just_pressed(KeyCode::Escape);
            if mouse.just_pressed(MouseButton::Left) {
                village.click = cursor;
            }
        }
    }
}

/// Cursor position rescaled into the fixed logical screen, whatever the
/// window size.
fn logical_cursor(window: &Window) -> Option<Vec2> {
    let pos = window.cursor_position()?;
    let (w, h) = (window.width(), window.height());
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Vec2::new(pos.x * SCREEN_WIDTH / w, pos.y * SCREEN_HEIGHT / h))
}
