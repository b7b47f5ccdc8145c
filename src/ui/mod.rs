mod dialogue_box;
mod hud;
mod main_menu;
mod run_overlay;
mod transitions;

use bevy::prelude::*;
use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── FADE OVERLAY: always present ───
        app.add_systems(Startup, transitions::spawn_fade_overlay);
        app.add_systems(Update, (fit_ui_scale, transitions::update_fade));

        // ─── LAUNCHER ───
        app.add_systems(OnEnter(GameState::Launcher), main_menu::spawn_main_menu);
        app.add_systems(OnExit(GameState::Launcher), main_menu::despawn_main_menu);
        app.add_systems(
            Update,
            main_menu::main_menu_navigation.run_if(in_state(GameState::Launcher)),
        );

        // ─── PLATFORMER: HUD plus the death/win overlay ───
        app.add_systems(
            OnEnter(GameState::Platformer),
            (hud::spawn_platformer_hud, run_overlay::spawn_run_overlay),
        );
        app.add_systems(
            OnExit(GameState::Platformer),
            (hud::despawn_hud, run_overlay::despawn_run_overlay),
        );
        app.add_systems(
            Update,
            (hud::update_platformer_hud, run_overlay::update_run_overlay)
                .after(crate::platformer::run_platformer_frames)
                .run_if(in_state(GameState::Platformer)),
        );

        // ─── VILLAGE: HUD, dialogue box and hint line ───
        app.add_systems(
            OnEnter(GameState::Village),
            (hud::spawn_village_hud, dialogue_box::spawn_dialogue_box),
        );
        app.add_systems(
            OnExit(GameState::Village),
            (hud::despawn_hud, dialogue_box::despawn_dialogue_box),
        );
        app.add_systems(
            Update,
            (
                hud::update_village_hud,
                dialogue_box::update_dialogue_box,
                dialogue_box::update_hint,
            )
                .after(crate::village::tick_village)
                .run_if(in_state(GameState::Village)),
        );
    }
}

/// UI is laid out in logical screen pixels; scale it with the window.
fn fit_ui_scale(windows: Query<&Window, With<bevy::window::PrimaryWindow>>, mut scale: ResMut<UiScale>) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let fit = (window.width() / SCREEN_WIDTH).min(window.height() / SCREEN_HEIGHT);
    if fit > 0.0 && (scale.0 - fit).abs() > f32::EPSILON {
        scale.0 = fit;
    }
}

/// Absolute node covering `rect` in logical screen pixels.
fn rect_node(rect: ScreenRect) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(rect.x),
        top: Val::Px(rect.y),
        width: Val::Px(rect.w),
        height: Val::Px(rect.h),
        ..default()
    }
}

fn text_font(size: f32) -> TextFont {
    TextFont {
        font_size: size,
        ..default()
    }
}
