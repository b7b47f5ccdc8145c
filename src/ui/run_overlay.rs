//! Death and victory screen with the on-screen retry button.
//!
//! The button's rectangle is shared with the pointer handling in the run,
//! so what is drawn is exactly what can be pressed.

use bevy::prelude::*;
use super::{rect_node, text_font};
use crate::platformer::retry::RETRY_BUTTON_RECT;
use crate::platformer::session::{PlatformerWorld, RunPhase};
use crate::shared::*;

const BUTTON_COLOR: Color = Color::srgb(1.0, 0.42, 0.42);
const BUTTON_PRESSED_COLOR: Color = Color::srgb(0.91, 0.36, 0.36);
/// The pressed button sinks by this many pixels.
const PRESS_OFFSET: f32 = 4.0;

#[derive(Component)]
pub struct RunOverlayRoot;

#[derive(Component)]
pub struct RunOverlayTitle;

#[derive(Component)]
pub struct RunOverlaySubtitle;

#[derive(Component)]
pub struct RetryButtonNode;

pub fn spawn_run_overlay(mut commands: Commands) {
    commands
        .spawn((
            RunOverlayRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(50),
            Visibility::Hidden,
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    ..rect_node(ScreenRect::new(0.0, SCREEN_HEIGHT / 2.0 - 100.0, SCREEN_WIDTH, 100.0))
                })
                .with_children(|titles| {
                    titles.spawn((RunOverlayTitle, Text::new(""), text_font(48.0), TextColor(Color::WHITE)));
                    titles.spawn((
                        RunOverlaySubtitle,
                        Text::new(""),
                        text_font(18.0),
                        TextColor(Color::srgb(0.9, 0.9, 0.9)),
                    ));
                });

            parent
                .spawn((
                    RetryButtonNode,
                    Node {
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        border: UiRect::all(Val::Px(3.0)),
                        ..rect_node(RETRY_BUTTON_RECT)
                    },
                    BackgroundColor(BUTTON_COLOR),
                    BorderColor(Color::srgb(0.79, 0.16, 0.16)),
                ))
                .with_children(|button| {
                    button.spawn((Text::new("RETRY"), text_font(24.0), TextColor(Color::WHITE)));
                });
        });
}

pub fn despawn_run_overlay(mut commands: Commands, query: Query<Entity, With<RunOverlayRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

#[allow(clippy::type_complexity)]
pub fn update_run_overlay(
    world: Option<Res<PlatformerWorld>>,
    mut root_q: Query<&mut Visibility, With<RunOverlayRoot>>,
    mut title_q: Query<&mut Text, (With<RunOverlayTitle>, Without<RunOverlaySubtitle>)>,
    mut subtitle_q: Query<&mut Text, With<RunOverlaySubtitle>>,
    mut button_q: Query<(&mut Node, &mut BackgroundColor), With<RetryButtonNode>>,
) {
    let Some(world) = world else { return };

    let (title, subtitle) = match world.phase {
        RunPhase::Playing => ("", String::new()),
        RunPhase::Dead if world.lives == 0 => ("You Died!", format!("Out of lives. Final score {}", world.score)),
        RunPhase::Dead => ("You Died!", format!("Lives left: {}  (R to retry)", world.lives)),
        RunPhase::Won => ("You Win!", format!("Every carrot collected! Score {}", world.score)),
    };

    for mut visibility in &mut root_q {
        *visibility = if world.phase == RunPhase::Playing {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
    for mut text in &mut title_q {
        **text = title.to_string();
    }
    for mut text in &mut subtitle_q {
        **text = subtitle.clone();
    }

    let pressed = world.retry_button.pressed;
    for (mut node, mut bg) in &mut button_q {
        let offset = if pressed { PRESS_OFFSET } else { 0.0 };
        node.top = Val::Px(RETRY_BUTTON_RECT.y + offset);
        node.height = Val::Px(RETRY_BUTTON_RECT.h - offset);
        *bg = BackgroundColor(if pressed { BUTTON_PRESSED_COLOR } else { BUTTON_COLOR });
    }
}
