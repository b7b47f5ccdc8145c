use bevy::prelude::*;
use super::{rect_node, text_font};
use crate::shared::*;
use crate::village::dialogue::{Dialogue, DIALOGUE_BOX};
use crate::village::world::VillageWorld;

const HINT_RECT: ScreenRect = ScreenRect::new(40.0, 344.0, 880.0, 28.0);
const OPTION_COLOR: Color = Color::srgb(1.0, 0.9, 0.94);
const OPTION_SELECTED_COLOR: Color = Color::srgb(1.0, 0.68, 0.8);

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct DialogueBoxRoot;

#[derive(Component)]
pub struct HintRoot;

#[derive(Component)]
pub struct HintText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_dialogue_box(mut commands: Commands) {
    commands.spawn((
        DialogueBoxRoot,
        rect_node(DIALOGUE_BOX),
        BackgroundColor(Color::srgba(0.25, 0.15, 0.22, 0.92)),
        BorderRadius::all(Val::Px(10.0)),
        GlobalZIndex(20),
        Visibility::Hidden,
    ));

    commands
        .spawn((
            HintRoot,
            Node {
                padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                ..rect_node(HINT_RECT)
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            GlobalZIndex(20),
            Visibility::Hidden,
            PickingBehavior::IGNORE,
        ))
        .with_children(|hint| {
            hint.spawn((HintText, Text::new(""), text_font(15.0), TextColor(Color::WHITE)));
        });
}

pub fn despawn_dialogue_box(
    mut commands: Commands,
    query: Query<Entity, Or<(With<DialogueBoxRoot>, With<HintRoot>)>>,
) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

/// Rebuilds the box contents whenever the dialogue (or its highlighted
/// option) changes.
pub fn update_dialogue_box(
    mut commands: Commands,
    world: Option<Res<VillageWorld>>,
    mut shown: Local<Option<Dialogue>>,
    mut root_q: Query<(Entity, &mut Visibility), With<DialogueBoxRoot>>,
) {
    let Some(world) = world else { return };
    let Ok((root, mut visibility)) = root_q.get_single_mut() else {
        return;
    };
    let current = world.dialogue.current();
    if shown.as_ref() == Some(current) {
        return;
    }
    *shown = Some(current.clone());

    commands.entity(root).despawn_descendants();
    let Some(npc) = current.npc() else {
        *visibility = Visibility::Hidden;
        return;
    };
    *visibility = Visibility::Inherited;

    let rects = current.option_rects();
    let menu = current.menu();
    commands.entity(root).with_children(|panel| {
        panel.spawn((
            Text::new(format!("{}: {}", npc.name(), current.text())),
            text_font(18.0),
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(24.0),
                top: Val::Px(14.0),
                max_width: Val::Px(DIALOGUE_BOX.w - 48.0),
                ..default()
            },
        ));

        if let Some(menu) = menu {
            for (i, (option, rect)) in menu.options.iter().zip(rects).enumerate() {
                let local = ScreenRect::new(rect.x - DIALOGUE_BOX.x, rect.y - DIALOGUE_BOX.y, rect.w, rect.h);
                let color = if i == menu.index { OPTION_SELECTED_COLOR } else { OPTION_COLOR };
                panel
                    .spawn((
                        Node {
                            align_items: AlignItems::Center,
                            padding: UiRect::left(Val::Px(8.0)),
                            ..rect_node(local)
                        },
                        BackgroundColor(color),
                        BorderRadius::all(Val::Px(6.0)),
                    ))
                    .with_children(|item| {
                        item.spawn((
                            Text::new(option.label.clone()),
                            text_font(15.0),
                            TextColor(Color::srgb(0.3, 0.15, 0.25)),
                        ));
                    });
            }
        } else {
            panel.spawn((
                Text::new("Enter to close"),
                text_font(12.0),
                TextColor(Color::srgb(0.8, 0.7, 0.75)),
                Node {
                    position_type: PositionType::Absolute,
                    right: Val::Px(16.0),
                    bottom: Val::Px(10.0),
                    ..default()
                },
            ));
        }
    });
}

pub fn update_hint(
    world: Option<Res<VillageWorld>>,
    mut root_q: Query<&mut Visibility, With<HintRoot>>,
    mut text_q: Query<&mut Text, With<HintText>>,
) {
    let Some(world) = world else { return };
    let visible = world.hint.is_visible();
    for mut visibility in &mut root_q {
        *visibility = if visible { Visibility::Inherited } else { Visibility::Hidden };
    }
    if visible {
        for mut text in &mut text_q {
            if text.0 != world.hint.text {
                text.0 = world.hint.text.clone();
            }
        }
    }
}
