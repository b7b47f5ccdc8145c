use bevy::prelude::*;
use crate::shared::*;
use super::text_font;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct MainMenuRoot;

/// (key label, title, blurb) per game, in key order.
const LAUNCHER_OPTIONS: &[(&str, &str, &str)] = &[
    ("1", "Bunny Hop", "Collect every carrot, dodge the owls."),
    ("2", "Kawaii Village", "Farm, decorate and meet the neighbours."),
];

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(30.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.99, 0.93, 0.95)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("MEADOWHOP"),
                text_font(52.0),
                TextColor(Color::srgb(0.85, 0.42, 0.55)),
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(12.0),
                    ..default()
                })
                .with_children(|menu| {
                    for (key, title, blurb) in LAUNCHER_OPTIONS {
                        menu.spawn((
                            Node {
                                width: Val::Px(420.0),
                                flex_direction: FlexDirection::Column,
                                align_items: AlignItems::Center,
                                padding: UiRect::all(Val::Px(10.0)),
                                ..default()
                            },
                            BackgroundColor(Color::srgb(1.0, 0.8, 0.86)),
                        ))
                        .with_children(|item| {
                            item.spawn((
                                Text::new(format!("[{}]  {}", key, title)),
                                text_font(24.0),
                                TextColor(Color::srgb(0.35, 0.2, 0.3)),
                            ));
                            item.spawn((
                                Text::new(*blurb),
                                text_font(14.0),
                                TextColor(Color::srgb(0.5, 0.35, 0.45)),
                            ));
                        });
                    }
                });

            parent.spawn((
                Text::new("Esc inside a game returns here"),
                text_font(12.0),
                TextColor(Color::srgb(0.6, 0.5, 0.55)),
            ));
        });
}

pub fn despawn_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE / INTERACTION
// ═══════════════════════════════════════════════════════════════════════

pub fn main_menu_navigation(
    input: Res<LauncherInput>,
    mut next_state: ResMut<NextState<GameState>>,
    mut app_exit: EventWriter<AppExit>,
) {
    if let Some(choice) = input.choice {
        info!("[Launcher] Starting {:?}", choice);
        next_state.set(choice);
        return;
    }
    // A browser tab cannot close itself.
    if input.quit && !cfg!(target_arch = "wasm32") {
        info!("[Launcher] Quit");
        app_exit.send(AppExit::Success);
    }
}
