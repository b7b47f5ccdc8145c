use bevy::prelude::*;
use super::text_font;
use crate::platformer::session::PlatformerWorld;
use crate::village::clock::{current_month, Season};
use crate::village::inventory::{CatalogItem, Stock};
use crate::village::scene::Scene;
use crate::village::world::{VillageWorld, MAX_ENERGY};

const SCORE_FONT: f32 = 20.0;
const SCORE_POP_FONT: f32 = 26.0;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS: used to query and update HUD elements
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudLevelText;

#[derive(Component)]
pub struct HudScoreText;

#[derive(Component)]
pub struct HudLivesText;

#[derive(Component)]
pub struct HudCarrotsText;

#[derive(Component)]
pub struct HudTimeText;

#[derive(Component)]
pub struct HudSeasonText;

#[derive(Component)]
pub struct HudCoinsText;

#[derive(Component)]
pub struct HudEnergyFill;

#[derive(Component)]
pub struct HudBagText;

#[derive(Component)]
pub struct HudFurnitureText;

/// Marker for the quest objective text below the top bar.
#[derive(Component)]
pub struct HudObjective;

fn top_bar() -> (Node, BackgroundColor, PickingBehavior) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(44.0),
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
        PickingBehavior::IGNORE,
    )
}

fn hud_root() -> (HudRoot, Node, PickingBehavior) {
    (
        HudRoot,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            ..default()
        },
        PickingBehavior::IGNORE,
    )
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_platformer_hud(mut commands: Commands) {
    commands.spawn(hud_root()).with_children(|parent| {
        parent.spawn(top_bar()).with_children(|bar| {
            bar.spawn((HudLevelText, Text::new(""), text_font(20.0), TextColor(Color::WHITE)));
            bar.spawn((
                HudCarrotsText,
                Text::new(""),
                text_font(16.0),
                TextColor(Color::srgb(1.0, 0.75, 0.45)),
            ));
            bar.spawn((
                HudScoreText,
                Text::new(""),
                text_font(SCORE_FONT),
                TextColor(Color::srgb(1.0, 0.95, 0.6)),
            ));
            bar.spawn((
                HudLivesText,
                Text::new(""),
                text_font(20.0),
                TextColor(Color::srgb(1.0, 0.6, 0.65)),
            ));
        });
    });
}

pub fn spawn_village_hud(mut commands: Commands) {
    commands.spawn(hud_root()).with_children(|parent| {
        // ─── TOP BAR ───
        parent.spawn(top_bar()).with_children(|bar| {
            bar.spawn((HudTimeText, Text::new(""), text_font(16.0), TextColor(Color::WHITE)));
            bar.spawn((
                HudSeasonText,
                Text::new(""),
                text_font(16.0),
                TextColor(Color::srgb(0.75, 0.95, 0.75)),
            ));
            bar.spawn((
                HudCoinsText,
                Text::new(""),
                text_font(16.0),
                TextColor(Color::srgb(1.0, 0.85, 0.3)),
            ));
            // Energy bar
            bar.spawn((
                Node {
                    width: Val::Px(120.0),
                    height: Val::Px(12.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.25, 0.25, 0.3)),
                PickingBehavior::IGNORE,
            ))
            .with_children(|track| {
                track.spawn((
                    HudEnergyFill,
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.45, 0.85, 0.5)),
                ));
            });
        });

        parent.spawn((
            HudObjective,
            Text::new(""),
            text_font(15.0),
            TextColor(Color::srgb(1.0, 0.9, 0.95)),
            Node {
                margin: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                ..default()
            },
        ));

        // ─── BOTTOM-LEFT STATUS ───
        parent
            .spawn(Node {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                top: Val::Px(330.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            })
            .with_children(|status| {
                status.spawn((HudBagText, Text::new(""), text_font(13.0), TextColor(Color::WHITE)));
                status.spawn((
                    HudFurnitureText,
                    Text::new(""),
                    text_font(13.0),
                    TextColor(Color::srgb(0.85, 0.8, 1.0)),
                ));
            });
    });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

#[allow(clippy::type_complexity)]
pub fn update_platformer_hud(
    world: Option<Res<PlatformerWorld>>,
    mut level_q: Query<&mut Text, (With<HudLevelText>, Without<HudScoreText>, Without<HudLivesText>, Without<HudCarrotsText>)>,
    mut score_q: Query<(&mut Text, &mut TextFont), (With<HudScoreText>, Without<HudLivesText>, Without<HudCarrotsText>)>,
    mut lives_q: Query<&mut Text, (With<HudLivesText>, Without<HudCarrotsText>)>,
    mut carrots_q: Query<&mut Text, With<HudCarrotsText>>,
) {
    let Some(world) = world else { return };

    for mut text in &mut level_q {
        **text = format!("Level {}/{}", world.current_level, world.level_count());
    }
    for (mut text, mut font) in &mut score_q {
        **text = format!("Score: {}", world.score);
        // Enlarged briefly after each pickup.
        font.font_size = if world.score_pop > 0 { SCORE_POP_FONT } else { SCORE_FONT };
    }
    for mut text in &mut lives_q {
        **text = format!("Lives: {}", world.lives);
    }
    for mut text in &mut carrots_q {
        **text = format!("Carrots left: {}", world.level.remaining());
    }
}

fn stock_line<K: CatalogItem>(label: &str, stock: &Stock<K>) -> String {
    let items: Vec<String> = stock
        .iter()
        .map(|(item, count)| format!("{} {}", item.name(), count))
        .collect();
    format!("{}: {}", label, items.join(", "))
}

#[allow(clippy::type_complexity)]
pub fn update_village_hud(
    world: Option<Res<VillageWorld>>,
    mut time_q: Query<&mut Text, (With<HudTimeText>, Without<HudSeasonText>, Without<HudCoinsText>, Without<HudObjective>, Without<HudBagText>, Without<HudFurnitureText>)>,
    mut season_q: Query<&mut Text, (With<HudSeasonText>, Without<HudCoinsText>, Without<HudObjective>, Without<HudBagText>, Without<HudFurnitureText>)>,
    mut coins_q: Query<&mut Text, (With<HudCoinsText>, Without<HudObjective>, Without<HudBagText>, Without<HudFurnitureText>)>,
    mut objective_q: Query<&mut Text, (With<HudObjective>, Without<HudBagText>, Without<HudFurnitureText>)>,
    mut bag_q: Query<&mut Text, (With<HudBagText>, Without<HudFurnitureText>)>,
    mut furniture_q: Query<&mut Text, With<HudFurnitureText>>,
    mut energy_q: Query<&mut Node, With<HudEnergyFill>>,
) {
    let Some(world) = world else { return };
    if !world.is_changed() {
        return;
    }

    for mut text in &mut time_q {
        **text = world.clock.label();
    }
    for mut text in &mut season_q {
        let season = Season::for_month(current_month(), world.hemisphere);
        **text = format!("{} Season ({})", season.label(), world.hemisphere.label());
    }
    for mut text in &mut coins_q {
        **text = format!("Coins: {}", world.coins);
    }
    for mut text in &mut objective_q {
        **text = world.objective();
    }
    for mut text in &mut bag_q {
        **text = format!(
            "{}  |  {}  |  Planting: {}",
            stock_line("Seeds", &world.seeds),
            stock_line("Crops", &world.crops),
            world.selected_crop.name(),
        );
    }
    for mut text in &mut furniture_q {
        **text = if world.scene == Scene::Home && world.in_own_home {
            format!(
                "{}  |  Selected: {}  |  Rotation: {}",
                stock_line("Furniture", &world.furniture_stock),
                world.selected_furniture.name(),
                world.rotation,
            )
        } else {
            stock_line("Furniture", &world.furniture_stock)
        };
    }
    for mut node in &mut energy_q {
        let pct = world.energy.min(MAX_ENERGY) as f32 / MAX_ENERGY as f32 * 100.0;
        node.width = Val::Percent(pct);
    }
}
