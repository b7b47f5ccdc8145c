//! Visual synchronisation: tiles, props, plots, furniture and actors as
//! coloured sprites.

use bevy::prelude::*;

use super::actors::Role;
use super::furniture::{FurnitureKind, PlacedFurniture};
use super::grid::{Cell, Prop, Tile, BUILDINGS};
use super::scene::Scene;
use super::world::VillageWorld;
use crate::shared::*;

/// Everything spawned by the village; despawned on leaving the game.
#[derive(Component)]
pub struct VillageEntity;

/// Static per-scene sprites, rebuilt on every scene swap.
#[derive(Component)]
pub struct SceneSprite;

#[derive(Component)]
pub struct PlotSprite {
    pub cell: Cell,
}

#[derive(Component)]
pub struct FurnitureSprite;

#[derive(Component)]
pub struct PlayerSprite;

#[derive(Component)]
pub struct NpcSprite {
    pub index: usize,
}

#[derive(Component)]
pub struct QuestBubble;

const Z_TILE: f32 = 0.0;
const Z_PROP: f32 = 1.0;
const Z_PLOT: f32 = 1.5;
const Z_FURNITURE: f32 = 2.0;
const Z_ACTOR: f32 = 3.0;
const Z_BUBBLE: f32 = 4.0;

const PLAYER_COLOR: Color = Color::srgb(1.0, 0.894, 0.945);
const SOIL_DRY: Color = Color::srgb(0.812, 0.639, 0.494);
const SOIL_WET: Color = Color::srgb(0.647, 0.467, 0.337);
const CROP_GROWING: Color = Color::srgb(0.482, 0.839, 0.482);
const CROP_READY: Color = Color::srgb(1.0, 0.612, 0.784);
const ROOF_COLORS: [Color; 4] = [
    Color::srgb(1.0, 0.702, 0.788),
    Color::srgb(1.0, 0.780, 0.647),
    Color::srgb(0.604, 0.847, 1.0),
    Color::srgb(0.725, 0.714, 1.0),
];

/// Centre of a tile-unit position in Bevy world space. Row 0 sits at the
/// top edge of the viewport.
pub fn tile_to_world(pos: Vec2, z: f32) -> Vec3 {
    Vec3::new(
        pos.x * TILE_SIZE + TILE_SIZE / 2.0 - SCREEN_WIDTH / 2.0,
        SCREEN_HEIGHT / 2.0 - (pos.y * TILE_SIZE + TILE_SIZE / 2.0),
        z,
    )
}

fn cell_to_world(cell: Cell, z: f32) -> Vec3 {
    tile_to_world(Vec2::new(cell.col as f32, cell.row as f32), z)
}

pub fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Grass => Color::srgb(0.788, 0.965, 0.718),
        Tile::GrassDark => Color::srgb(0.714, 0.918, 0.651),
        Tile::Path => Color::srgb(0.949, 0.843, 0.651),
        Tile::PathBrick => Color::srgb(0.933, 0.776, 0.659),
        Tile::Water => Color::srgb(0.561, 0.827, 1.0),
        Tile::Dock => Color::srgb(0.722, 0.847, 1.0),
        Tile::Soil => SOIL_DRY,
        Tile::Wall => Color::srgb(0.949, 0.765, 0.847),
        Tile::Floor => Color::srgb(0.969, 0.910, 0.835),
        Tile::Rug => Color::srgb(1.0, 0.702, 0.788),
        Tile::Door => Color::srgb(0.722, 0.431, 0.298),
    }
}

fn prop_look(prop: Prop) -> (Color, f32) {
    match prop {
        Prop::Tree => (Color::srgb(0.549, 0.847, 0.647), 1.0),
        Prop::Fence => (Color::srgb(0.949, 0.776, 0.851), 0.8),
        Prop::Bush => (Color::srgb(0.553, 0.859, 0.690), 0.85),
        Prop::Rock => (Color::srgb(0.718, 0.757, 0.839), 0.7),
        Prop::Lantern => (Color::srgb(1.0, 0.702, 0.494), 0.5),
        Prop::Sign => (Color::srgb(0.851, 0.627, 0.420), 0.6),
        Prop::Well => (Color::srgb(0.776, 0.788, 0.847), 0.9),
        Prop::Stall => (Color::srgb(0.788, 0.482, 0.310), 1.0),
        Prop::Flower => (Color::srgb(1.0, 0.612, 0.784), 0.35),
        Prop::Bench => (Color::srgb(0.761, 0.529, 0.337), 0.6),
        Prop::Mailbox => (Color::srgb(0.651, 0.420, 0.271), 0.4),
    }
}

fn furniture_color(kind: FurnitureKind) -> Color {
    match kind {
        FurnitureKind::Stool => Color::srgb(0.851, 0.702, 0.549),
        FurnitureKind::Table => Color::srgb(0.949, 0.780, 0.616),
        FurnitureKind::Bed => Color::srgb(1.0, 0.843, 0.918),
    }
}

fn npc_color(role: Role) -> Color {
    match role {
        Role::Farmer => Color::srgb(1.0, 0.941, 0.651),
        Role::Cook => Color::srgb(0.784, 0.941, 1.0),
        Role::Furniture => Color::srgb(0.847, 0.780, 1.0),
        Role::Pet => Color::srgb(1.0, 0.843, 0.651),
    }
}

fn square(color: Color, size: f32) -> Sprite {
    Sprite {
        color,
        custom_size: Some(Vec2::splat(size)),
        ..default()
    }
}

pub fn spawn_actors(mut commands: Commands, world: Option<Res<VillageWorld>>) {
    let Some(world) = world else {
        return;
    };
    commands.spawn((
        VillageEntity,
        PlayerSprite,
        square(PLAYER_COLOR, TILE_SIZE * 0.8),
        Transform::from_translation(tile_to_world(world.player.pos, Z_ACTOR)),
    ));
    for (index, npc) in world.npcs.iter().enumerate() {
        commands.spawn((
            VillageEntity,
            NpcSprite { index },
            square(npc_color(npc.role), TILE_SIZE * 0.8),
            Transform::from_translation(tile_to_world(npc.pos, Z_ACTOR)),
        ));
    }
    commands.spawn((
        VillageEntity,
        QuestBubble,
        Text2d::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.45, 0.3, 0.2)),
        Transform::from_xyz(0.0, 0.0, Z_BUBBLE),
        Visibility::Hidden,
    ));
}

/// Rebuild terrain, props and plots for the active scene.
pub fn rebuild_scene_sprites(
    mut commands: Commands,
    mut changed: EventReader<SceneChangedEvent>,
    world: Option<Res<VillageWorld>>,
    existing: Query<Entity, Or<(With<SceneSprite>, With<PlotSprite>)>>,
) {
    let Some(world) = world else {
        return;
    };
    if changed.read().last().is_none() {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }

    for (cell, tile) in world.tiles().cells() {
        commands.spawn((
            VillageEntity,
            SceneSprite,
            square(tile_color(tile), TILE_SIZE),
            Transform::from_translation(cell_to_world(cell, Z_TILE)),
        ));
    }

    if world.scene != Scene::Village {
        return;
    }

    for (building, roof) in BUILDINGS.iter().zip(ROOF_COLORS) {
        let size = Vec2::new(building.w as f32, building.h as f32) * TILE_SIZE;
        let top_left = Vec2::new(building.col as f32, (building.row + 1) as f32);
        let centre = top_left + Vec2::new(building.w as f32 - 1.0, building.h as f32 - 1.0) / 2.0;
        commands.spawn((
            VillageEntity,
            SceneSprite,
            Sprite {
                color: roof,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(tile_to_world(centre, Z_PROP)),
        ));
    }
    for door in &world.village.doors {
        commands.spawn((
            VillageEntity,
            SceneSprite,
            square(tile_color(Tile::Door), TILE_SIZE * 0.7),
            Transform::from_translation(cell_to_world(door.cell, Z_PROP + 0.2)),
        ));
    }
    for &(cell, prop) in &world.village.props {
        let (color, scale) = prop_look(prop);
        commands.spawn((
            VillageEntity,
            SceneSprite,
            square(color, TILE_SIZE * scale),
            Transform::from_translation(cell_to_world(cell, Z_PROP)),
        ));
    }
    for &cell in &world.village.bridge {
        commands.spawn((
            VillageEntity,
            SceneSprite,
            square(tile_color(Tile::Dock), TILE_SIZE),
            Transform::from_translation(cell_to_world(cell, Z_PROP)),
        ));
    }
    for plot in &world.field.plots {
        commands.spawn((
            VillageEntity,
            PlotSprite { cell: plot.cell },
            square(SOIL_DRY, TILE_SIZE * 0.9),
            Transform::from_translation(cell_to_world(plot.cell, Z_PLOT)),
        ));
    }
}

/// Plot colour follows watering and growth.
pub fn sync_plot_sprites(world: Option<Res<VillageWorld>>, mut plots: Query<(&PlotSprite, &mut Sprite)>) {
    let Some(world) = world else {
        return;
    };
    for (sprite_plot, mut sprite) in &mut plots {
        let Some(plot) = world.field.plot(sprite_plot.cell) else {
            continue;
        };
        sprite.color = if plot.is_grown() {
            CROP_READY
        } else if plot.planted {
            let base = if plot.watered { SOIL_WET } else { SOIL_DRY };
            base.mix(&CROP_GROWING, 0.3 + 0.7 * plot.growth())
        } else if plot.watered {
            SOIL_WET
        } else {
            SOIL_DRY
        };
    }
}

/// Furniture sprites are respawned only when the placed set changes.
pub fn sync_furniture_sprites(
    mut commands: Commands,
    world: Option<Res<VillageWorld>>,
    mut shown: Local<Option<(Scene, bool, Vec<PlacedFurniture>)>>,
    existing: Query<Entity, With<FurnitureSprite>>,
) {
    let Some(world) = world else {
        return;
    };
    let visible = world.scene == Scene::Home && world.in_own_home;
    let current = (world.scene, world.in_own_home, world.furniture.items.clone());
    // Sprites may have been despawned on leaving the game.
    let expected = visible && !current.2.is_empty();
    if shown.as_ref() == Some(&current) && existing.is_empty() != expected {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }
    if visible {
        for item in &world.furniture.items {
            let (w, h) = item.kind.size(item.rotation);
            let centre = Vec2::new(item.col as f32, item.row as f32)
                + Vec2::new(w as f32 - 1.0, h as f32 - 1.0) / 2.0;
            commands.spawn((
                VillageEntity,
                FurnitureSprite,
                Sprite {
                    color: furniture_color(item.kind),
                    custom_size: Some(Vec2::new(w as f32, h as f32) * TILE_SIZE * 0.92),
                    ..default()
                },
                Transform::from_translation(tile_to_world(centre, Z_FURNITURE)),
            ));
        }
    }
    *shown = Some(current);
}

#[allow(clippy::type_complexity)]
pub fn sync_actor_sprites(
    world: Option<Res<VillageWorld>>,
    mut player: Query<&mut Transform, (With<PlayerSprite>, Without<NpcSprite>, Without<QuestBubble>)>,
    mut npcs: Query<(&NpcSprite, &mut Transform, &mut Visibility), (Without<PlayerSprite>, Without<QuestBubble>)>,
    mut bubble: Query<(&mut Text2d, &mut Transform, &mut Visibility), (With<QuestBubble>, Without<PlayerSprite>, Without<NpcSprite>)>,
) {
    let Some(world) = world else {
        return;
    };
    if let Ok(mut transform) = player.get_single_mut() {
        transform.translation = tile_to_world(world.player.pos, Z_ACTOR);
    }

    let outdoors = world.scene == Scene::Village;
    for (sprite, mut transform, mut visibility) in &mut npcs {
        let Some(npc) = world.npcs.get(sprite.index) else {
            continue;
        };
        transform.translation = tile_to_world(npc.pos, Z_ACTOR);
        *visibility = if outdoors {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    if let Ok((mut text, mut transform, mut visibility)) = bubble.get_single_mut() {
        match world.nearby_npc() {
            Some(npc) if !world.dialogue.is_open() => {
                text.0 = world.quests.bubble(npc.id, &world.crops).to_string();
                transform.translation = tile_to_world(npc.pos - Vec2::new(0.0, 0.9), Z_BUBBLE);
                *visibility = Visibility::Inherited;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

pub fn despawn_village_entities(mut commands: Commands, query: Query<Entity, With<VillageEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_tile_maps_to_viewport_corner() {
        let pos = tile_to_world(Vec2::ZERO, 0.0);
        assert_eq!(pos.x, -SCREEN_WIDTH / 2.0 + TILE_SIZE / 2.0);
        assert_eq!(pos.y, SCREEN_HEIGHT / 2.0 - TILE_SIZE / 2.0);
    }

    #[test]
    fn test_rows_grow_downwards() {
        let a = tile_to_world(Vec2::new(3.0, 2.0), 0.0);
        let b = tile_to_world(Vec2::new(3.0, 3.0), 0.0);
        assert_eq!(a.x, b.x);
        assert_eq!(a.y - b.y, TILE_SIZE);
    }
}
