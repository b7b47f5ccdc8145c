//! Sprite synchronisation: keeps coloured rectangles in step with the run.
//!
//! Level pixels are y-down with the origin at the top-left of the viewport
//! once the follow-camera offset is removed; Bevy is y-up and centred.

use bevy::prelude::*;

use super::levels::Rect;
use super::session::PlatformerWorld;
use crate::shared::*;

/// Everything spawned by the platformer; despawned when leaving the game.
#[derive(Component)]
pub struct PlatformerEntity;

/// Sprites that belong to one live level instance.
#[derive(Component)]
pub struct LevelSprite {
    pub rect: Rect,
}

#[derive(Component)]
pub struct CarrotSprite {
    pub index: usize,
}

#[derive(Component)]
pub struct OwlSprite {
    pub index: usize,
}

#[derive(Component)]
pub struct BunnySprite;

#[derive(Component)]
pub struct ParticleSprite;

const PLATFORM_COLOR: Color = Color::srgb(0.875, 0.953, 0.902);
const LADDER_COLOR: Color = Color::srgb(0.78, 0.62, 0.45);
const CARROT_COLOR: Color = Color::srgb(1.0, 0.55, 0.26);
const OWL_COLOR: Color = Color::srgb(0.55, 0.45, 0.62);
const BUNNY_COLOR: Color = Color::srgb(1.0, 0.96, 0.98);
const BUNNY_CLIMB_COLOR: Color = Color::srgb(0.92, 0.88, 0.90);
const SPARK_WARM: Color = Color::srgb(1.0, 0.82, 0.54);
const SPARK_HOT: Color = Color::srgb(1.0, 0.70, 0.42);

/// Centre of a level-space rectangle in Bevy world space.
pub fn level_to_world(rect: &Rect, camera: Vec2, z: f32) -> Vec3 {
    Vec3::new(
        rect.x + rect.w / 2.0 - camera.x - SCREEN_WIDTH / 2.0,
        SCREEN_HEIGHT / 2.0 - (rect.y + rect.h / 2.0 - camera.y),
        z,
    )
}

fn rect_sprite(color: Color, rect: &Rect) -> Sprite {
    Sprite {
        color,
        custom_size: Some(Vec2::new(rect.w, rect.h)),
        ..default()
    }
}

pub fn spawn_bunny(mut commands: Commands) {
    commands.spawn((
        PlatformerEntity,
        BunnySprite,
        Sprite {
            color: BUNNY_COLOR,
            custom_size: Some(Vec2::new(40.0, 56.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 5.0),
    ));
}

/// Rebuild level geometry sprites whenever a level instance is loaded.
pub fn rebuild_level_sprites(
    mut commands: Commands,
    mut loaded: EventReader<LevelLoadedEvent>,
    world: Option<Res<PlatformerWorld>>,
    existing: Query<Entity, Or<(With<LevelSprite>, With<CarrotSprite>, With<OwlSprite>)>>,
) {
    let Some(world) = world else {
        return;
    };
    if loaded.read().last().is_none() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }

    let level = &world.level;
    for platform in &level.platforms {
        commands.spawn((
            PlatformerEntity,
            LevelSprite { rect: *platform },
            rect_sprite(PLATFORM_COLOR, platform),
            Transform::from_translation(level_to_world(platform, Vec2::ZERO, 1.0)),
        ));
    }
    for ladder in &level.ladders {
        commands.spawn((
            PlatformerEntity,
            LevelSprite { rect: *ladder },
            rect_sprite(LADDER_COLOR, ladder),
            Transform::from_translation(level_to_world(ladder, Vec2::ZERO, 2.0)),
        ));
    }
    for (index, carrot) in level.collectibles.iter().enumerate() {
        let rect = Rect::new(carrot.x - 8.0, carrot.y - 8.0, 16.0, 16.0);
        commands.spawn((
            PlatformerEntity,
            CarrotSprite { index },
            rect_sprite(CARROT_COLOR, &rect),
            Transform::from_translation(level_to_world(&rect, Vec2::ZERO, 3.0)),
        ));
    }
    for (index, owl) in level.enemies.iter().enumerate() {
        let rect = owl.hit_box();
        commands.spawn((
            PlatformerEntity,
            OwlSprite { index },
            rect_sprite(OWL_COLOR, &rect),
            Transform::from_translation(level_to_world(&rect, Vec2::ZERO, 4.0)),
        ));
    }
}

/// Move every sprite by the follow-camera offset and mirror live state.
#[allow(clippy::type_complexity)]
pub fn sync_platformer_sprites(
    world: Option<Res<PlatformerWorld>>,
    mut statics: Query<(&LevelSprite, &mut Transform), (Without<CarrotSprite>, Without<OwlSprite>, Without<BunnySprite>)>,
    mut carrots: Query<(&CarrotSprite, &mut Transform, &mut Visibility), (Without<OwlSprite>, Without<BunnySprite>)>,
    mut owls: Query<(&OwlSprite, &mut Transform), (Without<CarrotSprite>, Without<BunnySprite>)>,
    mut bunny: Query<(&mut Transform, &mut Sprite), With<BunnySprite>>,
) {
    let Some(world) = world else {
        return;
    };
    let camera = world.camera.offset.floor();

    for (sprite, mut transform) in &mut statics {
        transform.translation = level_to_world(&sprite.rect, camera, transform.translation.z);
    }

    for (carrot, mut transform, mut visibility) in &mut carrots {
        let Some(state) = world.level.collectibles.get(carrot.index) else {
            continue;
        };
        let rect = Rect::new(state.x - 8.0, state.y - 8.0, 16.0, 16.0);
        transform.translation = level_to_world(&rect, camera, 3.0);
        *visibility = if state.collected {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }

    for (owl, mut transform) in &mut owls {
        if let Some(state) = world.level.enemies.get(owl.index) {
            transform.translation = level_to_world(&state.hit_box(), camera, 4.0);
        }
    }

    if let Ok((mut transform, mut sprite)) = bunny.get_single_mut() {
        let player = &world.player;
        transform.translation = level_to_world(&player.bounds(), camera, 5.0);
        // Slight squash on alternate walk frames reads as a hop cycle.
        let squash = if player.frame % 2 == 1 { 0.92 } else { 1.0 };
        transform.scale = Vec3::new(player.facing, squash, 1.0);
        sprite.color = if player.climbing {
            BUNNY_CLIMB_COLOR
        } else {
            BUNNY_COLOR
        };
    }
}

/// Particles are short-lived, so they are respawned from state every frame.
pub fn sync_particle_sprites(
    mut commands: Commands,
    world: Option<Res<PlatformerWorld>>,
    existing: Query<Entity, With<ParticleSprite>>,
) {
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    let Some(world) = world else {
        return;
    };
    let camera = world.camera.offset.floor();
    for particle in &world.particles {
        let base = if particle.warm { SPARK_WARM } else { SPARK_HOT };
        let rect = Rect::new(
            particle.x - particle.size,
            particle.y - particle.size,
            particle.size * 2.0,
            particle.size * 2.0,
        );
        commands.spawn((
            PlatformerEntity,
            ParticleSprite,
            rect_sprite(base.with_alpha(particle.alpha()), &rect),
            Transform::from_translation(level_to_world(&rect, camera, 6.0)),
        ));
    }
}

pub fn despawn_platformer_entities(mut commands: Commands, query: Query<Entity, With<PlatformerEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
