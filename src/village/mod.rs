//! Village domain: a top-down tile life-sim around a small island village.
//!
//! Responsible for:
//! - The village and home tile grids and their solid grids
//! - Player movement, door transitions and the scene fade
//! - Farming, the economy and furniture placement
//! - Villager dialogue menus and the picnic quest
//! - The day/time cycle
//!
//! All of it lives in [`world::VillageWorld`]; the systems below feed it
//! input and frame time and mirror its state into sprites.

pub mod actors;
pub mod clock;
pub mod dialogue;
pub mod farming;
pub mod furniture;
pub mod grid;
pub mod inventory;
pub mod quests;
pub mod render;
pub mod scene;
pub mod world;

use bevy::prelude::*;

use crate::shared::*;
use world::{VillageEvent, VillageWorld};

pub struct VillagePlugin;

impl Plugin for VillagePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Village),
            (start_village, render::spawn_actors).chain(),
        )
        .add_systems(
            OnExit(GameState::Village),
            (end_village, render::despawn_village_entities),
        )
        .add_systems(
            Update,
            (
                tick_village,
                render::rebuild_scene_sprites,
                render::sync_plot_sprites,
                render::sync_furniture_sprites,
                render::sync_actor_sprites,
            )
                .chain()
                .run_if(in_state(GameState::Village)),
        );
    }
}

/// Fresh village state; the save layer overlays any snapshot right after.
pub fn start_village(mut commands: Commands, mut changed: EventWriter<SceneChangedEvent>) {
    commands.insert_resource(VillageWorld::new());
    changed.send(SceneChangedEvent);
    info!("[Village] Welcome to the island!");
}

pub fn end_village(mut commands: Commands, mut fade: ResMut<ScreenFade>) {
    commands.remove_resource::<VillageWorld>();
    fade.alpha = 0.0;
    info!("[Village] Closed");
}

pub fn tick_village(
    time: Res<Time>,
    input: Res<VillageInput>,
    world: Option<ResMut<VillageWorld>>,
    mut changed: EventWriter<SceneChangedEvent>,
    mut day_start: EventWriter<DayStartEvent>,
    mut fade: ResMut<ScreenFade>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut world) = world else {
        return;
    };
    for event in world.tick(time.delta_secs(), &input) {
        match event {
            VillageEvent::SceneChanged(scene) => {
                info!("[Scene] Entered {:?}", scene);
                changed.send(SceneChangedEvent);
            }
            VillageEvent::NewDay(day) => {
                info!("[Clock] Day {} begins, energy restored", day);
                day_start.send(DayStartEvent { day });
            }
            VillageEvent::QuestCompleted => info!("[Village] Picnic quest completed"),
            VillageEvent::PetAdopted => info!("[Village] Pet adopted"),
            VillageEvent::ExitRequested => {
                info!("[Village] Back to launcher");
                next_state.set(GameState::Launcher);
            }
        }
    }
    fade.alpha = world.transition.alpha;
}
