//! Platformer domain: a bunny collecting carrots across five levels.
//!
//! Responsible for:
//! - Parsing the level table and building live level instances
//! - Stepping player physics and collision at a fixed 60 Hz
//! - The run state machine (advance, death, retry, victory)
//! - Camera follow, pickup particles and sprite sync
//!
//! The simulation itself lives in [`session::PlatformerWorld`] and never
//! touches the ECS; the systems here only feed it input and time.

pub mod camera;
pub mod levels;
pub mod particles;
pub mod physics;
pub mod render;
pub mod retry;
pub mod session;

use bevy::prelude::*;

use crate::shared::*;
use levels::LevelCatalog;
use session::{PlatformerEvent, PlatformerWorld};

/// Length of one simulation frame. All physics constants are per frame.
pub const FRAME_SECONDS: f32 = 1.0 / 60.0;
/// Longest real-time gap the accumulator will try to catch up on.
const MAX_CATCH_UP_SECONDS: f32 = 0.25;

/// Real seconds not yet spent on whole simulation frames.
#[derive(Resource, Debug, Default)]
pub struct FrameAccumulator(pub f32);

pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameAccumulator>()
            .add_systems(
                OnEnter(GameState::Platformer),
                (start_run, render::spawn_bunny).chain(),
            )
            .add_systems(
                OnExit(GameState::Platformer),
                (end_run, render::despawn_platformer_entities),
            )
            .add_systems(
                Update,
                (
                    run_platformer_frames,
                    leave_platformer,
                    render::rebuild_level_sprites,
                    render::sync_platformer_sprites,
                    render::sync_particle_sprites,
                )
                    .chain()
                    .run_if(in_state(GameState::Platformer)),
            );
    }
}

/// Builds a fresh run from the embedded level table.
pub fn start_run(
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    mut loaded: EventWriter<LevelLoadedEvent>,
    mut accumulator: ResMut<FrameAccumulator>,
) {
    match LevelCatalog::builtin() {
        Ok(catalog) => {
            info!("[Platformer] Starting run with {} levels", catalog.len());
            commands.insert_resource(PlatformerWorld::new(catalog));
            accumulator.0 = 0.0;
            loaded.send(LevelLoadedEvent { level: 1 });
        }
        Err(e) => {
            warn!("[Platformer] Cannot start: {}", e);
            next_state.set(GameState::Launcher);
        }
    }
}

fn end_run(mut commands: Commands, mut fade: ResMut<ScreenFade>) {
    commands.remove_resource::<PlatformerWorld>();
    fade.alpha = 0.0;
    info!("[Platformer] Run closed");
}

/// Feeds this frame's input to the run, then spends accumulated real time
/// on whole 60 Hz simulation frames.
pub fn run_platformer_frames(
    time: Res<Time>,
    input: Res<PlatformerInput>,
    world: Option<ResMut<PlatformerWorld>>,
    mut accumulator: ResMut<FrameAccumulator>,
    mut loaded: EventWriter<LevelLoadedEvent>,
    mut fade: ResMut<ScreenFade>,
) {
    let Some(mut world) = world else {
        return;
    };
    let mut events = world.apply_input(&input);

    accumulator.0 = (accumulator.0 + time.delta_secs()).min(MAX_CATCH_UP_SECONDS);
    let mut rng = rand::thread_rng();
    while accumulator.0 >= FRAME_SECONDS {
        accumulator.0 -= FRAME_SECONDS;
        events.extend(world.step(&input, &mut rng));
    }

    for event in events {
        if let PlatformerEvent::LevelLoaded(level) = event {
            loaded.send(LevelLoadedEvent { level });
        }
    }
    fade.alpha = world.fade.alpha;
}

fn leave_platformer(input: Res<PlatformerInput>, mut next_state: ResMut<NextState<GameState>>) {
    if input.exit {
        info!("[Platformer] Back to launcher");
        next_state.set(GameState::Launcher);
    }
}
