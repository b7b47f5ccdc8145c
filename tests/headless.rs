//! Headless integration tests for Meadowhop.
//!
//! These tests exercise both games' ECS wiring without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register the domain
//! plugins (sprites are plain components, so they spawn fine without a
//! renderer) and skip the UI, input and save layers.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use meadowhop::platformer::session::{PlatformerWorld, RunPhase, STARTING_LIVES};
use meadowhop::platformer::PlatformerPlugin;
use meadowhop::shared::*;
use meadowhop::village::clock::GameClock;
use meadowhop::village::grid::Cell;
use meadowhop::village::scene::Scene;
use meadowhop::village::world::VillageWorld;
use meadowhop::village::VillagePlugin;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Minimal app with the shared resources and events registered (mirrors
/// main.rs) and a fixed frame time so runs are deterministic.
fn build_test_app(frame: Duration) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(frame));

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources ─────────────────────────────────────────────────
    app.init_resource::<LauncherInput>()
        .init_resource::<PlatformerInput>()
        .init_resource::<VillageInput>()
        .init_resource::<ScreenFade>();

    // ── Shared Events ────────────────────────────────────────────────────
    app.add_event::<LevelLoadedEvent>()
        .add_event::<SceneChangedEvent>()
        .add_event::<DayStartEvent>()
        .add_event::<SaveRequestEvent>();

    app.add_plugins(PlatformerPlugin).add_plugins(VillagePlugin);
    app
}

fn enter_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update(); // process state transition
}

fn current_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn platformer(app: &App) -> &PlatformerWorld {
    app.world().resource::<PlatformerWorld>()
}

fn village(app: &App) -> &VillageWorld {
    app.world().resource::<VillageWorld>()
}

/// Run one frame with `input`, then clear it so one-shot keys fire once.
fn frame_with_platformer_input(app: &mut App, input: PlatformerInput) {
    *app.world_mut().resource_mut::<PlatformerInput>() = input;
    app.update();
    *app.world_mut().resource_mut::<PlatformerInput>() = PlatformerInput::default();
}

fn frame_with_village_input(app: &mut App, input: VillageInput) {
    *app.world_mut().resource_mut::<VillageInput>() = input;
    app.update();
    *app.world_mut().resource_mut::<VillageInput>() = VillageInput::default();
}

/// Counts `DayStartEvent`s seen by the app.
#[derive(Resource, Default)]
struct DayStarts(u32);

fn count_day_starts(mut events: EventReader<DayStartEvent>, mut seen: ResMut<DayStarts>) {
    seen.0 += events.read().count() as u32;
}

// ─────────────────────────────────────────────────────────────────────────────
// Launcher
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_starts_at_launcher() {
    let mut app = build_test_app(Duration::from_millis(16));
    app.update();
    app.update();
    assert_eq!(current_state(&app), GameState::Launcher);
    assert!(app.world().get_resource::<PlatformerWorld>().is_none());
    assert!(app.world().get_resource::<VillageWorld>().is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Platformer
// ─────────────────────────────────────────────────────────────────────────────

/// 10 ms frames never cover two 60 Hz simulation steps, so each update runs
/// at most one step.
fn platformer_app() -> App {
    let mut app = build_test_app(Duration::from_millis(10));
    app.update();
    enter_state(&mut app, GameState::Platformer);
    app
}

#[test]
fn test_platformer_jump_only_fires_after_landing() {
    let mut app = platformer_app();
    {
        let world = platformer(&app);
        assert_eq!(world.current_level, 1);
        assert_eq!(world.player.x, 80.0);
        assert!(world.player.y >= 380.0);
        assert!(!world.player.on_ground, "the bunny spawns in mid-air");
    }

    // Jump while airborne: nothing happens, the bunny keeps falling.
    frame_with_platformer_input(
        &mut app,
        PlatformerInput {
            jump_pressed: true,
            ..Default::default()
        },
    );
    frame_with_platformer_input(
        &mut app,
        PlatformerInput {
            jump_released: true,
            ..Default::default()
        },
    );
    assert!(platformer(&app).player.vy >= 0.0, "no jump in mid-air");
    assert!(!platformer(&app).jump_latched());

    let mut frames = 0;
    while !platformer(&app).player.on_ground {
        app.update();
        frames += 1;
        assert!(frames < 600, "bunny never landed");
    }
    assert_eq!(platformer(&app).player.bottom(), 500.0);

    // Grounded jump: the step that consumes the latch sets vy exactly.
    frame_with_platformer_input(
        &mut app,
        PlatformerInput {
            jump_pressed: true,
            ..Default::default()
        },
    );
    let mut frames = 0;
    while platformer(&app).jump_latched() {
        app.update();
        frames += 1;
        assert!(frames < 10, "jump was never consumed");
    }
    assert_eq!(platformer(&app).player.vy, -13.0);
    assert!(!platformer(&app).player.on_ground);
}

#[test]
fn test_platformer_death_and_retry_key() {
    let mut app = platformer_app();
    {
        let mut world = app.world_mut().resource_mut::<PlatformerWorld>();
        world.started = true;
        world.score = 20;
        world.player.y = 2000.0;
    }
    app.update();
    app.update();
    assert_eq!(platformer(&app).phase, RunPhase::Dead);
    assert_eq!(platformer(&app).lives, STARTING_LIVES - 1);

    frame_with_platformer_input(
        &mut app,
        PlatformerInput {
            retry: true,
            ..Default::default()
        },
    );
    let world = platformer(&app);
    assert_eq!(world.phase, RunPhase::Playing);
    assert_eq!(world.current_level, 1);
    assert_eq!(world.score, 0, "score rolls back to the level start");
    assert_eq!(world.lives, STARTING_LIVES - 1);
    assert!(!world.started);
}

#[test]
fn test_platformer_escape_returns_to_launcher() {
    let mut app = platformer_app();
    frame_with_platformer_input(
        &mut app,
        PlatformerInput {
            exit: true,
            ..Default::default()
        },
    );
    app.update();
    assert_eq!(current_state(&app), GameState::Launcher);
    assert!(app.world().get_resource::<PlatformerWorld>().is_none());
    assert_eq!(app.world().resource::<ScreenFade>().alpha, 0.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Village
// ─────────────────────────────────────────────────────────────────────────────

/// 50 ms frames: the longest step the village takes in one go.
fn village_app() -> App {
    let mut app = build_test_app(Duration::from_millis(50));
    app.update();
    enter_state(&mut app, GameState::Village);
    app
}

/// Hold `dir` until `done` holds for the village, failing after `max` frames.
fn walk(app: &mut App, dir: Vec2, max: usize, done: impl Fn(&VillageWorld) -> bool) {
    *app.world_mut().resource_mut::<VillageInput>() = VillageInput {
        move_dir: dir,
        ..Default::default()
    };
    let mut frames = 0;
    while !done(village(app)) {
        app.update();
        frames += 1;
        assert!(
            frames <= max,
            "walk {:?} stalled at {:?}",
            dir,
            village(app).player.pos
        );
    }
    *app.world_mut().resource_mut::<VillageInput>() = VillageInput::default();
}

#[test]
fn test_village_walk_into_own_home() {
    let mut app = village_app();
    assert_eq!(village(&app).player.pos, Vec2::new(14.0, 9.0));
    assert_eq!(village(&app).scene, Scene::Village);

    let up = Vec2::new(0.0, -1.0);
    let left = Vec2::new(-1.0, 0.0);
    walk(&mut app, up, 20, |w| w.player.pos.y <= 8.05);
    walk(&mut app, left, 60, |w| w.player.pos.x <= 7.05);
    walk(&mut app, up, 20, |w| w.player.pos.y <= 6.05);
    walk(&mut app, left, 20, |w| w.player.pos.x <= 5.05);
    walk(&mut app, up, 20, |w| w.transition.is_running());

    {
        let world = village(&app);
        assert_eq!(world.player.cell(), Cell::new(4, 5));
        assert!(world.in_own_home);
        assert_eq!(world.scene, Scene::Village, "scene swaps at full black");
    }

    for _ in 0..12 {
        app.update();
    }
    let world = village(&app);
    assert_eq!(world.scene, Scene::Home);
    assert!(world.in_own_home);
    assert_eq!(world.player.cell(), Cell::new(11, 15));
    assert_eq!(world.player.pos, Vec2::new(15.0, 11.0));
}

#[test]
fn test_village_new_day_sends_day_start() {
    let mut app = village_app();
    app.init_resource::<DayStarts>()
        .add_systems(Update, count_day_starts.after(meadowhop::village::tick_village));
    {
        let mut world = app.world_mut().resource_mut::<VillageWorld>();
        world.clock = GameClock::new(1, 24 * 60 - 1);
        world.energy = 5;
    }
    // One game minute is 20 s of play, 400 frames of 50 ms.
    for _ in 0..420 {
        app.update();
    }
    assert_eq!(village(&app).clock.day, 2);
    assert_eq!(village(&app).energy, 100);
    assert_eq!(app.world().resource::<DayStarts>().0, 1);
}

#[test]
fn test_village_escape_returns_to_launcher() {
    let mut app = village_app();
    frame_with_village_input(
        &mut app,
        VillageInput {
            back: true,
            exit: true,
            ..Default::default()
        },
    );
    app.update();
    assert_eq!(current_state(&app), GameState::Launcher);
    assert!(app.world().get_resource::<VillageWorld>().is_none());
}
