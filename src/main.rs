mod shared;
mod input;
mod platformer;
mod village;
mod ui;
mod save;

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Meadowhop".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(ClearColor(Color::srgb(0.93, 0.97, 0.95)))
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<LauncherInput>()
        .init_resource::<PlatformerInput>()
        .init_resource::<VillageInput>()
        .init_resource::<ScreenFade>()
        // Events
        .add_event::<LevelLoadedEvent>()
        .add_event::<SceneChangedEvent>()
        .add_event::<DayStartEvent>()
        .add_event::<SaveRequestEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(platformer::PlatformerPlugin)
        .add_plugins(village::VillagePlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(save::SavePlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

/// One logical screen of world space, whatever the physical window size.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: SCREEN_WIDTH,
                min_height: SCREEN_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        },
    ));
}
