mod shared;
mod input;
mod player;
mod npcs;
mod minigame;
mod gate;
mod scenes;
mod effects;
mod audio;
mod ui;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Resonance".into(),
                    resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                    present_mode: PresentMode::AutoVsync,
                    resizable: true,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    // Game state
    .init_state::<GameState>()
    // Shared resources
    .init_resource::<PlayerInput>()
    .init_resource::<InputContext>()
    .init_resource::<KeyBindings>()
    .init_resource::<InteractionClaimed>();

    // Audio, scene loading, effects and dialogue go through swappable services.
    install_default_services(&mut app);

    app
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(npcs::NpcPlugin)
        .add_plugins(minigame::MinigamePlugin)
        .add_plugins(gate::GatePlugin)
        .add_plugins(scenes::ScenePlugin)
        .add_plugins(effects::EffectsPlugin)
        .add_plugins(audio::SoundPlugin)
        .add_plugins(ui::UiPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
