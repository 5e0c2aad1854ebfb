//! Headless integration tests for Resonance.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register the
//! gameplay plugins (skipping input, audio and UI), drive `PlayerInput`
//! directly and inspect the queue-backed services.
//!
//! Run with: `cargo test --test headless`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use resonance::data::{DataPlugin, GameConfig, MinigameRegistry, WorldLayout};
use resonance::effects::{EffectsPlugin, PARAM_SPHERE_COUNT};
use resonance::gate::{GateController, GateDecisionEvent, GatePlugin, GatePromptEvent};
use resonance::minigame::{MinigameController, MinigamePlugin, PlacementAttemptEvent};
use resonance::npcs::{clearance, NpcPhase, NpcPlugin, NpcRecord};
use resonance::player::PlayerPlugin;
use resonance::scenes::ScenePlugin;
use resonance::shared::*;

const FRAME: Duration = Duration::from_millis(100);

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Resource, Default)]
struct PromptLog(Vec<GatePromptEvent>);

fn record_prompts(mut events: EventReader<GatePromptEvent>, mut log: ResMut<PromptLog>) {
    log.0.extend(events.read().copied());
}

/// Builds a minimal Bevy app with the gameplay plugins and the default
/// services, but NO rendering, windowing, input or audio backend.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<PlayerInput>()
        .init_resource::<InputContext>()
        .init_resource::<KeyBindings>()
        .init_resource::<InteractionClaimed>();
    install_default_services(&mut app);

    // ── Gameplay plugins ─────────────────────────────────────────────────
    app.add_plugins((
        DataPlugin,
        ScenePlugin,
        PlayerPlugin,
        NpcPlugin,
        MinigamePlugin,
        GatePlugin,
        EffectsPlugin,
    ));

    app.init_resource::<PromptLog>()
        .add_systems(Update, record_prompts);
    app
}

fn tick(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Hold an action for exactly one frame.
fn press(app: &mut App, set: impl FnOnce(&mut PlayerInput)) {
    set(&mut app.world_mut().resource_mut::<PlayerInput>());
    app.update();
    *app.world_mut().resource_mut::<PlayerInput>() = PlayerInput::default();
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// Loading → MainMenu through the scene loader.
fn boot(app: &mut App) {
    tick(app, 2);
    assert_eq!(state(app), GameState::MainMenu, "boot should land on the main menu");
}

fn load_scene(app: &mut App, scene: SceneId) {
    app.world_mut().resource_mut::<Loader>().load(scene.name());
    tick(app, 2);
}

fn teleport_player(app: &mut App, pos: Vec2) {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&mut Transform, With<Player>>();
    let mut tf = query.single_mut(world);
    tf.translation.x = pos.x;
    tf.translation.y = pos.y;
}

fn npc(app: &mut App, name: &str) -> (Vec2, NpcPhase) {
    let world = app.world_mut();
    let mut query = world.query::<(&NpcRecord, &Transform)>();
    query
        .iter(world)
        .find(|(record, _)| record.name == name)
        .map(|(record, tf)| (tf.translation.truncate(), record.phase()))
        .expect("npc spawned")
}

fn place(app: &mut App, item: &str, zone: &str) {
    app.world_mut().send_event(PlacementAttemptEvent {
        item: item.into(),
        zone: Some(zone.into()),
    });
    app.update();
}

/// Walk up to an NPC, solve its puzzle and accept it as a companion.
fn recruit(app: &mut App, name: &str) {
    let (pos, phase) = npc(app, name);
    assert_eq!(phase, NpcPhase::Idle);

    teleport_player(app, pos + Vec2::new(20.0, 0.0));
    press(app, |input| input.interact = true);
    tick(app, 2);
    assert_eq!(state(app), GameState::Minigame, "{name}'s puzzle should open");

    let items: Vec<(String, String)> = {
        let controller = app.world().resource::<MinigameController>();
        let session = controller.session().expect("session open");
        session
            .definition()
            .items
            .iter()
            .map(|item| (item.id.clone(), item.correct_zone.clone()))
            .collect()
    };
    for (item, zone) in &items {
        place(app, item, zone);
    }

    let close_frames = close_delay_frames(app);
    tick(app, close_frames);
    assert_eq!(state(app), GameState::Playing, "panel should close after solving");
    assert_eq!(npc(app, name).1, NpcPhase::DialogueShown);

    press(app, |input| input.interact = true);
    tick(app, 1);
    assert_eq!(npc(app, name).1, NpcPhase::Following);
}

fn close_delay_frames(app: &App) -> usize {
    let secs = app.world().resource::<GameConfig>().minigame_close_delay;
    (secs / FRAME.as_secs_f32()).ceil() as usize + 3
}

fn count_sfx(app: &App, id: &str) -> usize {
    app.world()
        .resource::<PendingAudio>()
        .0
        .drain()
        .into_iter()
        .filter(|cmd| *cmd == AudioCommand::Effect(id.to_string()))
        .count()
}

/// Audio service that only remembers what it was asked to play.
#[derive(Clone, Default)]
struct RecordingAudio(Arc<Mutex<Vec<String>>>);

impl RecordingAudio {
    fn played(&self) -> Vec<String> {
        self.0.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

impl AudioService for RecordingAudio {
    fn play_effect(&mut self, id: &str) {
        if let Ok(mut log) = self.0.lock() {
            log.push(id.to_string());
        }
    }

    fn play_music(&mut self, id: &str) {
        if let Ok(mut log) = self.0.lock() {
            log.push(format!("music:{id}"));
        }
    }

    fn stop(&mut self) {
        if let Ok(mut log) = self.0.lock() {
            log.push("music:stop".to_string());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_loads_data_and_main_menu() {
    let mut app = build_test_app();
    boot(&mut app);

    assert!(app.world().resource::<MinigameRegistry>().len() >= 4);
    assert_eq!(app.world().resource::<WorldLayout>().npcs.len(), 4);

    let current = app.world().resource::<CurrentScene>();
    assert_eq!(current.scene, Some(SceneId::MainMenu));
    assert_eq!(current.generation, 1);
}

#[test]
fn test_main_menu_quits_only_from_quit_option() {
    let mut app = build_test_app();
    boot(&mut app);

    press(&mut app, |input| input.ui_cancel = true);
    assert!(app.should_exit().is_none(), "cancel must not quit");
    assert_eq!(state(&app), GameState::MainMenu);

    press(&mut app, |input| input.ui_down = true);
    press(&mut app, |input| input.ui_confirm = true);
    assert_eq!(app.should_exit(), Some(AppExit::Success));
}

#[test]
fn test_main_menu_to_world_via_intro_skip() {
    let mut app = build_test_app();
    boot(&mut app);

    press(&mut app, |input| input.ui_confirm = true);
    tick(&mut app, 1);
    assert_eq!(state(&app), GameState::Intro);

    press(&mut app, |input| input.skip_cutscene = true);
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(
        app.world().resource::<CurrentScene>().scene,
        Some(SceneId::World)
    );

    let world = app.world_mut();
    let players = world.query::<&Player>().iter(world).count();
    let npcs = world.query::<&NpcRecord>().iter(world).count();
    assert_eq!(players, 1);
    assert_eq!(npcs, 4);
}

#[test]
fn test_full_world_playthrough_triggers_tower_once() {
    let mut app = build_test_app();
    boot(&mut app);
    load_scene(&mut app, SceneId::World);
    assert_eq!(state(&app), GameState::Playing);

    let tower = app.world().resource::<WorldLayout>().tower.position();
    let away = app.world().resource::<WorldLayout>().player_start();

    for name in ["Mara", "Teo", "Iris"] {
        recruit(&mut app, name);
    }

    // Three of four: the tower only warns.
    teleport_player(&mut app, tower);
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(
        app.world().resource::<PromptLog>().0,
        vec![GatePromptEvent::Warning]
    );
    assert!(!app.world().resource::<GateController>().is_ready());

    teleport_player(&mut app, away);
    tick(&mut app, 1);
    recruit(&mut app, "Bruno");
    assert!(app.world().resource::<GateController>().is_ready());

    teleport_player(&mut app, tower);
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::TowerPrompt);
    assert_eq!(
        app.world().resource::<PromptLog>().0.last(),
        Some(&GatePromptEvent::Confirm)
    );

    count_sfx(&app, SFX_TOWER_TRIGGER);
    let generation = app.world().resource::<CurrentScene>().generation;

    // Two confirmations in one frame and another one later: one activation.
    app.world_mut().send_event(GateDecisionEvent { confirmed: true });
    app.world_mut().send_event(GateDecisionEvent { confirmed: true });
    tick(&mut app, 2);
    app.world_mut().send_event(GateDecisionEvent { confirmed: true });
    tick(&mut app, 1);

    assert_eq!(state(&app), GameState::Playing);
    assert!(app.world().resource::<GateController>().is_triggered());
    assert_eq!(count_sfx(&app, SFX_TOWER_TRIGGER), 1);
    assert_eq!(
        app.world()
            .resource::<EffectParameters>()
            .0
            .get(PARAM_SPHERE_COUNT),
        Some(5.0),
        "four companion spheres and the tower's"
    );

    let delay = app.world().resource::<GameConfig>().gate_delay;
    tick(&mut app, (delay / FRAME.as_secs_f32()).ceil() as usize + 10);

    let current = app.world().resource::<CurrentScene>();
    assert_eq!(current.scene, Some(SceneId::VideoEnd));
    assert_eq!(current.generation, generation + 1, "next scene loads exactly once");
    assert_eq!(state(&app), GameState::Cutscene);
    assert!(!app.world().contains_resource::<PendingSceneTransition>());
}

#[test]
fn test_tower_prompt_cancel_allows_retry() {
    let mut app = build_test_app();
    boot(&mut app);
    load_scene(&mut app, SceneId::World);
    for name in ["Mara", "Teo", "Iris", "Bruno"] {
        recruit(&mut app, name);
    }

    let tower = app.world().resource::<WorldLayout>().tower.position();
    teleport_player(&mut app, tower);
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::TowerPrompt);

    app.world_mut().send_event(GateDecisionEvent { confirmed: false });
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::Playing);
    assert!(!app.world().resource::<GateController>().is_triggered());
    assert!(!app.world().contains_resource::<PendingSceneTransition>());

    // Leave and come back: asked again.
    teleport_player(&mut app, Vec2::ZERO);
    tick(&mut app, 1);
    teleport_player(&mut app, tower);
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::TowerPrompt);
}

#[test]
fn test_world_without_npcs_never_opens_the_gate() {
    let mut app = build_test_app();
    boot(&mut app);
    app.world_mut().resource_mut::<WorldLayout>().npcs.clear();
    load_scene(&mut app, SceneId::World);

    let tower = app.world().resource::<WorldLayout>().tower.position();
    teleport_player(&mut app, tower);
    tick(&mut app, 2);

    assert_eq!(state(&app), GameState::Playing);
    assert!(!app.world().resource::<GateController>().is_ready());
    assert_eq!(
        app.world().resource::<PromptLog>().0,
        vec![GatePromptEvent::Warning]
    );
}

#[test]
fn test_drop_zone_holds_one_item() {
    let mut app = build_test_app();
    boot(&mut app);
    load_scene(&mut app, SceneId::World);

    app.world_mut()
        .resource_mut::<MinigameBus>()
        .publish(MinigameEvent::Started {
            minigame: "harvest".into(),
            npc: None,
        });
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::Minigame);
    assert!(app.world().resource::<Time<Virtual>>().is_paused());

    place(&mut app, "apple", "sack");
    place(&mut app, "apple", "basket");
    place(&mut app, "wheat", "basket");

    {
        let controller = app.world().resource::<MinigameController>();
        let session = controller.session().expect("session open");
        assert_eq!(session.occupied_count(), 1);
        assert!(session.is_occupied("basket"));
        assert!(session.is_placed("apple"));
        assert!(!session.is_placed("wheat"));
        assert!(!session.is_complete());
    }

    press(&mut app, |input| input.ui_cancel = true);
    tick(&mut app, 1);
    assert_eq!(state(&app), GameState::Playing);
    assert!(!app.world().resource::<MinigameController>().is_open());
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn test_abandoned_puzzle_returns_npc_to_idle() {
    let mut app = build_test_app();
    boot(&mut app);
    load_scene(&mut app, SceneId::World);

    let (pos, _) = npc(&mut app, "Teo");
    teleport_player(&mut app, pos + Vec2::new(0.0, 20.0));
    press(&mut app, |input| input.interact = true);
    tick(&mut app, 2);
    assert_eq!(state(&app), GameState::Minigame);
    assert_eq!(npc(&mut app, "Teo").1, NpcPhase::MinigameActive);

    press(&mut app, |input| input.ui_cancel = true);
    tick(&mut app, 1);
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(npc(&mut app, "Teo").1, NpcPhase::Idle);
}

/// Distance from the player to the named companion, and the clearance the
/// companion has to keep.
fn companion_gap(app: &mut App, name: &str) -> (f32, f32) {
    let margin = app.world().resource::<GameConfig>().follow_margin;
    let world = app.world_mut();
    let (player_pos, player_radius) = world
        .query::<(&Transform, &Player)>()
        .iter(world)
        .map(|(tf, player)| (tf.translation.truncate(), player.collision_radius))
        .next()
        .expect("player spawned");
    world
        .query::<(&NpcRecord, &Transform)>()
        .iter(world)
        .find(|(record, _)| record.name == name)
        .map(|(record, tf)| {
            (
                tf.translation.truncate().distance(player_pos),
                clearance(player_radius, record.collision_radius, margin),
            )
        })
        .expect("npc spawned")
}

#[test]
fn test_companion_keeps_clearance_when_player_turns_and_approaches() {
    let mut app = build_test_app();
    boot(&mut app);
    load_scene(&mut app, SceneId::World);
    recruit(&mut app, "Mara");
    tick(&mut app, 5);

    // Mara settled west of the player. Spin the player's facing every frame.
    for facing in [Vec2::NEG_X, Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::X, Vec2::NEG_Y] {
        {
            let world = app.world_mut();
            let mut query = world.query::<&mut Player>();
            query.single_mut(world).last_move_dir = facing;
        }
        for _ in 0..3 {
            app.update();
            let (distance, gap) = companion_gap(&mut app, "Mara");
            assert!(
                distance >= gap - 1e-3,
                "companion at {distance} cut inside clearance {gap} (facing {facing})"
            );
        }
    }

    // Walk straight at the companion: it backs off instead of overlapping.
    let player_pos = {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<Player>>();
        query.single(world).translation.truncate()
    };
    let toward = (npc(&mut app, "Mara").0 - player_pos).normalize();
    for _ in 0..8 {
        press(&mut app, |input| input.move_axis = toward);
        let (distance, gap) = companion_gap(&mut app, "Mara");
        assert!(
            distance >= gap - 1e-3,
            "companion at {distance} overlapped the walking player (clearance {gap})"
        );
    }
    assert_eq!(npc(&mut app, "Mara").1, NpcPhase::Following);
}

#[test]
fn test_scene_reload_tears_down_world() {
    let mut app = build_test_app();
    boot(&mut app);
    load_scene(&mut app, SceneId::World);
    recruit(&mut app, "Mara");

    load_scene(&mut app, SceneId::MainMenu);
    let world = app.world_mut();
    assert_eq!(world.query::<&NpcRecord>().iter(world).count(), 0);
    assert_eq!(world.query::<&ColorSphere>().iter(world).count(), 0);
    assert_eq!(world.query::<&Player>().iter(world).count(), 0);
    assert_eq!(
        world.resource::<MinigameBus>().listener_count(),
        1,
        "only the minigame controller stays subscribed"
    );
}

#[test]
fn test_injected_audio_service_hears_minigame_feedback() {
    let mut app = build_test_app();
    let audio = RecordingAudio::default();
    app.insert_resource(Audio::new(Box::new(audio.clone())));

    boot(&mut app);
    load_scene(&mut app, SceneId::World);
    assert!(audio.played().contains(&"music:world".to_string()));

    app.world_mut()
        .resource_mut::<MinigameBus>()
        .publish(MinigameEvent::Started {
            minigame: "instruments".into(),
            npc: None,
        });
    tick(&mut app, 2);
    place(&mut app, "drum", "high");
    place(&mut app, "drum", "low");
    place(&mut app, "flute", "high");

    let played = audio.played();
    let fail = played.iter().position(|id| id == "minigame_fail");
    let ok = played.iter().position(|id| id == SFX_COLLECTABLE);
    let success = played.iter().position(|id| id == "minigame_success");
    assert!(fail.is_some() && ok.is_some() && success.is_some(), "{played:?}");
    assert!(fail < ok && ok < success);
    assert_eq!(
        played.iter().filter(|id| *id == "minigame_success").count(),
        1
    );
}
