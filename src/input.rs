use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use pan_orbit::components::{PanOrbitCamera, PanOrbitState};
use pan_orbit::{get_blocked_inputs, BlockedInputs};
use solar_system::scene::SceneCamera;
use solar_system::state::SceneState;

/// Keyboard routing, run before the animation step of the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct InputSet;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SceneAction>()
            .init_resource::<SceneState>()
            .add_systems(
                Update,
                (get_blocked_inputs.pipe(route_keyboard), apply_scene_actions)
                    .chain()
                    .in_set(InputSet),
            );
    }
}

/// What a key press asks of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Event)]
pub enum SceneAction {
    /// Nudges the camera by this offset, in world units
    MoveCamera(Vec3),
    ResetCamera,
    ToggleAnimation,
    ToggleOrbits,
}

impl SceneAction {
    /// Maps the character the user typed (or an arrow key) to its action.
    pub fn from_key(key: &Key) -> Option<Self> {
        let action = match key {
            Key::Character(c) => match c.as_str() {
                "w" => Self::MoveCamera(Vec3::NEG_Z),
                "s" => Self::MoveCamera(Vec3::Z),
                "a" => Self::MoveCamera(Vec3::NEG_X),
                "d" => Self::MoveCamera(Vec3::X),
                "r" => Self::ResetCamera,
                "e" => Self::ToggleAnimation,
                "o" | "O" => Self::ToggleOrbits,
                _ => return None,
            },
            Key::ArrowUp => Self::MoveCamera(Vec3::Y),
            Key::ArrowDown => Self::MoveCamera(Vec3::NEG_Y),
            _ => return None,
        };
        Some(action)
    }
}

fn route_keyboard(
    In(blocked_inputs): In<BlockedInputs>,
    mut evr_keyboard: EventReader<KeyboardInput>,
    mut evw_actions: EventWriter<SceneAction>,
) {
    if blocked_inputs.keyboard {
        evr_keyboard.clear();
        return;
    }
    // Repeats count as presses so holding a movement key keeps moving
    let actions = evr_keyboard
        .read()
        .filter(|ev| ev.state == ButtonState::Pressed)
        .filter_map(|ev| SceneAction::from_key(&ev.logical_key));
    evw_actions.send_batch(actions);
}

fn apply_scene_actions(
    mut evr_actions: EventReader<SceneAction>,
    mut state: ResMut<SceneState>,
    mut q_camera: Query<(&PanOrbitCamera, &mut PanOrbitState, &mut Transform), With<SceneCamera>>,
) {
    for action in evr_actions.read() {
        match *action {
            SceneAction::MoveCamera(offset) => {
                for (_, _, mut transform) in &mut q_camera {
                    transform.translation += offset;
                }
            }
            SceneAction::ResetCamera => {
                for (settings, mut rig, mut transform) in &mut q_camera {
                    rig.reset(settings, &mut transform);
                }
                info!("Camera reset");
            }
            SceneAction::ToggleAnimation => {
                let running = state.toggle_running();
                info!("Animation {}", if running { "resumed" } else { "paused" });
            }
            SceneAction::ToggleOrbits => {
                let visible = state.toggle_orbits();
                info!("Orbit paths {}", if visible { "shown" } else { "hidden" });
            }
        }
        // The rig refreshes once per key even while the animation is paused
        for (settings, mut rig, mut transform) in &mut q_camera {
            rig.update(settings, &mut transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, Entity) {
        let mut app = App::new();
        app.add_event::<KeyboardInput>().add_plugins(InputPlugin);
        let camera = app
            .world_mut()
            .spawn((
                SceneCamera,
                PanOrbitCamera::default(),
                Transform::from_xyz(0.0, 0.0, 50.0),
            ))
            .id();
        (app, camera)
    }

    fn press(app: &mut App, key: Key) {
        app.world_mut().send_event(KeyboardInput {
            key_code: KeyCode::Unidentified(bevy::input::keyboard::NativeKeyCode::Unidentified),
            logical_key: key,
            state: ButtonState::Pressed,
            repeat: false,
            window: Entity::PLACEHOLDER,
        });
        app.update();
    }

    fn character(c: &str) -> Key {
        Key::Character(c.into())
    }

    fn translation(app: &App, camera: Entity) -> Vec3 {
        app.world().get::<Transform>(camera).unwrap().translation
    }

    #[test]
    fn key_table() {
        let cases = [
            (character("w"), Some(SceneAction::MoveCamera(Vec3::NEG_Z))),
            (character("s"), Some(SceneAction::MoveCamera(Vec3::Z))),
            (character("a"), Some(SceneAction::MoveCamera(Vec3::NEG_X))),
            (character("d"), Some(SceneAction::MoveCamera(Vec3::X))),
            (Key::ArrowUp, Some(SceneAction::MoveCamera(Vec3::Y))),
            (Key::ArrowDown, Some(SceneAction::MoveCamera(Vec3::NEG_Y))),
            (character("r"), Some(SceneAction::ResetCamera)),
            (character("e"), Some(SceneAction::ToggleAnimation)),
            (character("o"), Some(SceneAction::ToggleOrbits)),
            (character("O"), Some(SceneAction::ToggleOrbits)),
            (character("x"), None),
            (Key::Space, None),
        ];
        for (key, expected) in cases {
            assert_eq!(SceneAction::from_key(&key), expected, "{key:?}");
        }
    }

    #[test]
    fn movement_keys_nudge_the_camera_by_one_unit() {
        let (mut app, camera) = app();
        press(&mut app, character("w"));
        assert_eq!(translation(&app, camera), Vec3::new(0.0, 0.0, 49.0));
        press(&mut app, character("d"));
        press(&mut app, Key::ArrowUp);
        assert_eq!(translation(&app, camera), Vec3::new(1.0, 1.0, 49.0));
        press(&mut app, character("s"));
        press(&mut app, character("a"));
        press(&mut app, Key::ArrowDown);
        assert_eq!(translation(&app, camera), Vec3::new(0.0, 0.0, 50.0));
    }

    #[test]
    fn reset_puts_the_camera_home() {
        let (mut app, camera) = app();
        {
            let mut entity = app.world_mut().entity_mut(camera);
            let mut transform = entity.get_mut::<Transform>().unwrap();
            transform.translation = Vec3::new(12.0, -3.0, 7.5);
            transform.rotation = Quat::from_rotation_y(1.2);
            let mut rig = entity.get_mut::<PanOrbitState>().unwrap();
            rig.rotate(Vec2::new(0.4, 0.1));
            rig.target = Vec3::ONE;
        }
        press(&mut app, character("r"));

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 50.0));
        assert!(transform.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
        let rig = app.world().get::<PanOrbitState>(camera).unwrap();
        assert_eq!(rig.target, Vec3::ZERO);
        assert_eq!(rig.rotate_delta, Vec2::ZERO);
    }

    #[test]
    fn orbit_toggle_follows_press_parity() {
        let (mut app, _) = app();
        for presses in 1..=5 {
            let key = if presses % 2 == 0 { "O" } else { "o" };
            press(&mut app, character(key));
            assert_eq!(
                app.world().resource::<SceneState>().orbits_visible,
                presses % 2 == 0,
                "{presses} presses"
            );
        }
    }

    #[test]
    fn animation_toggle_and_released_keys() {
        let (mut app, _) = app();
        press(&mut app, character("e"));
        assert!(!app.world().resource::<SceneState>().running);

        app.world_mut().send_event(KeyboardInput {
            key_code: KeyCode::KeyE,
            logical_key: character("e"),
            state: ButtonState::Released,
            repeat: false,
            window: Entity::PLACEHOLDER,
        });
        app.update();
        assert!(!app.world().resource::<SceneState>().running);

        press(&mut app, character("e"));
        assert!(app.world().resource::<SceneState>().running);
    }

    #[test]
    fn unmapped_keys_change_nothing() {
        let (mut app, camera) = app();
        press(&mut app, character("q"));
        press(&mut app, Key::Escape);
        assert_eq!(translation(&app, camera), Vec3::new(0.0, 0.0, 50.0));
        assert_eq!(
            *app.world().resource::<SceneState>(),
            SceneState::default()
        );
    }
}
