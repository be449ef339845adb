use crate::{input, viewport};
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::render::camera::PerspectiveProjection;
use bevy::window::WindowResolution;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use pan_orbit::components::{PanOrbitCamera, PanOrbitState};
use pan_orbit::{PanOrbitCameraPlugin, PanOrbitSet};
use solar_system::scene::{CameraConfig, Catalog, SceneCamera};
use solar_system::state::{animation_running, SceneState};
use solar_system::SolarSystemSet;

const LOG_FILTER: &str =
    "wgpu=error,naga=warn,solar_orrery=debug,solar_system=debug,pan_orbit=debug";

pub(crate) struct AppSettings {
    pub(crate) resolution: WindowResolution,
    pub(crate) with_inspector: bool,
    pub(crate) catalog: Catalog,
    pub(crate) scene_state: SceneState,
}

pub fn get_app(settings: AppSettings) -> App {
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Solar Orrery".to_string(),
                    resolution: settings.resolution,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: LOG_FILTER.to_string(),
                level: Level::INFO,
                ..default()
            }),
        PanOrbitCameraPlugin,
        solar_system::SolarSystemPlugin,
        input::InputPlugin,
        viewport::ViewportPlugin,
    ))
    .insert_resource(settings.catalog)
    .insert_resource(settings.scene_state)
    .insert_resource(ClearColor(Color::BLACK))
    .add_observer(on_add_scene_camera)
    .add_observer(debug_show_named_entities);
    configure_frame_order(&mut app);

    if settings.with_inspector {
        app.add_plugins(WorldInspectorPlugin::new());
    }
    app
}

/// Keys act on the frame they are pressed in, and the camera follows the animated scene. A paused
/// animation also holds the camera still, apart from the refresh each key press asks for.
fn configure_frame_order(app: &mut App) {
    app.configure_sets(
        Update,
        (
            (input::InputSet, SolarSystemSet::Spin).chain(),
            (SolarSystemSet::Satellites, PanOrbitSet::Input).chain(),
            PanOrbitSet::Update.run_if(animation_running),
        ),
    );
}

fn debug_show_named_entities(trigger: Trigger<OnAdd, Name>, q: Query<&Name>) {
    let Ok(name) = q.get(trigger.entity()) else {
        return;
    };
    debug!("{entity}: {name}", entity = trigger.entity());
}

fn on_add_scene_camera(trigger: Trigger<OnAdd, SceneCamera>, mut commands: Commands) {
    debug!("Add scene camera to {}", trigger.entity());
    commands
        .entity(trigger.entity())
        .queue(|entity: Entity, world: &mut World| {
            let mut entity_mut = world.entity_mut(entity);
            let Some(config) = entity_mut.get::<CameraConfig>().cloned() else {
                warn!("Scene camera {entity} has no camera config, leaving it inactive");
                return;
            };
            entity_mut.insert((
                Camera3d::default(),
                Projection::Perspective(PerspectiveProjection {
                    fov: config.fov.to_radians(),
                    near: config.near,
                    far: config.far,
                    ..default()
                }),
                rig_settings(&config),
                Msaa::Sample4,
            ));
            if let Some(mut state) = entity_mut.get_mut::<PanOrbitState>() {
                state.target = config.target;
            }
        });
}

fn rig_settings(config: &CameraConfig) -> PanOrbitCamera {
    PanOrbitCamera {
        home: config.position,
        home_target: config.target,
        damping_factor: config.damping,
        min_distance: config.min_distance,
        max_distance: config.max_distance,
        enable_pan: config.enable_pan,
        enable_zoom: config.enable_zoom,
        ..default()
    }
}
