use crate::scene::LightingConfig;
use bevy::prelude::*;

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Sun>().register_type::<Sunlight>();
    }
}

/// The star at the center of the scene. Lit by nothing, it shows its own texture.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct Sun;

/// Point light sitting inside the sun.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct Sunlight;

/// Spawns the point light at the origin and sets the ambient fill light.
pub fn spawn_sunlight(commands: &mut Commands, config: &LightingConfig) -> Entity {
    commands.insert_resource(AmbientLight {
        color: config.ambient_color.into(),
        brightness: config.ambient_brightness,
    });
    commands
        .spawn((
            Name::new("Sunlight"),
            Sunlight,
            PointLight {
                color: config.point_color.into(),
                intensity: config.point_intensity,
                range: config.point_range,
                shadows_enabled: config.shadows,
                ..default()
            },
            Transform::IDENTITY,
        ))
        .id()
}
