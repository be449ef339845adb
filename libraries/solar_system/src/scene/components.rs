use bevy::prelude::*;

#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct SceneCamera;

/// Inside-out sphere carrying the star field.
#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct StarBackground;

#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct Atmosphere;

#[derive(Debug, Copy, Clone, Default, Reflect, Component)]
#[reflect(Component)]
pub struct PlanetRing;
