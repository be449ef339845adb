use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

pub mod body;
pub mod orbit;
pub mod scene;
pub mod state;
pub mod sun;
pub mod texture;

/// Per-frame animation steps, run in this order while the animation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum SolarSystemSet {
    Spin,
    Orbit,
    Satellites,
}

pub struct SolarSystemPlugin;

impl PluginGroup for SolarSystemPlugin {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(body::BodyPlugin)
            .add(orbit::OrbitPlugin)
            .add(sun::SunPlugin)
            .add(texture::TextureFallbackPlugin)
            .add(scene::PlanetScenePlugin)
    }
}
