use bevy::prelude::*;

mod assemble;
mod catalog;
mod components;
mod error;
mod manifest;

pub use assemble::{assemble, SceneTextures};
pub use components::{Atmosphere, PlanetRing, SceneCamera, StarBackground};
pub use error::CatalogError;
pub use manifest::{
    AtmosphereConfig, BackgroundConfig, BodyConfig, CameraConfig, Catalog, EllipseConfig,
    EpicycleConfig, HexColor, LightingConfig, PathConfig, PlanetConfig, RingConfig,
    SatelliteConfig,
};

/// Builds the scene from the [`Catalog`] resource once, at startup.
pub struct PlanetScenePlugin;

impl Plugin for PlanetScenePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneCamera>()
            .register_type::<StarBackground>()
            .register_type::<Atmosphere>()
            .register_type::<PlanetRing>()
            .register_type::<CameraConfig>()
            .add_systems(Startup, setup_scene);
    }
}

fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    catalog: Option<Res<Catalog>>,
) {
    let Some(catalog) = catalog else {
        warn!("No catalog loaded, the scene stays empty");
        return;
    };
    let textures = SceneTextures::load(&asset_server, &catalog);
    assemble(
        &mut commands,
        &mut meshes,
        &mut materials,
        &textures,
        &catalog,
    );
    info!(
        "Scene assembled: {} bodies, {} orbit paths",
        catalog.body_count(),
        catalog.orbit_path_count()
    );
}
