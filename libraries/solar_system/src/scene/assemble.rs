use crate::body::CelestialBody;
use crate::orbit::{OrbitGroup, OrbitPath, SatelliteOrbit};
use crate::scene::components::{Atmosphere, PlanetRing, SceneCamera, StarBackground};
use crate::scene::manifest::{
    AtmosphereConfig, BackgroundConfig, BodyConfig, CameraConfig, Catalog, PlanetConfig,
    RingConfig, SatelliteConfig,
};
use crate::sun;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use bevy::utils::HashMap;
use std::f32::consts::FRAC_PI_2;

const SPHERE_SECTORS: u32 = 32;
const SPHERE_STACKS: u32 = 32;

/// Image handles keyed by their path in the catalog. A path with no handle renders untextured.
#[derive(Debug, Default, Clone)]
pub struct SceneTextures {
    handles: HashMap<String, Handle<Image>>,
}

impl SceneTextures {
    pub fn load(asset_server: &AssetServer, catalog: &Catalog) -> Self {
        let handles = catalog
            .texture_paths()
            .map(|path| (path.to_string(), asset_server.load(path.to_string())))
            .collect();
        Self { handles }
    }

    pub fn get(&self, path: &str) -> Option<Handle<Image>> {
        self.handles.get(path).cloned()
    }
}

/// Spawns the whole scene described by `catalog`: sun and light, one orbit group per planet with
/// its companions, the orbit outlines, the star background and the camera.
pub fn assemble(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    textures: &SceneTextures,
    catalog: &Catalog,
) {
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(SPHERE_SECTORS, SPHERE_STACKS));
    let path_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });
    let mut builder = SceneBuilder {
        commands,
        meshes,
        materials,
        textures,
        sphere,
        path_material,
    };

    sun::spawn_sunlight(builder.commands, &catalog.lighting);
    let sun_body = builder.spawn_body(&catalog.sun);
    builder.commands.entity(sun_body).insert(sun::Sun);

    for planet in &catalog.planets {
        builder.spawn_planet(planet);
        let path = OrbitPath::new(
            planet.orbit.semi_major_axis,
            planet.orbit.semi_minor_axis,
            planet.orbit.path_segments,
        );
        builder.spawn_orbit_path(&planet.body.name, path);
    }

    if let Some(background) = &catalog.background {
        builder.spawn_background(background);
    }
    builder.spawn_camera(&catalog.camera);
}

struct SceneBuilder<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    textures: &'a SceneTextures,
    sphere: Handle<Mesh>,
    path_material: Handle<StandardMaterial>,
}

impl SceneBuilder<'_, '_, '_> {
    fn texture(&self, path: Option<&str>) -> Option<Handle<Image>> {
        path.and_then(|path| self.textures.get(path))
    }

    fn spawn_body(&mut self, config: &BodyConfig) -> Entity {
        let body = CelestialBody::new(config.radius, config.spin_rate, config.axial_tilt);
        let base_color_texture = self.texture(config.texture.as_deref());
        let material = self.materials.add(StandardMaterial {
            base_color_texture,
            unlit: config.unlit,
            perceptual_roughness: 1.0,
            ..default()
        });
        let mut entity = self.commands.spawn((
            Name::new(config.name.clone()),
            body,
            body.transform(),
            Mesh3d(self.sphere.clone()),
            MeshMaterial3d(material),
        ));
        if config.unlit {
            entity.insert(NotShadowCaster);
        }
        debug!("Spawned body {} (radius {})", config.name, config.radius);
        entity.id()
    }

    fn spawn_planet(&mut self, config: &PlanetConfig) -> Entity {
        let orbit = OrbitGroup::new(
            config.orbit.semi_major_axis,
            config.orbit.semi_minor_axis,
            config.orbit.speed,
        );
        let position = orbit.position();

        let mut children = vec![self.spawn_body(&config.body)];
        if let Some(atmosphere) = &config.atmosphere {
            children.push(self.spawn_atmosphere(&config.body.name, atmosphere));
        }
        if let Some(ring) = &config.ring {
            children.push(self.spawn_ring(&config.body.name, ring));
        }
        for satellite in &config.satellites {
            children.extend(self.spawn_satellite(satellite, position));
        }

        let name = format!("{} (Orbit Group)", config.body.name);
        debug!("Spawned {name} at {position}");
        self.commands
            .spawn((
                Name::new(name),
                orbit,
                Transform::from_translation(position),
                Visibility::default(),
            ))
            .add_children(&children)
            .id()
    }

    /// Spawns the satellite group and, when configured, its outline. Both end up as children of
    /// the parent planet's group.
    fn spawn_satellite(&mut self, config: &SatelliteConfig, parent_position: Vec3) -> Vec<Entity> {
        let orbit = SatelliteOrbit::new(
            config.orbit.radius,
            config.orbit.parent_scale,
            config.orbit.speed,
        );
        let body = self.spawn_body(&config.body);
        let group = self
            .commands
            .spawn((
                Name::new(format!("{} (Orbit Group)", config.body.name)),
                orbit,
                Transform::from_translation(orbit.position(parent_position)),
                Visibility::default(),
            ))
            .add_child(body)
            .id();

        let mut spawned = vec![group];
        if let Some(path) = &config.path {
            let path = OrbitPath::new(path.semi_major_axis, path.semi_minor_axis, path.segments);
            spawned.push(self.spawn_orbit_path(&config.body.name, path));
        }
        spawned
    }

    fn spawn_atmosphere(&mut self, owner: &str, config: &AtmosphereConfig) -> Entity {
        let color = Color::from(config.color).with_alpha(config.opacity);
        let material = self.materials.add(StandardMaterial {
            base_color: color,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        self.commands
            .spawn((
                Name::new(format!("{owner} Atmosphere")),
                Atmosphere,
                Mesh3d(self.sphere.clone()),
                MeshMaterial3d(material),
                Transform::from_scale(Vec3::splat(config.radius)),
                NotShadowCaster,
            ))
            .id()
    }

    fn spawn_ring(&mut self, owner: &str, config: &RingConfig) -> Entity {
        let mesh = self.meshes.add(
            Annulus::new(config.inner_radius, config.outer_radius)
                .mesh()
                .resolution(config.segments),
        );
        let base_color_texture = self.texture(config.texture.as_deref());
        let material = self.materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(config.opacity),
            base_color_texture,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        self.commands
            .spawn((
                Name::new(format!("{owner} Ring")),
                PlanetRing,
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            ))
            .id()
    }

    fn spawn_orbit_path(&mut self, owner: &str, path: OrbitPath) -> Entity {
        let mesh = self.meshes.add(path.mesh());
        self.commands
            .spawn((
                Name::new(format!("{owner} Orbit")),
                path,
                Mesh3d(mesh),
                MeshMaterial3d(self.path_material.clone()),
                Transform::IDENTITY,
                Visibility::default(),
                NotShadowCaster,
            ))
            .id()
    }

    fn spawn_background(&mut self, config: &BackgroundConfig) -> Entity {
        let base_color_texture = self.texture(Some(&config.texture));
        let material = self.materials.add(StandardMaterial {
            base_color_texture,
            unlit: true,
            // Seen from the inside
            cull_mode: Some(Face::Front),
            ..default()
        });
        self.commands
            .spawn((
                Name::new("Stars"),
                StarBackground,
                Mesh3d(self.sphere.clone()),
                MeshMaterial3d(material),
                Transform::from_scale(Vec3::splat(config.radius)),
                NotShadowCaster,
            ))
            .id()
    }

    /// Only places the camera; the rig and projection are attached when the [`SceneCamera`] is
    /// added.
    fn spawn_camera(&mut self, config: &CameraConfig) -> Entity {
        self.commands
            .spawn((
                Name::new("Camera"),
                SceneCamera,
                config.clone(),
                Transform::from_translation(config.position).looking_at(config.target, Vec3::Y),
            ))
            .id()
    }
}
