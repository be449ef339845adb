use crate::state::{animation_running, SceneState};
use crate::SolarSystemSet;
use bevy::math::dvec3;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use std::f64::consts;

pub struct OrbitPlugin;

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OrbitGroup>()
            .register_type::<SatelliteOrbit>()
            .register_type::<OrbitPath>()
            .register_type::<SceneState>()
            .init_resource::<SceneState>()
            .configure_sets(
                Update,
                (
                    SolarSystemSet::Spin,
                    SolarSystemSet::Orbit,
                    SolarSystemSet::Satellites,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    advance_orbits
                        .in_set(SolarSystemSet::Orbit)
                        .run_if(animation_running),
                    advance_satellites
                        .in_set(SolarSystemSet::Satellites)
                        .run_if(animation_running),
                    apply_orbit_visibility
                        .after(SolarSystemSet::Satellites)
                        .run_if(resource_changed::<SceneState>),
                ),
            );
    }
}

type Real = f64;

/// Point of the ellipse with semi-axes `a` (along x) and `b` (along y) at parameter `theta`.
#[inline]
pub fn ellipse_point(a: Real, b: Real, theta: Real) -> Vec3 {
    dvec3(a * theta.cos(), b * theta.sin(), 0.0).as_vec3()
}

/// Closed polyline of `segments` samples around the ellipse; the first point is repeated at the
/// end, so the result holds `segments + 1` points.
pub fn orbit_path_points(a: Real, b: Real, segments: u32) -> Vec<Vec3> {
    let mut points = (0..segments)
        .map(|i| ellipse_point(a, b, consts::TAU * i as Real / segments as Real))
        .collect::<Vec<_>>();
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    points
}

/// Pivot moved along an ellipse around the origin; the planet and its companions hang below it.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct OrbitGroup {
    pub semi_major_axis: Real,
    pub semi_minor_axis: Real,
    /// Radians added to the orbit angle on every animation frame
    pub speed: Real,
    pub angle: Real,
}

impl OrbitGroup {
    pub fn new(semi_major_axis: Real, semi_minor_axis: Real, speed: Real) -> Self {
        Self {
            semi_major_axis,
            semi_minor_axis,
            speed,
            angle: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.angle += self.speed;
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        ellipse_point(self.semi_major_axis, self.semi_minor_axis, self.angle)
    }
}

/// Pivot for a moon. It sits at a fraction of its parent's offset from the sun, plus a small
/// circular epicycle. This does not track the parent planet itself; it is kept as a stylised
/// placement.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct SatelliteOrbit {
    pub radius: Real,
    pub parent_scale: Real,
    /// Radians added to the orbit angle on every animation frame
    pub speed: Real,
    pub angle: Real,
}

impl SatelliteOrbit {
    pub fn new(radius: Real, parent_scale: Real, speed: Real) -> Self {
        Self {
            radius,
            parent_scale,
            speed,
            angle: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.angle += self.speed;
    }

    /// Local translation given the parent group's translation for this frame.
    #[inline]
    pub fn position(&self, parent: Vec3) -> Vec3 {
        let epicycle = dvec3(
            self.radius * self.angle.cos(),
            self.radius * self.angle.sin(),
            0.0,
        );
        let center = parent.as_dvec3() * self.parent_scale;
        (center + epicycle).as_vec3()
    }
}

/// Static outline of an orbit, drawn as a line strip.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct OrbitPath {
    pub semi_major_axis: Real,
    pub semi_minor_axis: Real,
    pub segments: u32,
}

impl OrbitPath {
    pub fn new(semi_major_axis: Real, semi_minor_axis: Real, segments: u32) -> Self {
        Self {
            semi_major_axis,
            semi_minor_axis,
            segments,
        }
    }

    pub fn points(&self) -> Vec<Vec3> {
        orbit_path_points(self.semi_major_axis, self.semi_minor_axis, self.segments)
    }

    pub fn mesh(&self) -> Mesh {
        let positions = self
            .points()
            .into_iter()
            .map(|p| p.to_array())
            .collect::<Vec<_>>();
        Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    }
}

fn advance_orbits(mut q: Query<(&mut Transform, &mut OrbitGroup)>) {
    for (mut transform, mut orbit) in &mut q {
        orbit.advance();
        transform.translation = orbit.position();
    }
}

fn advance_satellites(
    mut q_satellites: Query<(&mut Transform, &mut SatelliteOrbit, Option<&Parent>)>,
    q_parents: Query<&Transform, Without<SatelliteOrbit>>,
) {
    for (mut transform, mut orbit, parent) in &mut q_satellites {
        // Reads the parent translation written by `advance_orbits` this same frame
        let parent_translation = parent
            .and_then(|parent| q_parents.get(parent.get()).ok())
            .map(|t| t.translation)
            .unwrap_or(Vec3::ZERO);
        orbit.advance();
        transform.translation = orbit.position(parent_translation);
    }
}

fn apply_orbit_visibility(
    state: Res<SceneState>,
    mut q_paths: Query<&mut Visibility, With<OrbitPath>>,
) {
    let visibility = if state.orbits_visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut path_visibility in &mut q_paths {
        path_visibility.set_if_neq(visibility);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn orbit_path_samples_closed_ellipse() {
        let (a, b, segments) = (15.0, 10.0, 64);
        let points = orbit_path_points(a, b, segments);
        assert_eq!(points.len(), segments as usize + 1);
        for (i, point) in points.iter().take(segments as usize).enumerate() {
            let theta = consts::TAU * i as f64 / segments as f64;
            assert_abs_diff_eq!(point.x, (a * theta.cos()) as f32, epsilon = 1e-6);
            assert_abs_diff_eq!(point.y, (b * theta.sin()) as f32, epsilon = 1e-6);
            assert_eq!(point.z, 0.0);
        }
        assert_eq!(points[0], points[segments as usize]);
        assert_eq!(points[0], Vec3::new(15.0, 0.0, 0.0));
    }

    #[test]
    fn orbit_path_without_segments_is_empty() {
        assert!(orbit_path_points(3.0, 2.0, 0).is_empty());
    }

    #[test]
    fn orbit_path_mesh_is_line_strip() {
        let path = OrbitPath::new(3.0, 2.0, 32);
        let mesh = path.mesh();
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);
        assert_eq!(mesh.count_vertices(), 33);
    }

    #[test]
    fn orbit_group_follows_ellipse() {
        let mut orbit = OrbitGroup::new(25.0, 20.0, 0.007);
        for _ in 0..300 {
            orbit.advance();
        }
        let angle: f64 = 300.0 * 0.007;
        assert_abs_diff_eq!(orbit.angle, angle, epsilon = 1e-12);
        let position = orbit.position();
        assert_abs_diff_eq!(position.x, (25.0 * angle.cos()) as f32, epsilon = 1e-5);
        assert_abs_diff_eq!(position.y, (20.0 * angle.sin()) as f32, epsilon = 1e-5);
        assert_eq!(position.z, 0.0);
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(OrbitPlugin);
        app
    }

    #[test]
    fn moon_follows_earth_position_of_the_same_tick() {
        let mut app = app();
        let earth_orbit = OrbitGroup::new(15.0, 10.0, 0.01);
        let earth = app
            .world_mut()
            .spawn((
                earth_orbit,
                Transform::from_translation(earth_orbit.position()),
            ))
            .id();
        let moon = app
            .world_mut()
            .spawn((SatelliteOrbit::new(0.1, 0.2, 0.02), Transform::default()))
            .set_parent(earth)
            .id();

        for tick in 1..=120 {
            app.update();

            let earth_position = app.world().get::<Transform>(earth).unwrap().translation;
            let moon_position = app.world().get::<Transform>(moon).unwrap().translation;
            let theta_e = tick as f64 * 0.01;
            let theta_m = tick as f64 * 0.02;
            let earth_expected = ellipse_point(15.0, 10.0, theta_e);
            assert_abs_diff_eq!(earth_position.x, earth_expected.x, epsilon = 1e-4);
            assert_abs_diff_eq!(earth_position.y, earth_expected.y, epsilon = 1e-4);
            assert_abs_diff_eq!(
                moon_position.x,
                earth_position.x / 5.0 + (0.1 * theta_m.cos()) as f32,
                epsilon = 1e-5
            );
            assert_abs_diff_eq!(
                moon_position.y,
                earth_position.y / 5.0 + (0.1 * theta_m.sin()) as f32,
                epsilon = 1e-5
            );
            assert_eq!(moon_position.z, 0.0);
        }
    }

    #[test]
    fn paused_orbits_stay_put() {
        let mut app = app();
        let orbit = OrbitGroup::new(7.0, 6.0, 0.03);
        let entity = app
            .world_mut()
            .spawn((orbit, Transform::from_translation(orbit.position())))
            .id();
        app.update();
        let before = *app.world().get::<Transform>(entity).unwrap();

        app.world_mut().resource_mut::<SceneState>().running = false;
        app.update();
        app.update();
        assert_eq!(*app.world().get::<Transform>(entity).unwrap(), before);
        assert_abs_diff_eq!(
            app.world().get::<OrbitGroup>(entity).unwrap().angle,
            0.03,
            epsilon = 1e-12
        );
    }

    #[test]
    fn orbit_paths_follow_visibility_flag() {
        let mut app = app();
        let paths = (0..7)
            .map(|_| {
                app.world_mut()
                    .spawn((OrbitPath::new(10.0, 8.0, 64), Visibility::default()))
                    .id()
            })
            .collect::<Vec<_>>();
        let planet = app.world_mut().spawn(Visibility::default()).id();

        app.update();
        app.world_mut().resource_mut::<SceneState>().toggle_orbits();
        app.update();
        for path in &paths {
            assert_eq!(
                *app.world().get::<Visibility>(*path).unwrap(),
                Visibility::Hidden
            );
        }
        assert_eq!(
            *app.world().get::<Visibility>(planet).unwrap(),
            Visibility::Inherited
        );

        app.world_mut().resource_mut::<SceneState>().toggle_orbits();
        app.update();
        for path in &paths {
            assert_eq!(
                *app.world().get::<Visibility>(*path).unwrap(),
                Visibility::Inherited
            );
        }
    }
}
