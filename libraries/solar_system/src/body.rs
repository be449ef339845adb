use crate::state::{animation_running, SceneState};
use crate::SolarSystemSet;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts;

pub struct BodyPlugin;

impl Plugin for BodyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CelestialBody>()
            .init_resource::<SceneState>()
            .add_systems(
                Update,
                spin_bodies
                    .in_set(SolarSystemSet::Spin)
                    .run_if(animation_running),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum TiltAxis {
    X,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Reflect)]
pub struct AxialTilt {
    pub axis: TiltAxis,
    pub degrees: f32,
}

/// A textured sphere spinning around its (possibly tilted) vertical axis.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct CelestialBody {
    pub radius: f32,
    /// Radians added to the spin angle on every animation frame
    pub spin_rate: f64,
    pub axial_tilt: Option<AxialTilt>,
    pub spin_angle: f64,
}

impl CelestialBody {
    pub fn new(radius: f32, spin_rate: f64, axial_tilt: Option<AxialTilt>) -> Self {
        Self {
            radius,
            spin_rate,
            axial_tilt,
            spin_angle: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.spin_angle += self.spin_rate;
    }

    /// Tilt and spin composed as XYZ Euler angles: tilt around x, spin around y, tilt around z.
    pub fn rotation(&self) -> Quat {
        let (x, z) = match self.axial_tilt {
            Some(AxialTilt {
                axis: TiltAxis::X,
                degrees,
            }) => (degrees.to_radians(), 0.0),
            Some(AxialTilt {
                axis: TiltAxis::Z,
                degrees,
            }) => (0.0, degrees.to_radians()),
            None => (0.0, 0.0),
        };
        let spin = self.spin_angle.rem_euclid(consts::TAU) as f32;
        Quat::from_euler(EulerRot::XYZ, x, spin, z)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_rotation(self.rotation()).with_scale(Vec3::splat(self.radius))
    }
}

pub fn spin_bodies(mut q: Query<(&mut Transform, &mut CelestialBody)>) {
    for (mut transform, mut body) in &mut q {
        body.advance();
        transform.rotation = body.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn app_with_body(spin_rate: f64) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(BodyPlugin);
        let body = CelestialBody::new(1.0, spin_rate, None);
        let entity = app.world_mut().spawn((body, body.transform())).id();
        (app, entity)
    }

    fn spin_angle(app: &App, entity: Entity) -> f64 {
        app.world().get::<CelestialBody>(entity).unwrap().spin_angle
    }

    #[test]
    fn spin_accumulates_per_frame() {
        let (mut app, entity) = app_with_body(0.024);
        for _ in 0..500 {
            app.update();
        }
        let angle = spin_angle(&app, entity);
        let expected = 500.0 * 0.024;
        assert_abs_diff_eq!(angle.sin(), f64::sin(expected), epsilon = 1e-9);
        assert_abs_diff_eq!(angle.cos(), f64::cos(expected), epsilon = 1e-9);

        let rotation = app.world().get::<Transform>(entity).unwrap().rotation;
        let expected_rotation = Quat::from_rotation_y(expected as f32);
        // q and -q describe the same rotation
        assert!(
            rotation.abs_diff_eq(expected_rotation, 1e-4)
                || rotation.abs_diff_eq(-expected_rotation, 1e-4)
        );
    }

    #[test]
    fn pause_freezes_and_resume_continues_without_catch_up() {
        let (mut app, entity) = app_with_body(0.005);
        for _ in 0..10 {
            app.update();
        }
        let before_pause = spin_angle(&app, entity);

        app.world_mut().resource_mut::<SceneState>().running = false;
        for _ in 0..25 {
            app.update();
        }
        assert_eq!(spin_angle(&app, entity), before_pause);

        app.world_mut().resource_mut::<SceneState>().running = true;
        app.update();
        assert_abs_diff_eq!(spin_angle(&app, entity), before_pause + 0.005, epsilon = 1e-12);
    }

    #[test]
    fn tilt_is_kept_while_spinning() {
        let mut body = CelestialBody::new(
            1.0,
            0.3,
            Some(AxialTilt {
                axis: TiltAxis::Z,
                degrees: 23.5,
            }),
        );
        for _ in 0..7 {
            body.advance();
        }
        // The spin axis is the body's local y axis, tilted by 23.5° around z
        let axis = body.rotation() * Vec3::Y;
        let tilt = axis.angle_between(Vec3::Y);
        assert_abs_diff_eq!(tilt, 23.5f32.to_radians(), epsilon = 1e-5);
    }

    #[test]
    fn transform_scales_to_radius() {
        let body = CelestialBody::new(0.33, 0.0, None);
        assert_eq!(body.transform().scale, Vec3::splat(0.33));
        assert_eq!(body.transform().translation, Vec3::ZERO);
    }
}
