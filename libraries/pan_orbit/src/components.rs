use bevy::prelude::*;
use std::f32::consts::PI;

/// Closest the camera may get to the poles of its target, in radians
const MIN_POLAR_ANGLE: f32 = 1e-6;
/// Pending motion below this is dropped so the rig comes to rest
const SETTLE_EPSILON: f32 = 1e-6;

// The internal state of the pan-orbit controller
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct PanOrbitState {
    pub target: Vec3,
    /// Pending azimuth (x) and polar (y) rotation, in radians
    pub rotate_delta: Vec2,
    pub pan_offset: Vec3,
    pub zoom_scale: f32,
    needs_update: bool,
}

impl Default for PanOrbitState {
    fn default() -> Self {
        PanOrbitState {
            target: Vec3::ZERO,
            rotate_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            zoom_scale: 1.0,
            needs_update: true,
        }
    }
}

/// The configuration of the pan-orbit controller
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
#[require(PanOrbitState)]
pub struct PanOrbitCamera {
    /// Where the camera goes back to on reset
    pub home: Vec3,
    /// What the camera looks at after a reset
    pub home_target: Vec3,
    /// Fraction of the pending motion applied on each update
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    /// World units per pixel of mouse motion, per unit of distance to the target
    pub pan_sensitivity: f32,
    /// Radians per pixel of mouse motion
    pub orbit_sensitivity: f32,
    /// Exponent per pixel of mouse motion
    pub zoom_sensitivity: f32,
    /// For devices with a notched scroll wheel, like desktop mice
    pub scroll_line_sensitivity: f32,
    /// For devices with smooth scrolling, like touchpads
    pub scroll_pixel_sensitivity: f32,
}

impl Default for PanOrbitCamera {
    fn default() -> Self {
        PanOrbitCamera {
            home: Vec3::new(0.0, 0.0, 50.0),
            home_target: Vec3::ZERO,
            damping_factor: 0.05,
            min_distance: 10.0,
            max_distance: 100.0,
            enable_pan: true,
            enable_zoom: true,
            pan_sensitivity: 0.001,                 // 1000 pixels per world unit
            orbit_sensitivity: 0.2f32.to_radians(), // 0.2 degree per pixel
            zoom_sensitivity: 0.01,
            scroll_line_sensitivity: 16.0, // 1 "line" == 16 "pixels of motion"
            scroll_pixel_sensitivity: 1.0,
        }
    }
}

impl PanOrbitState {
    pub fn rotate(&mut self, delta: Vec2) {
        self.rotate_delta += delta;
    }

    pub fn pan(&mut self, delta: Vec3) {
        self.pan_offset += delta;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.zoom_scale *= factor;
    }

    pub fn is_settled(&self) -> bool {
        !self.needs_update
            && self.rotate_delta == Vec2::ZERO
            && self.pan_offset == Vec3::ZERO
            && self.zoom_scale == 1.0
    }

    /// Puts the camera back at its home position with no rotation, forgetting any pending motion
    /// and recentering the target.
    pub fn reset(&mut self, settings: &PanOrbitCamera, transform: &mut Transform) {
        *self = Self {
            target: settings.home_target,
            needs_update: false,
            ..default()
        };
        transform.translation = settings.home;
        transform.rotation = Quat::IDENTITY;
    }

    /// Applies one damped step of the pending motion to `transform`, clamps the distance to the
    /// target and aims the camera at it.
    pub fn update(&mut self, settings: &PanOrbitCamera, transform: &mut Transform) {
        self.needs_update = false;
        let damping = settings.damping_factor.clamp(f32::EPSILON, 1.0);

        let rotation = self.rotate_delta * damping;
        let mut offset = orbit_offset(transform.translation - self.target, rotation.x, rotation.y);

        let distance = offset.length();
        let zoom = if settings.enable_zoom {
            self.zoom_scale
        } else {
            1.0
        };
        let clamped = (distance * zoom).clamp(settings.min_distance, settings.max_distance);
        if distance <= f32::EPSILON {
            offset = Vec3::Z * clamped;
        } else if clamped != distance {
            offset *= clamped / distance;
        }

        if settings.enable_pan {
            let pan = self.pan_offset * damping;
            self.target += pan;
            self.pan_offset *= 1.0 - damping;
        } else {
            self.pan_offset = Vec3::ZERO;
        }

        transform.translation = self.target + offset;
        transform.look_at(self.target, Vec3::Y);

        self.rotate_delta *= 1.0 - damping;
        self.zoom_scale = 1.0;
        if self.rotate_delta.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON {
            self.rotate_delta = Vec2::ZERO;
        }
        if self.pan_offset.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON {
            self.pan_offset = Vec3::ZERO;
        }
    }
}

/// Rotates `offset` by `azimuth` around the vertical axis and by `polar` towards the south pole,
/// never letting it reach either pole.
pub fn orbit_offset(offset: Vec3, azimuth: f32, polar: f32) -> Vec3 {
    let radius = offset.length();
    if radius <= f32::EPSILON || (azimuth == 0.0 && polar == 0.0) {
        return offset;
    }
    let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
    let polar = (phi + polar).clamp(MIN_POLAR_ANGLE, PI - MIN_POLAR_ANGLE) - phi;
    let pitched = match Vec3::Y.cross(offset).try_normalize() {
        Some(axis) => Quat::from_axis_angle(axis, polar) * offset,
        None => offset,
    };
    Quat::from_rotation_y(azimuth) * pitched
}
