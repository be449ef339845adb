use crate::body::AxialTilt;
use bevy::color::HexColorError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// An sRGB colour written as a `#rrggbb` string in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Srgba);

impl TryFrom<String> for HexColor {
    type Error = HexColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Srgba::hex(value).map(Self)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0.to_hex()
    }
}

impl From<HexColor> for Color {
    fn from(value: HexColor) -> Self {
        Color::Srgba(value.0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Component, Reflect)]
#[reflect(Component)]
#[serde(rename_all = "kebab-case")]
pub struct CameraConfig {
    /// Vertical field of view, in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Home position, also used by the reset key
    pub position: Vec3,
    #[serde(default)]
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
    #[serde(default = "enabled")]
    pub enable_pan: bool,
    #[serde(default = "enabled")]
    pub enable_zoom: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LightingConfig {
    pub ambient_color: HexColor,
    pub ambient_brightness: f32,
    pub point_color: HexColor,
    /// Luminous power, in lumens
    pub point_intensity: f32,
    pub point_range: f32,
    #[serde(default = "enabled")]
    pub shadows: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackgroundConfig {
    pub texture: String,
    pub radius: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BodyConfig {
    pub name: String,
    pub radius: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Radians per frame
    pub spin_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axial_tilt: Option<AxialTilt>,
    #[serde(default)]
    pub unlit: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EllipseConfig {
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    /// Radians per frame
    pub speed: f64,
    #[serde(default = "default_path_segments")]
    pub path_segments: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EpicycleConfig {
    pub radius: f64,
    /// Fraction of the parent group's translation the satellite is centered on
    pub parent_scale: f64,
    /// Radians per frame
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathConfig {
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    #[serde(default = "default_path_segments")]
    pub segments: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AtmosphereConfig {
    pub radius: f32,
    pub color: HexColor,
    pub opacity: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RingConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub opacity: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SatelliteConfig {
    #[serde(flatten)]
    pub body: BodyConfig,
    pub orbit: EpicycleConfig,
    /// Decorative outline drawn around the parent planet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanetConfig {
    #[serde(flatten)]
    pub body: BodyConfig,
    pub orbit: EllipseConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<AtmosphereConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring: Option<RingConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub satellites: Vec<SatelliteConfig>,
}

/// Every constant the scene is built from.
#[derive(Debug, Clone, Deserialize, Serialize, Resource)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundConfig>,
    pub sun: BodyConfig,
    pub planets: Vec<PlanetConfig>,
}

fn enabled() -> bool {
    true
}

fn default_path_segments() -> u32 {
    64
}
