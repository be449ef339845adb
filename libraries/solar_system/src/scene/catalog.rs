use crate::scene::error::CatalogError;
use crate::scene::manifest::{
    AtmosphereConfig, BodyConfig, CameraConfig, Catalog, EllipseConfig, LightingConfig,
    PathConfig, RingConfig, SatelliteConfig,
};
use std::fs;
use std::path::Path;

const BUILTIN: &str = include_str!("../../catalog/solar.system.yaml");

/// Fewest samples that still make a closed outline
const MIN_SEGMENTS: u32 = 3;

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self, CatalogError> {
        let catalog = serde_yaml::from_str::<Self>(data)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_camera(&self.camera)?;
        validate_lighting(&self.lighting)?;
        if let Some(background) = &self.background {
            positive("background.radius", background.radius)?;
            if background.radius >= self.camera.far {
                return Err(CatalogError::invalid(
                    "background.radius",
                    "must lie inside the camera far plane",
                ));
            }
        }
        validate_body("sun", &self.sun)?;
        for (i, planet) in self.planets.iter().enumerate() {
            let prefix = format!("planets[{i}]");
            validate_body(&prefix, &planet.body)?;
            validate_ellipse(&format!("{prefix}.orbit"), &planet.orbit)?;
            if let Some(atmosphere) = &planet.atmosphere {
                validate_atmosphere(&format!("{prefix}.atmosphere"), atmosphere)?;
            }
            if let Some(ring) = &planet.ring {
                validate_ring(&format!("{prefix}.ring"), ring)?;
            }
            for (j, satellite) in planet.satellites.iter().enumerate() {
                validate_satellite(&format!("{prefix}.satellites[{j}]"), satellite)?;
            }
        }
        Ok(())
    }

    /// Every texture the scene references, background first.
    pub fn texture_paths(&self) -> impl Iterator<Item = &str> {
        let background = self.background.iter().map(|b| b.texture.as_str());
        let sun = self.sun.texture.as_deref();
        let planets = self.planets.iter().flat_map(|planet| {
            let ring = planet.ring.as_ref().and_then(|ring| ring.texture.as_deref());
            let satellites = planet
                .satellites
                .iter()
                .filter_map(|satellite| satellite.body.texture.as_deref());
            planet.body.texture.as_deref().into_iter().chain(ring).chain(satellites)
        });
        background.chain(sun).chain(planets)
    }

    /// The sun, the planets and their satellites.
    pub fn body_count(&self) -> usize {
        1 + self
            .planets
            .iter()
            .map(|planet| 1 + planet.satellites.len())
            .sum::<usize>()
    }

    /// One path per planet, plus one per satellite that asks for it.
    pub fn orbit_path_count(&self) -> usize {
        self.planets
            .iter()
            .map(|planet| {
                1 + planet
                    .satellites
                    .iter()
                    .filter(|satellite| satellite.path.is_some())
                    .count()
            })
            .sum()
    }
}

fn positive<T: Into<f64>>(field: &str, value: T) -> Result<(), CatalogError> {
    // Written this way round so NaN is rejected too
    if !(value.into() > 0.0) {
        return Err(CatalogError::invalid(field, "must be positive"));
    }
    Ok(())
}

fn finite<T: Into<f64>>(field: &str, value: T) -> Result<(), CatalogError> {
    if !value.into().is_finite() {
        return Err(CatalogError::invalid(field, "must be a finite number"));
    }
    Ok(())
}

fn opacity(field: &str, value: f32) -> Result<(), CatalogError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CatalogError::invalid(field, "must be between 0 and 1"));
    }
    Ok(())
}

fn segments(field: &str, value: u32) -> Result<(), CatalogError> {
    if value < MIN_SEGMENTS {
        return Err(CatalogError::invalid(field, "needs at least 3 segments"));
    }
    Ok(())
}

fn validate_camera(camera: &CameraConfig) -> Result<(), CatalogError> {
    if !(camera.fov > 0.0 && camera.fov < 180.0) {
        return Err(CatalogError::invalid(
            "camera.fov",
            "must be between 0 and 180 degrees",
        ));
    }
    positive("camera.near", camera.near)?;
    if !(camera.far > camera.near) {
        return Err(CatalogError::invalid(
            "camera.far",
            "must be beyond the near plane",
        ));
    }
    positive("camera.min-distance", camera.min_distance)?;
    if !(camera.max_distance >= camera.min_distance) {
        return Err(CatalogError::invalid(
            "camera.max-distance",
            "must not be below min-distance",
        ));
    }
    if !(camera.damping > 0.0 && camera.damping <= 1.0) {
        return Err(CatalogError::invalid(
            "camera.damping",
            "must be in the range (0, 1]",
        ));
    }
    for (field, value) in [
        ("camera.position", camera.position),
        ("camera.target", camera.target),
    ] {
        if !value.is_finite() {
            return Err(CatalogError::invalid(field, "must be a finite vector"));
        }
    }
    if camera.position.distance(camera.target) < camera.min_distance {
        return Err(CatalogError::invalid(
            "camera.position",
            "must be at least min-distance away from the target",
        ));
    }
    Ok(())
}

fn validate_lighting(lighting: &LightingConfig) -> Result<(), CatalogError> {
    if !(lighting.ambient_brightness >= 0.0) {
        return Err(CatalogError::invalid(
            "lighting.ambient-brightness",
            "must not be negative",
        ));
    }
    if !(lighting.point_intensity >= 0.0) {
        return Err(CatalogError::invalid(
            "lighting.point-intensity",
            "must not be negative",
        ));
    }
    positive("lighting.point-range", lighting.point_range)
}

fn validate_body(prefix: &str, body: &BodyConfig) -> Result<(), CatalogError> {
    if body.name.trim().is_empty() {
        return Err(CatalogError::invalid(
            format!("{prefix}.name"),
            "must not be empty",
        ));
    }
    positive(&format!("{prefix}.radius"), body.radius)?;
    finite(&format!("{prefix}.spin-rate"), body.spin_rate)?;
    if let Some(tilt) = body.axial_tilt {
        finite(&format!("{prefix}.axial-tilt.degrees"), tilt.degrees)?;
    }
    Ok(())
}

fn validate_ellipse(prefix: &str, orbit: &EllipseConfig) -> Result<(), CatalogError> {
    positive(&format!("{prefix}.semi-major-axis"), orbit.semi_major_axis)?;
    positive(&format!("{prefix}.semi-minor-axis"), orbit.semi_minor_axis)?;
    finite(&format!("{prefix}.speed"), orbit.speed)?;
    segments(&format!("{prefix}.path-segments"), orbit.path_segments)
}

fn validate_path(prefix: &str, path: &PathConfig) -> Result<(), CatalogError> {
    positive(&format!("{prefix}.semi-major-axis"), path.semi_major_axis)?;
    positive(&format!("{prefix}.semi-minor-axis"), path.semi_minor_axis)?;
    segments(&format!("{prefix}.segments"), path.segments)
}

fn validate_atmosphere(prefix: &str, atmosphere: &AtmosphereConfig) -> Result<(), CatalogError> {
    positive(&format!("{prefix}.radius"), atmosphere.radius)?;
    opacity(&format!("{prefix}.opacity"), atmosphere.opacity)
}

fn validate_ring(prefix: &str, ring: &RingConfig) -> Result<(), CatalogError> {
    if !(ring.inner_radius >= 0.0) {
        return Err(CatalogError::invalid(
            format!("{prefix}.inner-radius"),
            "must not be negative",
        ));
    }
    if !(ring.outer_radius > ring.inner_radius) {
        return Err(CatalogError::invalid(
            format!("{prefix}.outer-radius"),
            "must be larger than inner-radius",
        ));
    }
    segments(&format!("{prefix}.segments"), ring.segments)?;
    opacity(&format!("{prefix}.opacity"), ring.opacity)
}

fn validate_satellite(prefix: &str, satellite: &SatelliteConfig) -> Result<(), CatalogError> {
    validate_body(prefix, &satellite.body)?;
    if !(satellite.orbit.radius >= 0.0) {
        return Err(CatalogError::invalid(
            format!("{prefix}.orbit.radius"),
            "must not be negative",
        ));
    }
    finite(&format!("{prefix}.orbit.parent-scale"), satellite.orbit.parent_scale)?;
    finite(&format!("{prefix}.orbit.speed"), satellite.orbit.speed)?;
    if let Some(path) = &satellite.path {
        validate_path(&format!("{prefix}.path"), path)?;
    }
    Ok(())
}
