use bevy::asset::AssetLoadFailedEvent;
use bevy::prelude::*;

/// Keeps the scene drawable when a texture is missing: the affected materials drop the texture
/// and render with their base colour instead.
pub struct TextureFallbackPlugin;

impl Plugin for TextureFallbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, strip_failed_textures);
    }
}

fn strip_failed_textures(
    mut evr_failed: EventReader<AssetLoadFailedEvent<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for ev in evr_failed.read() {
        let stripped = strip_texture(&mut materials, ev.id);
        warn!(
            "Cannot load texture {}: {}. {stripped} material(s) fall back to their base colour",
            ev.path, ev.error
        );
    }
}

/// Removes `image` from every material using it as base colour texture. Returns how many
/// materials were changed.
pub fn strip_texture(materials: &mut Assets<StandardMaterial>, image: AssetId<Image>) -> usize {
    let mut stripped = 0;
    for (_, material) in materials.iter_mut() {
        let uses_image = material
            .base_color_texture
            .as_ref()
            .is_some_and(|texture| texture.id() == image);
        if uses_image {
            material.base_color_texture = None;
            stripped += 1;
        }
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARTH: Handle<Image> = Handle::weak_from_u128(0x6561_7274_6800);
    const MOON: Handle<Image> = Handle::weak_from_u128(0x6d6f_6f6e_0000);

    #[test]
    fn only_materials_using_the_failed_texture_are_stripped() {
        let mut materials = Assets::<StandardMaterial>::default();
        let blue = Color::srgb(0.1, 0.2, 0.9);
        let earth = materials.add(StandardMaterial {
            base_color: blue,
            base_color_texture: Some(EARTH),
            ..default()
        });
        let moon = materials.add(StandardMaterial {
            base_color_texture: Some(MOON),
            ..default()
        });
        let atmosphere = materials.add(StandardMaterial::from(blue));

        assert_eq!(strip_texture(&mut materials, EARTH.id()), 1);

        let earth = materials.get(&earth).unwrap();
        assert!(earth.base_color_texture.is_none());
        assert_eq!(earth.base_color, blue);
        assert_eq!(materials.get(&moon).unwrap().base_color_texture, Some(MOON));
        assert!(materials.get(&atmosphere).unwrap().base_color_texture.is_none());

        // Nothing left to strip
        assert_eq!(strip_texture(&mut materials, EARTH.id()), 0);
    }
}
