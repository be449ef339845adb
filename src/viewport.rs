use bevy::prelude::*;
use bevy::window::WindowResized;
use solar_system::scene::SceneCamera;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, on_viewport_resized);
    }
}

/// Keeps the scene camera's aspect ratio in step with the window. The surface itself is resized by
/// the window backend.
///
/// Bevy's `camera_system` also recomputes the projection from the render target in `PostUpdate`.
/// That pass is the one the renderer sees; this one makes the new ratio visible to `Update`
/// systems in the frame of the resize and writes the same W/H value, so the two never disagree.
/// Both skip zero-size windows.
fn on_viewport_resized(
    mut evr_resized: EventReader<WindowResized>,
    mut q_camera: Query<&mut Projection, With<SceneCamera>>,
) {
    // Only the latest size matters
    let Some(ev) = evr_resized.read().last() else {
        return;
    };
    if ev.width <= 0.0 || ev.height <= 0.0 {
        debug!("Ignoring resize to {}x{}", ev.width, ev.height);
        return;
    }
    let aspect_ratio = ev.width / ev.height;
    for mut projection in &mut q_camera {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect_ratio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, Entity) {
        let mut app = App::new();
        app.add_event::<WindowResized>().add_plugins(ViewportPlugin);
        let camera = app
            .world_mut()
            .spawn((
                SceneCamera,
                Projection::Perspective(PerspectiveProjection::default()),
            ))
            .id();
        (app, camera)
    }

    fn resize(app: &mut App, width: f32, height: f32) {
        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width,
            height,
        });
        app.update();
    }

    fn aspect_ratio(app: &App, camera: Entity) -> f32 {
        match app.world().get::<Projection>(camera).unwrap() {
            Projection::Perspective(perspective) => perspective.aspect_ratio,
            Projection::Orthographic(_) => panic!("scene camera must stay perspective"),
        }
    }

    #[test]
    fn aspect_ratio_follows_the_window() {
        let (mut app, camera) = app();
        for (width, height) in [(1280.0, 720.0), (800.0, 600.0), (333.0, 1000.0)] {
            resize(&mut app, width, height);
            assert_eq!(aspect_ratio(&app, camera), width / height);
        }
    }

    #[test]
    fn repeated_resizes_are_idempotent() {
        let (mut app, camera) = app();
        resize(&mut app, 1920.0, 1080.0);
        resize(&mut app, 1920.0, 1080.0);
        assert_eq!(aspect_ratio(&app, camera), 1920.0 / 1080.0);
    }

    #[test]
    fn ratio_matches_the_engine_projection_update() {
        use bevy::render::camera::CameraProjection;

        let (mut app, camera) = app();
        for (width, height) in [(1280.0, 720.0), (333.0, 1000.0)] {
            resize(&mut app, width, height);
            let mut engine = PerspectiveProjection::default();
            engine.update(width, height);
            assert_eq!(aspect_ratio(&app, camera), engine.aspect_ratio);
        }
    }

    #[test]
    fn minimised_window_is_ignored() {
        let (mut app, camera) = app();
        resize(&mut app, 1024.0, 512.0);
        resize(&mut app, 1024.0, 0.0);
        assert_eq!(aspect_ratio(&app, camera), 2.0);
    }
}
