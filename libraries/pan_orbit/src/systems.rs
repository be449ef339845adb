use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContext;

use crate::components::{PanOrbitCamera, PanOrbitState};

/// Which input devices are currently captured by an egui widget.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockedInputs {
    pub pointer: bool,
    pub keyboard: bool,
}

pub fn get_blocked_inputs(mut q_egui: Query<&mut EguiContext>) -> BlockedInputs {
    let mut ret = BlockedInputs::default();
    for mut egui in &mut q_egui {
        let ctx = egui.get_mut();
        ret.pointer |= ctx.wants_pointer_input();
        ret.keyboard |= ctx.wants_keyboard_input();
    }
    ret
}

pub(crate) fn pan_orbit_input(
    In(blocked_inputs): In<BlockedInputs>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut evr_motion: EventReader<MouseMotion>,
    mut evr_scroll: EventReader<MouseWheel>,
    mut q_camera: Query<(&PanOrbitCamera, &mut PanOrbitState, &Transform)>,
) {
    if blocked_inputs.pointer {
        evr_motion.clear();
        evr_scroll.clear();
        return;
    }

    // First, accumulate the total amount of
    // mouse motion and scroll, from all pending events:
    let mut total_motion: Vec2 = evr_motion.read().map(|ev| ev.delta).sum();

    // Reverse Y (Bevy's Worldspace coordinate system is Y-Up,
    // but events are in window/ui coordinates, which are Y-Down)
    total_motion.y = -total_motion.y;

    let mut total_scroll_lines = Vec2::ZERO;
    let mut total_scroll_pixels = Vec2::ZERO;
    for ev in evr_scroll.read() {
        match ev.unit {
            MouseScrollUnit::Line => {
                total_scroll_lines.x += ev.x;
                total_scroll_lines.y -= ev.y;
            }
            MouseScrollUnit::Pixel => {
                total_scroll_pixels.x += ev.x;
                total_scroll_pixels.y -= ev.y;
            }
        }
    }

    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let panning = mouse_buttons.pressed(MouseButton::Right)
        || (mouse_buttons.pressed(MouseButton::Left) && shift);
    let orbiting = mouse_buttons.pressed(MouseButton::Left) && !shift;

    for (settings, mut state, transform) in &mut q_camera {
        if total_motion != Vec2::ZERO {
            if panning && settings.enable_pan {
                // Scale with the distance so panning feels the same at any zoom level
                let distance = (transform.translation - state.target).length();
                let pan = -total_motion * settings.pan_sensitivity * distance;
                let offset = transform.right() * pan.x + transform.up() * pan.y;
                state.pan(offset);
            } else if orbiting {
                // Dragging right swings the camera left around the target, dragging up lowers it
                state.rotate(Vec2::new(
                    -total_motion.x * settings.orbit_sensitivity,
                    total_motion.y * settings.orbit_sensitivity,
                ));
            }
        }

        let mut total_zoom = Vec2::ZERO;
        total_zoom -=
            total_scroll_lines * settings.scroll_line_sensitivity * settings.zoom_sensitivity;
        total_zoom -=
            total_scroll_pixels * settings.scroll_pixel_sensitivity * settings.zoom_sensitivity;
        if settings.enable_zoom && total_zoom.y != 0.0 {
            // in order for zoom to feel intuitive,
            // everything needs to be exponential
            state.zoom((-total_zoom.y).exp());
        }
    }
}

pub(crate) fn update_pan_orbit(
    mut q_camera: Query<(&PanOrbitCamera, &mut PanOrbitState, &mut Transform)>,
) {
    for (settings, mut state, mut transform) in &mut q_camera {
        if state.is_settled() {
            continue;
        }
        state.update(settings, &mut transform);
    }
}
