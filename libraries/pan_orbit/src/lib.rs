use bevy::prelude::*;

pub mod components;
mod systems;

pub use systems::{get_blocked_inputs, BlockedInputs};

/// Mouse accumulation followed by the damped camera update. The update set can be gated on its
/// own; pending motion then waits until it runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum PanOrbitSet {
    Input,
    Update,
}

#[derive(Default)]
pub struct PanOrbitCameraPlugin;

impl Plugin for PanOrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::PanOrbitState>()
            .register_type::<components::PanOrbitCamera>()
            .configure_sets(Update, (PanOrbitSet::Input, PanOrbitSet::Update).chain())
            .add_systems(
                Update,
                (
                    systems::get_blocked_inputs
                        .pipe(systems::pan_orbit_input)
                        .in_set(PanOrbitSet::Input),
                    systems::update_pan_orbit.in_set(PanOrbitSet::Update),
                )
                    .run_if(any_with_component::<components::PanOrbitCamera>),
            );
    }
}
