use bevy::prelude::*;

/// Flags flipped from the keyboard and read by the animation every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource, Reflect)]
#[reflect(Resource)]
pub struct SceneState {
    pub running: bool,
    pub orbits_visible: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            running: true,
            orbits_visible: true,
        }
    }
}

impl SceneState {
    /// Returns the new value
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Returns the new value
    pub fn toggle_orbits(&mut self) -> bool {
        self.orbits_visible = !self.orbits_visible;
        self.orbits_visible
    }
}

pub fn animation_running(state: Res<SceneState>) -> bool {
    state.running
}
