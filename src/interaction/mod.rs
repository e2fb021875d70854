pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use components::*;
use events::*;
use systems::*;

pub struct InteractionPlugin;
impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Target>()
            .init_resource::<InteractHint>()
            .add_event::<InteractEvent>()
            .add_event::<AimEvent>()
            .add_systems(
                Update,
                (aim_viewpoint, update_target, refresh_hint, dispatch_interact)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
