pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use components::*;
use events::*;
use systems::*;

pub struct CarryPlugin;
impl Plugin for CarryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CarrySlot>()
            .add_event::<PickUpEvent>()
            .add_event::<DropEvent>()
            .add_event::<StowEvent>()
            .add_event::<CollectEvent>()
            .add_event::<SelectSlotEvent>()
            .add_systems(
                Update,
                (select_slot, pick_up, drop_held, stow_held, collect)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
