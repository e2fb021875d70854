pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::{resources::GameConfig, states::AppState};
use components::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        let max_slots = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default()
            .inventory
            .max_slots;

        app.insert_resource(Inventory::new(max_slots))
            .add_event::<GiveItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<DumpInventoryEvent>()
            .add_event::<InventoryChanged>()
            .add_systems(
                Update,
                (give_item, print_inventory, dump_inventory).run_if(in_state(AppState::InGame)),
            );
    }
}
