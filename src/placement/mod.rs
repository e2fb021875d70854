//! 家具摆放：Idle → Previewing → 确认 / 取消 → Idle

pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use components::*;
use events::*;
use systems::*;

pub struct PlacementPlugin;
impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementManager>()
            .add_event::<BeginPlacement>()
            .add_event::<RotatePreview>()
            .add_event::<ConfirmPlacement>()
            .add_event::<CancelPlacement>()
            .add_event::<PlacementCommitted>()
            .add_systems(
                Update,
                (
                    begin_placement,
                    rotate_preview,
                    update_preview,
                    confirm_placement,
                    cancel_placement,
                    spawn_committed,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), cancel_on_exit);
    }
}
