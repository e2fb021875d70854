//! 物品飞行动画：落地时结算，失败或取消时回滚

pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use crate::data::catalog::ItemDefinition;
use crate::scene::GhostBundle;
use components::*;
use events::*;
use systems::*;

pub struct TransferPlugin;
impl Plugin for TransferPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CancelTransfers>()
            .add_event::<TransferSettled>()
            .add_systems(
                Update,
                (advance_flights, cancel_transfers)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), cancel_on_exit);
    }
}

/// 生成一个从 from 飞到 to 的幽灵，返回幽灵实体
pub fn launch(
    commands: &mut Commands,
    def: &ItemDefinition,
    from: Vec3,
    to: Vec3,
    duration: f32,
    payload: TransferPayload,
) -> Entity {
    commands
        .spawn((
            GhostBundle::new(def, Transform::from_translation(from)),
            Flight::new(duration, from, to, payload),
        ))
        .id()
}
