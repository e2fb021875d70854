//! 第一人称商店模拟的玩法逻辑：拾取、手持、上架、背包和家具摆放

use bevy::prelude::*;

pub mod carry;
pub mod core;
pub mod data;
pub mod interaction;
pub mod interface;
pub mod inventory;
pub mod placement;
pub mod pool;
pub mod scene;
pub mod shelf;
pub mod transfer;

/// 全部玩法插件；需要先加 StatesPlugin（DefaultPlugins 已包含）
pub struct ShopPlugin;
impl Plugin for ShopPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            core::CorePlugin,
            pool::PoolPlugin,
            inventory::InventoryPlugin,
            carry::CarryPlugin,
            shelf::ShelfPlugin,
            placement::PlacementPlugin,
            transfer::TransferPlugin,
            interaction::InteractionPlugin,
        ));
    }
}
