use bevy::prelude::*;

use super::resources::GameConfig;

/// 面向玩家的一行文字（CLI 打印 / UI 提示）
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

pub fn announce_config(mut writer: EventWriter<LogEvent>, config: Res<GameConfig>) {
    writer.write(LogEvent(format!(
        "商店模拟器启动：背包 {} 格，货架每种商品上限 {}",
        config.inventory.max_slots, config.shelf.capacity_per_item
    )));
}
