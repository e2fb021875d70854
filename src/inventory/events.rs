use bevy::prelude::*;

#[derive(Event)]
pub struct GiveItemEvent {
    pub id: String,
    pub count: u32,
}

/// 让 CLI 请求打印背包
#[derive(Event)]
pub struct ListInventoryEvent;

/// 以 JSON 输出背包快照
#[derive(Event)]
pub struct DumpInventoryEvent;

/// 背包内容变化（UI 刷新）
#[derive(Event, Debug, Clone, Copy)]
pub struct InventoryChanged;
