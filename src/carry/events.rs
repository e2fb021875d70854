use bevy::prelude::*;

/// 把物体拿到手上
#[derive(Event, Debug, Clone, Copy)]
pub struct PickUpEvent {
    pub entity: Entity,
    /// 从背包格拿出来时记下格子
    pub slot: Option<usize>,
}

/// 放下手上的物体
#[derive(Event, Debug, Clone, Copy)]
pub struct DropEvent {
    pub remove_from_inventory: bool,
}

/// 收起手上的物体（不改背包）
#[derive(Event, Debug, Clone, Copy)]
pub struct StowEvent;

/// 把地上的商品 / 箱子收进背包
#[derive(Event, Debug, Clone, Copy)]
pub struct CollectEvent {
    pub entity: Entity,
}

/// 选中背包格（快捷键 1~N）
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectSlotEvent {
    pub index: usize,
}
