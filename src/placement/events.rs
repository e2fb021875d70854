use bevy::prelude::*;

use crate::data::catalog::ItemId;

/// 开始摆放；source 为场景里已有的物体，None 表示从背包生成
#[derive(Event, Debug, Clone, Copy)]
pub struct BeginPlacement {
    pub item: ItemId,
    pub source: Option<Entity>,
}

/// 滚轮量，乘以配置里的旋转速度
#[derive(Event, Debug, Clone, Copy)]
pub struct RotatePreview {
    pub delta: f32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ConfirmPlacement;

#[derive(Event, Debug, Clone, Copy)]
pub struct CancelPlacement;

/// 摆放已确认
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlacementCommitted {
    pub item: ItemId,
    pub pose: Transform,
    pub source: Option<Entity>,
}
