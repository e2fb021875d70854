use bevy::prelude::*;

use super::physics::Bounds;
use crate::data::catalog::ItemId;

/// 场景里的一个物品实例（对象池管理）
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ItemInstance {
    pub item: ItemId,
    /// 箱子剩余的子物品数；普通商品不用
    pub interior_count: u32,
    /// 已归还对象池
    pub released: bool,
}

/// 轴对齐碰撞体，禁用后射线与重叠检测都忽略它
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec3,
    pub enabled: bool,
}

impl Collider {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            enabled: true,
        }
    }

    pub fn disabled(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            enabled: false,
        }
    }

    pub fn bounds(&self, transform: &Transform) -> Bounds {
        Bounds::oriented(transform, self.half_extents)
    }
}

/// 物理模拟开关（拿在手里 / 放上货架时关闭）
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub simulated: bool,
}

impl Body {
    pub const SIMULATED: Self = Self { simulated: true };
    pub const KINEMATIC: Self = Self { simulated: false };
}

/// 渲染外观：原材质 / 预览材质 / 被阻挡的预览材质
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Original,
    Preview,
    PreviewBlocked,
}

/// 玩家视点（摄像机），交互与摆放的射线都从这里发出
#[derive(Component)]
pub struct Viewpoint;

/// 手持挂点
#[derive(Component)]
pub struct HandAnchor;

/// 家具可以摆放的表面
#[derive(Component)]
pub struct PlacementSurface;

/// 会挡住家具摆放的物体
#[derive(Component)]
pub struct Blocking;

/// 货架上的一个展示位
#[derive(Component, Debug, Clone, Copy)]
pub struct ShelfAnchor {
    pub shelf: Entity,
    pub index: usize,
}

/// 预览用的幽灵物体
#[derive(Component)]
pub struct Ghost;
