use bevy::prelude::*;
use thiserror::Error;

use crate::data::catalog::ItemId;

/// 飞行结束时要结算的内容，失败时按它回滚
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferPayload {
    /// 地上的物体飞进手里，结算时放进背包
    Collect {
        object: Entity,
        item: ItemId,
        interior: u32,
    },
    /// 手上的商品飞上货架
    Stock { shelf: Entity, item: ItemId },
    /// 从手上的箱子里拆一个上架
    Unpack {
        shelf: Entity,
        box_entity: Entity,
        box_item: ItemId,
        sub_item: ItemId,
    },
    /// 货架上的商品飞回手里
    Take {
        shelf: Entity,
        item: ItemId,
        slot: usize,
        object: Entity,
    },
}

impl TransferPayload {
    pub fn shelf(&self) -> Option<Entity> {
        match self {
            Self::Collect { .. } => None,
            Self::Stock { shelf, .. } | Self::Unpack { shelf, .. } | Self::Take { shelf, .. } => {
                Some(*shelf)
            }
        }
    }

    /// 正在飞的那件物品
    pub fn item(&self) -> ItemId {
        match self {
            Self::Collect { item, .. } | Self::Stock { item, .. } | Self::Take { item, .. } => *item,
            Self::Unpack { sub_item, .. } => *sub_item,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransferError {
    #[error("inventory has no room for {0}")]
    InventoryFull(String),
    #[error("{0} is not in the inventory")]
    NotInInventory(String),
    #[error("shelf {0:?} no longer exists")]
    MissingShelf(Entity),
    #[error("no free slot on the shelf")]
    ShelfFull,
    #[error("shelf stock of {0} is at capacity")]
    StockFull(String),
    #[error("item {0} is not registered")]
    UnknownItem(ItemId),
    #[error("transfer was cancelled")]
    Cancelled,
}

/// 挂在飞行幽灵上的任务
#[derive(Component, Debug)]
pub struct Flight {
    pub timer: Timer,
    pub from: Vec3,
    pub to: Vec3,
    pub payload: TransferPayload,
}

impl Flight {
    pub fn new(duration: f32, from: Vec3, to: Vec3, payload: TransferPayload) -> Self {
        Self {
            timer: Timer::from_seconds(duration.max(0.0), TimerMode::Once),
            from,
            to,
            payload,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.from.lerp(self.to, ease_out_quad(self.timer.fraction()))
    }
}

pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
