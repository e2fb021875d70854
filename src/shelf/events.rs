use bevy::prelude::*;

/// 把手上的商品放上货架（拿着箱子时拆一个上架）
#[derive(Event, Debug, Clone, Copy)]
pub struct StoreOnShelf {
    pub shelf: Entity,
}

/// 空手从货架取下最后一个商品
#[derive(Event, Debug, Clone, Copy)]
pub struct TakeFromShelf {
    pub shelf: Entity,
}

/// 让 CLI 打印所有货架的库存
#[derive(Event)]
pub struct ListShelvesEvent;
