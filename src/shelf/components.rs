use bevy::prelude::*;
use std::collections::HashMap;

use crate::data::catalog::ItemId;

/// 货架：库存计数（数据）和展示位（实物）分开记账
#[derive(Component, Debug, Clone)]
pub struct Shelf {
    capacity_per_item: u32,
    stock: HashMap<ItemId, u32>,
    /// 每个展示位的挂点实体
    anchors: Vec<Entity>,
    /// 展示位上的物品实例
    occupants: Vec<Option<Entity>>,
    /// 有物品正在飞向 / 飞离这个货架
    busy: bool,
}

impl Shelf {
    pub fn new(capacity_per_item: u32, anchors: Vec<Entity>) -> Self {
        Self {
            capacity_per_item,
            stock: HashMap::new(),
            occupants: vec![None; anchors.len()],
            anchors,
            busy: false,
        }
    }

    pub fn capacity_per_item(&self) -> u32 {
        self.capacity_per_item
    }

    pub fn stock(&self, item: ItemId) -> u32 {
        self.stock.get(&item).copied().unwrap_or(0)
    }

    pub fn stock_entries(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.stock.iter().map(|(id, count)| (*id, *count))
    }

    /// 返回实际加上的数量（超出上限的部分被截掉）
    pub fn add_stock(&mut self, item: ItemId, quantity: u32) -> u32 {
        let current = self.stock(item);
        let added = quantity.min(self.capacity_per_item.saturating_sub(current));
        if added > 0 {
            self.stock.insert(item, current + added);
        }
        added
    }

    /// 返回实际取走的数量，归零时删除该条目
    pub fn remove_stock(&mut self, item: ItemId, quantity: u32) -> u32 {
        let Some(current) = self.stock.get_mut(&item) else {
            return 0;
        };
        let removed = quantity.min(*current);
        *current -= removed;
        if *current == 0 {
            self.stock.remove(&item);
        }
        removed
    }

    /// 放到第一个空位，返回位置下标
    pub fn place_physical_item(&mut self, entity: Entity) -> Option<usize> {
        let index = self.next_free_slot_index()?;
        self.occupants[index] = Some(entity);
        Some(index)
    }

    /// 放回指定位置（回滚时用）
    pub fn place_physical_item_at(&mut self, index: usize, entity: Entity) -> bool {
        match self.occupants.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(entity);
                true
            }
            _ => false,
        }
    }

    pub fn remove_physical_item(&mut self, entity: Entity) -> Option<usize> {
        let index = self.occupants.iter().position(|o| *o == Some(entity))?;
        self.occupants[index] = None;
        Some(index)
    }

    pub fn next_free_slot_index(&self) -> Option<usize> {
        self.occupants.iter().position(Option::is_none)
    }

    pub fn has_empty_slot(&self) -> bool {
        self.next_free_slot_index().is_some()
    }

    pub fn free_slots(&self) -> usize {
        self.occupants.iter().filter(|o| o.is_none()).count()
    }

    pub fn slot_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn anchor(&self, index: usize) -> Option<Entity> {
        self.anchors.get(index).copied()
    }

    pub fn occupant(&self, index: usize) -> Option<Entity> {
        self.occupants.get(index).copied().flatten()
    }

    /// 取货时从最后一个有货的位置拿
    pub fn last_occupied(&self) -> Option<(usize, Entity)> {
        self.occupants
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, o)| o.map(|e| (i, e)))
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

/// 当前显示在货架上的预览物体
#[derive(Resource, Debug, Default)]
pub struct ShelfPreview {
    pub current: Option<PreviewGhost>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewGhost {
    pub ghost: Entity,
    pub shelf: Entity,
    pub item: ItemId,
    pub slot: usize,
}
