//! 物品对象池：按物品 ID 复用实例

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::core::resources::GameConfig;
use crate::data::catalog::{Catalog, ItemId};
use crate::scene::{components::*, ItemBundle};

pub struct PoolPlugin;
impl Plugin for PoolPlugin {
    fn build(&self, app: &mut App) {
        let max_free = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default()
            .pool
            .max_free_per_item;
        app.insert_resource(ItemPool::new(max_free));
    }
}

/// 每种物品一条空闲列表
#[derive(Resource, Debug)]
pub struct ItemPool {
    free: HashMap<ItemId, Vec<Entity>>,
    max_free_per_item: usize,
}

impl ItemPool {
    pub fn new(max_free_per_item: usize) -> Self {
        Self {
            free: HashMap::new(),
            max_free_per_item,
        }
    }

    pub fn take_free(&mut self, item: ItemId) -> Option<Entity> {
        self.free.get_mut(&item)?.pop()
    }

    /// 列表满了返回 false，调用方负责销毁
    pub fn put_back(&mut self, item: ItemId, entity: Entity) -> bool {
        let list = self.free.entry(item).or_default();
        if list.len() >= self.max_free_per_item {
            return false;
        }
        list.push(entity);
        true
    }

    pub fn free_count(&self, item: ItemId) -> usize {
        self.free.get(&item).map_or(0, Vec::len)
    }
}

/// 生成 / 归还物品实例
#[derive(SystemParam)]
pub struct ItemSpawner<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub pool: ResMut<'w, ItemPool>,
    pub catalog: Res<'w, Catalog>,
}

impl ItemSpawner<'_, '_> {
    pub fn spawn(&mut self, item: ItemId, transform: Transform) -> Option<Entity> {
        let Some(def) = self.catalog.get(item) else {
            error!("物品 {item} 没有注册，无法生成");
            return None;
        };

        while let Some(entity) = self.pool.take_free(item) {
            // 池里的实体可能已被外部销毁
            if let Ok(mut reused) = self.commands.get_entity(entity) {
                reused.insert(ItemBundle::new(def, transform));
                return Some(entity);
            }
        }

        Some(self.commands.spawn(ItemBundle::new(def, transform)).id())
    }

    /// 靠 released 标记防止同一实例被归还两次
    pub fn release(&mut self, entity: Entity, instance: &mut ItemInstance) {
        if instance.released {
            warn!("{entity:?} 已经归还过对象池");
            return;
        }
        instance.released = true;

        let Some(def) = self.catalog.get(instance.item) else {
            self.commands.entity(entity).despawn();
            return;
        };

        if self.pool.put_back(instance.item, entity) {
            self.commands.entity(entity).remove::<ChildOf>().insert((
                Visibility::Hidden,
                Collider::disabled(def.half_extents),
                Body::KINEMATIC,
            ));
        } else {
            self.commands.entity(entity).despawn();
        }
    }
}
