use bevy::prelude::*;

use crate::data::{
    catalog::{Catalog, ItemDefinition, ItemId},
    schema::ItemKind,
};
use crate::shelf::components::Shelf;

/// 场景里能按 E 交互的东西
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactable {
    /// 地上的商品 / 箱子（家具也可以直接拿起来摆）
    Pickup { item: ItemId },
    Shelf,
    Furniture { item: ItemId },
}

/// 视线对准的可交互物体
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub entity: Option<Entity>,
}

/// 屏幕上的交互提示
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct InteractHint(pub String);

/// 生成提示文字 / 预览时需要的上下文
pub struct InteractContext<'a> {
    pub catalog: &'a Catalog,
    /// 手里拿着的物品定义
    pub held: Option<&'a ItemDefinition>,
    /// 手里箱子的剩余数量
    pub held_interior: u32,
    /// 目标是货架时的货架数据
    pub shelf: Option<&'a Shelf>,
}

impl Interactable {
    pub fn for_definition(def: &ItemDefinition) -> Self {
        match def.kind {
            ItemKind::Furniture => Self::Furniture { item: def.id },
            ItemKind::ShopItem | ItemKind::Box => Self::Pickup { item: def.id },
        }
    }

    pub fn interact_text(&self, ctx: &InteractContext) -> String {
        let name_of = |id: ItemId| {
            ctx.catalog
                .get(id)
                .map_or_else(|| "未知物品".to_string(), |d| d.name.clone())
        };

        match self {
            Self::Pickup { item } => match ctx.catalog.get(*item).map(|d| d.kind) {
                Some(ItemKind::Furniture) => format!("按 E 摆放 {}", name_of(*item)),
                _ => format!("按 E 拾取 {}", name_of(*item)),
            },
            Self::Furniture { item } => format!("按 E 摆放 {}", name_of(*item)),
            Self::Shelf => {
                let Some(shelf) = ctx.shelf else {
                    return "货架".into();
                };
                match ctx.held {
                    None if shelf.last_occupied().is_some() => "按 E 从货架取下商品".into(),
                    None => "货架是空的".into(),
                    Some(def) => match def.kind {
                        ItemKind::Furniture => "家具不能放上货架".into(),
                        _ if !shelf.has_empty_slot() => "货架已满".into(),
                        ItemKind::ShopItem => format!("按 E 将 {} 放上货架", def.name),
                        ItemKind::Box if ctx.held_interior == 0 => "箱子已经空了".into(),
                        ItemKind::Box => match def.first_content() {
                            Some(sub) => format!("按 E 拆箱上架 {}", name_of(sub)),
                            None => "箱子已经空了".into(),
                        },
                    },
                }
            }
        }
    }

    /// 要在货架上预览的物品（只有货架有预览）
    pub fn preview_item(&self, ctx: &InteractContext) -> Option<ItemId> {
        let Self::Shelf = self else {
            return None;
        };
        let def = ctx.held?;
        if !ctx.shelf?.has_empty_slot() {
            return None;
        }

        match def.kind {
            ItemKind::ShopItem => Some(def.id),
            ItemKind::Box if ctx.held_interior > 0 => def.first_content(),
            _ => None,
        }
    }

    /// 预览物体的世界位姿：货架下一个空位的挂点
    pub fn preview_transform(
        &self,
        shelf: Option<&Shelf>,
        anchor_pose: impl Fn(Entity) -> Option<Transform>,
    ) -> Option<Transform> {
        let Self::Shelf = self else {
            return None;
        };
        let shelf = shelf?;
        let anchor = shelf.anchor(shelf.next_free_slot_index()?)?;
        anchor_pose(anchor)
    }
}
