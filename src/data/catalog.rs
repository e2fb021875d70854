use bevy::asset::ron;
use bevy::prelude::*;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::schema::{ItemEntry, ItemKind, ItemList};

/// 物品 ID：由字符串 id 生成的 v5 UUID，同一个 id 永远得到同一个值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn from_key(key: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxContent {
    pub item: ItemId,
    pub quantity: u32,
}

/// 校验过的物品定义，载入后不再变化
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub key: String,
    pub name: String,
    pub kind: ItemKind,
    pub stackable: bool,
    pub max_stack_size: u32,
    pub contents: Vec<BoxContent>,
    pub half_extents: Vec3,
}

impl ItemDefinition {
    /// 单格最多能叠多少
    pub fn stack_limit(&self) -> u32 {
        if self.stackable { self.max_stack_size } else { 1 }
    }

    /// 一整箱里的子物品总数
    pub fn box_capacity(&self) -> u32 {
        self.contents.iter().map(|c| c.quantity).sum()
    }

    pub fn is_box(&self) -> bool {
        self.kind == ItemKind::Box
    }

    /// 拆箱时取出的子物品
    pub fn first_content(&self) -> Option<ItemId> {
        self.contents.first().map(|c| c.item)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("duplicate item id `{0}`")]
    Duplicate(String),
    #[error("item `{0}` has a max stack of zero")]
    ZeroStack(String),
    #[error("item `{0}` is not a box but lists contents")]
    ContentsOnNonBox(String),
    #[error("box `{0}` has no contents")]
    EmptyBox(String),
    #[error("box `{owner}` refers to unknown item `{item}`")]
    UnknownContent { owner: String, item: String },
    #[error("box `{owner}` contains another box `{item}`")]
    NestedBox { owner: String, item: String },
    #[error("item `{0}` has non-positive extents")]
    BadExtents(String),
}

/// 全部物品定义（载入完成后插入为 Resource）
#[derive(Resource, Debug, Default)]
pub struct Catalog {
    items: HashMap<ItemId, ItemDefinition>,
    order: Vec<ItemId>,
}

impl Catalog {
    pub fn from_ron_str(s: &str) -> Result<Self, CatalogError> {
        let list: ItemList = ron::de::from_str(s)?;
        Self::from_list(&list)
    }

    pub fn from_list(list: &ItemList) -> Result<Self, CatalogError> {
        let kinds: HashMap<&str, ItemKind> =
            list.items.iter().map(|e| (e.id.as_str(), e.kind)).collect();

        let mut catalog = Catalog::default();
        for entry in &list.items {
            let def = validate(entry, &kinds)?;
            if catalog.items.contains_key(&def.id) {
                return Err(CatalogError::Duplicate(entry.id.clone()));
            }
            catalog.order.push(def.id);
            catalog.items.insert(def.id, def);
        }
        Ok(catalog)
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }

    pub fn by_key(&self, key: &str) -> Option<&ItemDefinition> {
        self.get(ItemId::from_key(key))
    }

    /// 用 id / 名称 / uuid 查找（忽略大小写）
    pub fn find(&self, token: &str) -> Option<&ItemDefinition> {
        let token = token.to_lowercase();
        self.iter().find(|d| {
            d.key.eq_ignore_ascii_case(&token)
                || d.name.eq_ignore_ascii_case(&token)
                || d.id.to_string() == token
        })
    }

    /// 按 items.ron 里的顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn validate(
    entry: &ItemEntry,
    kinds: &HashMap<&str, ItemKind>,
) -> Result<ItemDefinition, CatalogError> {
    if entry.max_stack == 0 {
        return Err(CatalogError::ZeroStack(entry.id.clone()));
    }

    let (hx, hy, hz) = entry.half_extents;
    if hx <= 0.0 || hy <= 0.0 || hz <= 0.0 {
        return Err(CatalogError::BadExtents(entry.id.clone()));
    }

    match entry.kind {
        ItemKind::Box if entry.contents.iter().all(|c| c.quantity == 0) => {
            return Err(CatalogError::EmptyBox(entry.id.clone()));
        }
        ItemKind::Box => {}
        _ if !entry.contents.is_empty() => {
            return Err(CatalogError::ContentsOnNonBox(entry.id.clone()));
        }
        _ => {}
    }

    let mut contents = Vec::with_capacity(entry.contents.len());
    for content in &entry.contents {
        match kinds.get(content.item.as_str()) {
            None => {
                return Err(CatalogError::UnknownContent {
                    owner: entry.id.clone(),
                    item: content.item.clone(),
                });
            }
            Some(ItemKind::Box) => {
                return Err(CatalogError::NestedBox {
                    owner: entry.id.clone(),
                    item: content.item.clone(),
                });
            }
            Some(_) => contents.push(BoxContent {
                item: ItemId::from_key(&content.item),
                quantity: content.quantity,
            }),
        }
    }

    Ok(ItemDefinition {
        id: ItemId::from_key(&entry.id),
        key: entry.id.clone(),
        name: entry.name.clone(),
        kind: entry.kind,
        stackable: entry.stackable,
        max_stack_size: entry.max_stack,
        contents,
        half_extents: Vec3::new(hx, hy, hz),
    })
}
