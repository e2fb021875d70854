use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde_derive::Deserialize;

/// 物品大类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ItemKind {
    ShopItem,
    Box,
    Furniture,
}

/// 箱子里装的一种子物品
#[derive(Debug, Clone, Deserialize)]
pub struct BoxEntry {
    pub item: String,
    pub quantity: u32,
}

/// items.ron 中的一条
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default)]
    pub contents: Vec<BoxEntry>,
    /// 预制体包围盒半尺寸
    #[serde(default = "default_half_extents")]
    pub half_extents: (f32, f32, f32),
}

fn default_max_stack() -> u32 {
    1
}

fn default_half_extents() -> (f32, f32, f32) {
    (0.25, 0.25, 0.25)
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemEntry>,
}
