use bevy::prelude::*;
use serde_derive::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 全局配置（config/game.toml），每一节都有默认值
#[derive(Resource, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub inventory: InventoryConfig,
    pub shelf: ShelfConfig,
    pub interaction: InteractionConfig,
    pub placement: PlacementConfig,
    pub transfer: TransferConfig,
    pub pool: PoolConfig,
    pub data: DataConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InventoryConfig {
    pub max_slots: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self { max_slots: 7 }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShelfConfig {
    pub capacity_per_item: u32,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            capacity_per_item: 20,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// 交互射线长度
    pub range: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { range: 3.0 }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    /// 摆放射线长度
    pub range: f32,
    /// 每单位滚轮旋转的角度
    pub rotate_speed: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            range: 10.0,
            rotate_speed: 100.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TransferConfig {
    /// 飞行动画时长（秒）
    pub fly_duration: f32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { fly_duration: 0.5 }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    pub max_free_per_item: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_free_per_item: 100,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// 相对 assets/ 的物品表路径
    pub items_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            items_path: "data/items.ron".into(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// 读不到或解析失败都退回默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("配置已载入: {}", path.display());
                config
            }
            Err(err) => {
                warn!("使用默认配置（{}）: {err}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [inventory]
            max_slots = 3

            [placement]
            rotate_speed = 45.0
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.max_slots, 3);
        assert_eq!(config.placement.rotate_speed, 45.0);
        assert_eq!(config.placement.range, 10.0);
        assert_eq!(config.shelf.capacity_per_item, 20);
        assert_eq!(config.data.items_path, "data/items.ron");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let err = GameConfig::from_toml_str("[inventory\nmax_slots = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_falls_back() {
        let config = GameConfig::load_or_default("does/not/exist.toml");
        assert_eq!(config, GameConfig::default());
    }
}
