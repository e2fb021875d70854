use bevy::asset::{io::Reader, ron, AssetLoader, LoadContext};
use bevy::log::debug;
use std::future::Future;
use thiserror::Error;

use super::schema::ItemList;

/// items.ron -> ItemList，只检查语法和是否为空；字段校验交给 Catalog
#[derive(Default)]
pub struct ItemListLoader;

#[derive(Debug, Error)]
pub enum ItemListLoaderError {
    #[error("Could not read item table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Item table is not valid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Item table {0} has no entries")]
    Empty(String),
}

impl AssetLoader for ItemListLoader {
    type Asset = ItemList;
    type Settings = ();
    type Error = ItemListLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            let path = load_context.path().display().to_string();
            let list: ItemList = ron::de::from_bytes(&bytes)?;
            if list.items.is_empty() {
                return Err(ItemListLoaderError::Empty(path));
            }

            debug!("{path}: 读到 {} 条物品", list.items.len());
            Ok(list)
        }
    }
}
