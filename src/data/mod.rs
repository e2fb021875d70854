pub mod catalog;
pub mod loader;
pub mod schema;

use bevy::asset::LoadState;
use bevy::prelude::*;
use schema::ItemList;

use crate::core::{resources::GameConfig, states::AppState};
use catalog::Catalog;

/// 物品表句柄和加载进度
#[derive(Resource, Default)]
pub struct ItemAssets {
    pub handle: Option<Handle<ItemList>>,
    /// 加载或校验失败后不再重复报错
    failed: bool,
}

pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ItemList>()
            .register_asset_loader(loader::ItemListLoader)
            .init_resource::<ItemAssets>()
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loaded.run_if(in_state(AppState::Loading)));
    }
}

fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    info!("加载物品表 {}", config.data.items_path);
    item_assets.handle = Some(asset_server.load(config.data.items_path.clone()));
}

/// 物品表就绪后建 Catalog 并进入 InGame
fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
    lists: Res<Assets<ItemList>>,
) {
    if item_assets.failed {
        return;
    }
    let Some(handle) = item_assets.handle.clone() else {
        return;
    };

    let Some(list) = lists.get(&handle) else {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
            error!("物品表加载失败: {err}");
            item_assets.failed = true;
        }
        return;
    };

    match Catalog::from_list(list) {
        Ok(catalog) => {
            info!("✔ Items loaded: {}", catalog.len());
            commands.insert_resource(catalog);
            next.set(AppState::InGame);
        }
        Err(err) => {
            // 物品表本身有错，停在 Loading
            error!("物品表校验失败: {err}");
            item_assets.failed = true;
        }
    }
}
