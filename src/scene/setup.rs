//! 二进制用的示例商店：地面、一个货架、几件商品和一把椅子

use bevy::prelude::*;

use super::{ItemBundle, components::*, spawn_player};
use crate::core::states::AppState;
use crate::data::catalog::{Catalog, ItemDefinition};
use crate::shelf::spawn_shelf;

pub struct DemoShopPlugin;
impl Plugin for DemoShopPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_demo_shop);
    }
}

fn spawn_demo_shop(world: &mut World) {
    let Some(catalog) = world.get_resource::<Catalog>() else {
        error!("物品表还没载入，无法生成示例商店");
        return;
    };
    let props: Vec<(ItemDefinition, Vec3)> = [
        ("cola", Vec3::new(1.0, 0.0, -1.2)),
        ("cola", Vec3::new(1.3, 0.0, -1.2)),
        ("cola_box", Vec3::new(-1.0, 0.0, -1.2)),
        ("chips", Vec3::new(0.8, 0.0, 1.2)),
        ("chair", Vec3::new(1.5, 0.0, 1.0)),
    ]
    .into_iter()
    .filter_map(|(key, at)| {
        let def = catalog.by_key(key);
        if def.is_none() {
            warn!("示例商店跳过未注册的物品 {key}");
        }
        def.cloned().map(|d| (d, at))
    })
    .collect();

    spawn_player(
        world,
        Transform::from_xyz(0.0, 1.6, 0.0).looking_at(Vec3::new(0.0, 0.6, -2.0), Vec3::Y),
    );
    world.spawn((
        Name::new("Floor"),
        PlacementSurface,
        Collider::new(Vec3::new(10.0, 0.05, 10.0)),
        Transform::from_xyz(0.0, -0.05, 0.0),
        Visibility::Visible,
    ));
    spawn_shelf(
        world,
        "Shelf",
        Transform::from_xyz(0.0, 0.6, -2.0),
        Vec3::new(1.0, 0.6, 0.3),
        4,
    );

    // 底面贴地
    for (def, at) in &props {
        let transform = Transform::from_translation(*at + Vec3::Y * def.half_extents.y);
        world.spawn(ItemBundle::new(def, transform));
    }

    info!("示例商店已生成：{} 件物品", props.len());
}
