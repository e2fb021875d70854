#![allow(dead_code)]

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use shop_sim::ShopPlugin;
use shop_sim::core::{
    resources::{GameConfig, InventoryConfig, TransferConfig},
    states::AppState,
};
use shop_sim::data::catalog::{Catalog, ItemDefinition};
use shop_sim::inventory::components::Inventory;
use shop_sim::scene::{ItemBundle, components::*, spawn_player};
use shop_sim::shelf::spawn_shelf;
use shop_sim::transfer::events::TransferSettled;

pub const ITEMS: &str = r#"(items: [
    (id: "cola", name: "Cola", kind: ShopItem, stackable: true, max_stack: 24,
     half_extents: (0.04, 0.08, 0.04)),
    (id: "chips", name: "Chips", kind: ShopItem, stackable: true, max_stack: 12,
     half_extents: (0.12, 0.16, 0.05)),
    (id: "cola_box", name: "Cola Box", kind: Box, stackable: true, max_stack: 4,
     contents: [(item: "cola", quantity: 12)], half_extents: (0.2, 0.15, 0.15)),
    (id: "chair", name: "Chair", kind: Furniture, half_extents: (0.25, 0.45, 0.25)),
    (id: "plant", name: "Plant", kind: Furniture, half_extents: (0.2, 0.5, 0.2)),
])"#;

/// 视点放在 (0, 1.6, 0)，货架在 (0, 0.6, -2)
pub struct ShopScene {
    pub viewpoint: Entity,
    pub hand: Entity,
    pub floor: Entity,
    pub shelf: Entity,
}

#[derive(Resource, Default)]
pub struct Settled(pub Vec<TransferSettled>);

fn record_settled(mut reader: EventReader<TransferSettled>, mut settled: ResMut<Settled>) {
    settled.0.extend(reader.read().cloned());
}

pub fn config(max_slots: usize) -> GameConfig {
    GameConfig {
        inventory: InventoryConfig { max_slots },
        transfer: TransferConfig { fly_duration: 0.3 },
        ..default()
    }
}

/// 无渲染的 App，已进入 InGame，每帧 100ms
pub fn app(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .insert_resource(config)
        .insert_resource(Catalog::from_ron_str(ITEMS).unwrap())
        .add_plugins(ShopPlugin)
        .init_resource::<Settled>()
        .add_systems(PostUpdate, record_settled);

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::InGame);
    app.update();
    assert_eq!(
        *app.world().resource::<State<AppState>>().get(),
        AppState::InGame
    );
    app
}

pub fn spawn_scene(app: &mut App) -> ShopScene {
    let world = app.world_mut();
    let (viewpoint, hand) = spawn_player(world, Transform::from_xyz(0.0, 1.6, 0.0));
    let floor = world
        .spawn((
            Name::new("Floor"),
            PlacementSurface,
            Collider::new(Vec3::new(10.0, 0.05, 10.0)),
            Transform::from_xyz(0.0, -0.05, 0.0),
            Visibility::Visible,
        ))
        .id();
    let shelf = spawn_shelf(
        world,
        "Shelf",
        Transform::from_xyz(0.0, 0.6, -2.0),
        Vec3::new(1.0, 0.6, 0.3),
        3,
    );
    ShopScene {
        viewpoint,
        hand,
        floor,
        shelf,
    }
}

pub fn def(app: &App, key: &str) -> ItemDefinition {
    app.world()
        .resource::<Catalog>()
        .by_key(key)
        .cloned()
        .unwrap()
}

/// 在地面上放一件物品（底面贴地）
pub fn spawn_item(app: &mut App, key: &str, x: f32, z: f32) -> Entity {
    let def = def(app, key);
    let at = Vec3::new(x, def.half_extents.y, z);
    app.world_mut()
        .spawn(ItemBundle::new(&def, Transform::from_translation(at)))
        .id()
}

pub fn give(app: &mut App, key: &str, quantity: u32) {
    let def = def(app, key);
    assert!(app.world_mut().resource_mut::<Inventory>().add_item(&def, quantity));
}

pub fn look_at(app: &mut App, scene: &ShopScene, point: Vec3) {
    let eye = Transform::from_xyz(0.0, 1.6, 0.0).looking_at(point, Vec3::Y);
    app.world_mut().entity_mut(scene.viewpoint).insert(eye);
}

pub fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
}

pub fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

pub fn ghosts(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .query_filtered::<Entity, With<Ghost>>()
        .iter(app.world())
        .collect()
}

pub fn get<C: Component + Clone>(app: &App, entity: Entity) -> C {
    app.world().get::<C>(entity).cloned().unwrap()
}
