pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;

use crate::core::{resources::GameConfig, states::AppState};
use crate::interaction::components::Interactable;
use crate::scene::components::*;
use components::*;
use events::*;
use systems::*;

pub struct ShelfPlugin;
impl Plugin for ShelfPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShelfPreview>()
            .add_event::<StoreOnShelf>()
            .add_event::<TakeFromShelf>()
            .add_event::<ListShelvesEvent>()
            .add_systems(
                Update,
                (store_on_shelf, take_from_shelf, list_shelves, update_shelf_preview)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), clear_shelf_preview);
    }
}

/// 生成货架和它顶面上等距排开的展示位
pub fn spawn_shelf(
    world: &mut World,
    name: &str,
    transform: Transform,
    half_extents: Vec3,
    slots: usize,
) -> Entity {
    let capacity = world
        .get_resource::<GameConfig>()
        .cloned()
        .unwrap_or_default()
        .shelf
        .capacity_per_item;

    let shelf = world
        .spawn((
            Name::new(name.to_string()),
            Interactable::Shelf,
            Collider::new(half_extents),
            Body::KINEMATIC,
            Blocking,
            transform,
            Visibility::Visible,
        ))
        .id();

    let spacing = half_extents.x * 2.0 / slots.max(1) as f32;
    let anchors = (0..slots)
        .map(|index| {
            let x = -half_extents.x + spacing * (index as f32 + 0.5);
            world
                .spawn((
                    Name::new(format!("{name}_Slot{index}")),
                    ShelfAnchor { shelf, index },
                    Transform::from_xyz(x, half_extents.y, 0.0),
                    ChildOf(shelf),
                ))
                .id()
        })
        .collect();

    world.entity_mut(shelf).insert(Shelf::new(capacity, anchors));
    shelf
}
