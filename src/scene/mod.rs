pub mod components;
pub mod physics;
mod setup;

use bevy::prelude::*;

use crate::data::catalog::ItemDefinition;
use crate::interaction::components::Interactable;
use components::*;

pub use setup::DemoShopPlugin;

/// 一个可交互的物品实例
#[derive(Bundle)]
pub struct ItemBundle {
    pub name: Name,
    pub instance: ItemInstance,
    pub interactable: Interactable,
    pub collider: Collider,
    pub body: Body,
    pub blocking: Blocking,
    pub appearance: Appearance,
    pub transform: Transform,
    pub visibility: Visibility,
}

impl ItemBundle {
    pub fn new(def: &ItemDefinition, transform: Transform) -> Self {
        Self {
            name: Name::new(def.name.clone()),
            instance: ItemInstance {
                item: def.id,
                interior_count: def.box_capacity(),
                released: false,
            },
            interactable: Interactable::for_definition(def),
            collider: Collider::new(def.half_extents),
            body: Body::SIMULATED,
            blocking: Blocking,
            appearance: Appearance::Original,
            transform,
            visibility: Visibility::Visible,
        }
    }
}

/// 不参与碰撞的预览体
#[derive(Bundle)]
pub struct GhostBundle {
    pub name: Name,
    pub ghost: Ghost,
    pub collider: Collider,
    pub appearance: Appearance,
    pub transform: Transform,
    pub visibility: Visibility,
}

impl GhostBundle {
    pub fn new(def: &ItemDefinition, transform: Transform) -> Self {
        Self {
            name: Name::new(format!("{}_Preview", def.name)),
            ghost: Ghost,
            collider: Collider::disabled(def.half_extents),
            appearance: Appearance::Preview,
            transform,
            visibility: Visibility::Visible,
        }
    }
}

/// 挂到父节点上：本地位姿归零，关闭物理
pub fn attach(commands: &mut Commands, entity: Entity, parent: Entity) {
    commands
        .entity(entity)
        .insert((ChildOf(parent), Transform::IDENTITY, Body::KINEMATIC));
}

/// 从父节点取下，放到给定世界位姿并恢复物理
pub fn detach(commands: &mut Commands, entity: Entity, at: Transform) {
    commands
        .entity(entity)
        .remove::<ChildOf>()
        .insert((at, Body::SIMULATED));
}

/// 玩家视点和挂在它下面的手持点
pub fn spawn_player(world: &mut World, transform: Transform) -> (Entity, Entity) {
    let viewpoint = world
        .spawn((Name::new("Viewpoint"), Viewpoint, transform, Visibility::Visible))
        .id();
    let hand = world
        .spawn((
            Name::new("Hand"),
            HandAnchor,
            Transform::from_xyz(0.3, -0.3, -0.5),
            ChildOf(viewpoint),
        ))
        .id();
    (viewpoint, hand)
}
