use super::{components::*, events::*};
use crate::carry::{
    components::CarrySlot,
    events::{CollectEvent, DropEvent},
};
use crate::core::{events::LogEvent, resources::GameConfig};
use crate::data::{catalog::Catalog, schema::ItemKind};
use crate::placement::{components::PlacementManager, events::BeginPlacement};
use crate::scene::{
    components::*,
    physics::{NodeQuery, raycast, world_transform},
};
use crate::shelf::{
    components::Shelf,
    events::{StoreOnShelf, TakeFromShelf},
};
use bevy::prelude::*;

pub fn aim_viewpoint(
    mut ev_aim: EventReader<AimEvent>,
    mut commands: Commands,
    mut log: EventWriter<LogEvent>,
    viewpoints: Query<Entity, With<Viewpoint>>,
    named: Query<(Entity, &Name, &Visibility), Without<Ghost>>,
    nodes: NodeQuery,
) {
    for ev in ev_aim.read() {
        let Ok(view) = viewpoints.single() else {
            error!("场景里没有 Viewpoint");
            continue;
        };
        let Some(eye) = world_transform(view, &nodes) else {
            continue;
        };

        let point = match ev {
            AimEvent::Point(point) => *point,
            AimEvent::Named(name) => {
                let found = named
                    .iter()
                    .filter(|(_, _, visibility)| **visibility != Visibility::Hidden)
                    .find(|(_, n, _)| n.as_str().eq_ignore_ascii_case(name))
                    .and_then(|(entity, _, _)| world_transform(entity, &nodes));
                let Some(found) = found else {
                    log.write(LogEvent(format!("找不到 {name}")));
                    continue;
                };
                found.translation
            }
        };

        if eye.translation.distance_squared(point) < 1e-6 {
            continue;
        }
        commands
            .entity(view)
            .insert(eye.looking_at(point, Vec3::Y));
        log.write(LogEvent(format!(
            "视线对准 ({:.2}, {:.2}, {:.2})",
            point.x, point.y, point.z
        )));
    }
}

/// 从视点沿前方打射线，找最近的可交互物体
pub fn update_target(
    mut target: ResMut<Target>,
    placement: Res<PlacementManager>,
    config: Res<GameConfig>,
    viewpoints: Query<Entity, With<Viewpoint>>,
    candidates: Query<
        (Entity, &Collider, &Transform, &Visibility),
        (With<Interactable>, Without<ChildOf>, Without<Ghost>),
    >,
    nodes: NodeQuery,
) {
    // 摆放时不和别的东西交互
    let found = if placement.is_placing() {
        None
    } else {
        viewpoints
            .single()
            .ok()
            .and_then(|view| world_transform(view, &nodes))
            .and_then(|view| {
                raycast(
                    view.translation,
                    *view.forward(),
                    config.interaction.range,
                    candidates
                        .iter()
                        .filter(|(_, collider, _, visibility)| {
                            collider.enabled && **visibility != Visibility::Hidden
                        })
                        .map(|(entity, collider, transform, _)| {
                            (entity, collider.bounds(transform))
                        }),
                )
            })
            .map(|hit| hit.entity)
    };

    if target.entity != found {
        target.entity = found;
    }
}

pub fn refresh_hint(
    mut hint: ResMut<InteractHint>,
    target: Res<Target>,
    carry: Res<CarrySlot>,
    placement: Res<PlacementManager>,
    catalog: Res<Catalog>,
    interactables: Query<&Interactable>,
    shelves: Query<&Shelf>,
    items: Query<&ItemInstance>,
) {
    let focused = target
        .entity
        .and_then(|e| interactables.get(e).ok().map(|i| (e, i)));

    let text = if placement.is_placing() {
        "rotate 旋转，place 确认，cancel 取消".to_string()
    } else if let Some((entity, interactable)) = focused {
        let held = carry.held().and_then(|e| items.get(e).ok());
        let ctx = InteractContext {
            catalog: &catalog,
            held: held.and_then(|i| catalog.get(i.item)),
            held_interior: held.map_or(0, |i| i.interior_count),
            shelf: shelves.get(entity).ok(),
        };
        interactable.interact_text(&ctx)
    } else if carry.is_carrying() {
        "按 E 放下手上的物品".to_string()
    } else {
        String::new()
    };

    if hint.0 != text {
        debug!("交互提示: {text}");
        hint.0 = text;
    }
}

/// 按 E：按目标类型分派到拾取 / 摆放 / 货架
pub fn dispatch_interact(
    mut ev_interact: EventReader<InteractEvent>,
    mut collect: EventWriter<CollectEvent>,
    mut begin: EventWriter<BeginPlacement>,
    mut drop: EventWriter<DropEvent>,
    mut store: EventWriter<StoreOnShelf>,
    mut take: EventWriter<TakeFromShelf>,
    mut log: EventWriter<LogEvent>,
    target: Res<Target>,
    carry: Res<CarrySlot>,
    placement: Res<PlacementManager>,
    catalog: Res<Catalog>,
    interactables: Query<&Interactable>,
) {
    for _ in ev_interact.read() {
        if placement.is_placing() {
            log.write(LogEvent("正在摆放家具，先确认或取消".into()));
            continue;
        }

        let focused = target
            .entity
            .and_then(|e| interactables.get(e).ok().map(|i| (e, *i)));
        let Some((entity, interactable)) = focused else {
            if carry.is_carrying() {
                drop.write(DropEvent {
                    remove_from_inventory: true,
                });
            } else {
                log.write(LogEvent("前面没有可以交互的东西".into()));
            }
            continue;
        };

        match interactable {
            Interactable::Pickup { item } => match catalog.get(item).map(|d| d.kind) {
                Some(ItemKind::Furniture) => {
                    begin.write(BeginPlacement {
                        item,
                        source: Some(entity),
                    });
                }
                Some(_) => {
                    collect.write(CollectEvent { entity });
                }
                None => error!("物品 {item} 没有注册"),
            },
            Interactable::Furniture { item } => {
                begin.write(BeginPlacement {
                    item,
                    source: Some(entity),
                });
            }
            Interactable::Shelf if carry.is_carrying() => {
                store.write(StoreOnShelf { shelf: entity });
            }
            Interactable::Shelf => {
                take.write(TakeFromShelf { shelf: entity });
            }
        }
    }
}
