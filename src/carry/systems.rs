use super::{components::*, events::*};
use crate::core::{events::LogEvent, resources::GameConfig};
use crate::data::{catalog::Catalog, schema::ItemKind};
use crate::inventory::{components::Inventory, events::InventoryChanged};
use crate::placement::{components::PlacementManager, events::BeginPlacement};
use crate::pool::ItemSpawner;
use crate::scene::{
    attach,
    components::*,
    detach,
    physics::{NodeQuery, world_transform},
};
use crate::transfer::{self, components::TransferPayload};
use bevy::prelude::*;

/// 选背包格：同一格再选一次就收起，换格就换手上的物体
pub fn select_slot(
    mut ev_select: EventReader<SelectSlotEvent>,
    mut carry: ResMut<CarrySlot>,
    mut spawner: ItemSpawner,
    mut items: Query<&mut ItemInstance>,
    inventory: Res<Inventory>,
    placement: Res<PlacementManager>,
    mut pick_up: EventWriter<PickUpEvent>,
    mut begin: EventWriter<BeginPlacement>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_select.read() {
        if placement.is_placing() {
            warn!("摆放中忽略选格 {}", ev.index + 1);
            log.write(LogEvent("正在摆放家具，先确认或取消".into()));
            continue;
        }
        let Some(slot) = inventory.slot(ev.index) else {
            log.write(LogEvent(format!("没有第 {} 格", ev.index + 1)));
            continue;
        };

        let same_slot = carry.slot() == Some(ev.index);
        stow(&mut carry, &mut spawner, &mut items);
        if same_slot {
            log.write(LogEvent("收起了手上的物品".into()));
            continue;
        }

        let Some(def) = slot.item.as_ref() else {
            log.write(LogEvent(format!("第 {} 格是空的", ev.index + 1)));
            continue;
        };

        // 家具不拿在手上，直接进入摆放预览
        if def.kind == ItemKind::Furniture {
            begin.write(BeginPlacement {
                item: def.id,
                source: None,
            });
            continue;
        }

        let Some(entity) = spawner.spawn(def.id, Transform::IDENTITY) else {
            continue;
        };
        if def.is_box() {
            spawner.commands.entity(entity).insert(ItemInstance {
                item: def.id,
                interior_count: slot.interior_count.min(def.box_capacity()),
                released: false,
            });
        }
        pick_up.write(PickUpEvent {
            entity,
            slot: Some(ev.index),
        });
        log.write(LogEvent(format!("拿起了 {}", def.name)));
    }
}

pub fn pick_up(
    mut ev_pick: EventReader<PickUpEvent>,
    mut commands: Commands,
    mut carry: ResMut<CarrySlot>,
    hands: Query<Entity, With<HandAnchor>>,
    nodes: NodeQuery,
) {
    for ev in ev_pick.read() {
        let Ok(hand) = hands.single() else {
            error!("场景里没有 HandAnchor，无法拿起 {:?}", ev.entity);
            continue;
        };

        // 手上已有东西：先放下，但不扣背包
        if let Some(previous) = carry.take() {
            let at = world_transform(hand, &nodes).unwrap_or_default();
            detach(&mut commands, previous, at);
        }

        attach(&mut commands, ev.entity, hand);
        carry.hold(ev.entity, ev.slot);
    }
}

pub fn drop_held(
    mut ev_drop: EventReader<DropEvent>,
    mut commands: Commands,
    mut carry: ResMut<CarrySlot>,
    mut inventory: ResMut<Inventory>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
    catalog: Res<Catalog>,
    items: Query<&ItemInstance>,
    hands: Query<Entity, With<HandAnchor>>,
    nodes: NodeQuery,
) {
    for ev in ev_drop.read() {
        let Some(entity) = carry.take() else {
            continue;
        };

        let at = hands
            .single()
            .ok()
            .and_then(|hand| world_transform(hand, &nodes))
            .unwrap_or_default();
        detach(&mut commands, entity, at);

        let Ok(instance) = items.get(entity) else {
            continue;
        };
        let name = catalog
            .get(instance.item)
            .map_or("物品", |d| d.name.as_str());

        if ev.remove_from_inventory && inventory.remove_item(instance.item, 1) {
            changed.write(InventoryChanged);
        }
        log.write(LogEvent(format!("放下了 {name}")));
    }
}

pub fn stow_held(
    mut ev_stow: EventReader<StowEvent>,
    mut carry: ResMut<CarrySlot>,
    mut spawner: ItemSpawner,
    mut items: Query<&mut ItemInstance>,
) {
    if ev_stow.is_empty() {
        return;
    }
    ev_stow.clear();

    stow(&mut carry, &mut spawner, &mut items);
}

fn stow(carry: &mut CarrySlot, spawner: &mut ItemSpawner, items: &mut Query<&mut ItemInstance>) {
    let Some(entity) = carry.take() else {
        return;
    };
    if let Ok(mut instance) = items.get_mut(entity) {
        spawner.release(entity, &mut instance);
    }
}

/// 地上的商品 / 箱子飞到手里，落地后才真正进背包
pub fn collect(
    mut ev_collect: EventReader<CollectEvent>,
    mut commands: Commands,
    mut log: EventWriter<LogEvent>,
    inventory: Res<Inventory>,
    catalog: Res<Catalog>,
    config: Res<GameConfig>,
    items: Query<(&ItemInstance, &Visibility)>,
    hands: Query<Entity, With<HandAnchor>>,
    nodes: NodeQuery,
) {
    let mut launched = Vec::new();

    for ev in ev_collect.read() {
        let Ok((instance, visibility)) = items.get(ev.entity) else {
            warn!("{:?} 不是可以拾取的物品", ev.entity);
            continue;
        };
        if instance.released || *visibility == Visibility::Hidden || launched.contains(&ev.entity) {
            continue;
        }
        let Some(def) = catalog.get(instance.item) else {
            error!("物品 {} 没有注册", instance.item);
            continue;
        };
        if def.kind == ItemKind::Furniture {
            log.write(LogEvent(format!("{} 需要摆放，不能收进背包", def.name)));
            continue;
        }
        if !inventory.can_add(def, 1) {
            warn!("背包已满，无法拾取 {}", def.name);
            log.write(LogEvent(format!("背包已满，无法拾取 {}", def.name)));
            continue;
        }

        let Ok(hand) = hands.single() else {
            error!("场景里没有 HandAnchor，无法拾取 {}", def.name);
            continue;
        };
        let (Some(from), Some(to)) = (
            world_transform(ev.entity, &nodes),
            world_transform(hand, &nodes),
        ) else {
            continue;
        };

        commands
            .entity(ev.entity)
            .insert((Visibility::Hidden, Collider::disabled(def.half_extents)));
        transfer::launch(
            &mut commands,
            def,
            from.translation,
            to.translation,
            config.transfer.fly_duration,
            TransferPayload::Collect {
                object: ev.entity,
                item: def.id,
                interior: instance.interior_count,
            },
        );
        launched.push(ev.entity);
    }
}
