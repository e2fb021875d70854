use super::{components::*, events::*};
use crate::carry::components::CarrySlot;
use crate::core::{events::LogEvent, resources::GameConfig};
use crate::data::{catalog::Catalog, schema::ItemKind};
use crate::interaction::components::{InteractContext, Interactable, Target};
use crate::inventory::{components::Inventory, events::InventoryChanged};
use crate::pool::ItemSpawner;
use crate::scene::{
    GhostBundle,
    components::*,
    physics::{NodeQuery, world_transform},
};
use crate::transfer::{self, components::TransferPayload};
use bevy::prelude::*;

/// 手上的商品飞上货架；拿着箱子时拆一个出来
pub fn store_on_shelf(
    mut ev_store: EventReader<StoreOnShelf>,
    mut carry: ResMut<CarrySlot>,
    mut shelves: Query<&mut Shelf>,
    mut items: Query<&mut ItemInstance>,
    mut spawner: ItemSpawner,
    mut log: EventWriter<LogEvent>,
    mut changed: EventWriter<InventoryChanged>,
    mut inventory: ResMut<Inventory>,
    config: Res<GameConfig>,
    nodes: NodeQuery,
) {
    for ev in ev_store.read() {
        let Ok(mut shelf) = shelves.get_mut(ev.shelf) else {
            error!("{:?} 不是货架", ev.shelf);
            continue;
        };
        if shelf.is_busy() {
            log.write(LogEvent("货架正忙，稍等".into()));
            continue;
        }
        let Some(held) = carry.held() else {
            log.write(LogEvent("手上没有东西".into()));
            continue;
        };
        let Ok(mut instance) = items.get_mut(held) else {
            error!("手上的 {held:?} 不是物品");
            continue;
        };
        let Some(def) = spawner.catalog.get(instance.item).cloned() else {
            error!("物品 {} 没有注册", instance.item);
            continue;
        };

        let Some(slot) = shelf.next_free_slot_index() else {
            log.write(LogEvent("货架已满".into()));
            continue;
        };
        let Some(to) = shelf.anchor(slot).and_then(|a| world_transform(a, &nodes)) else {
            error!("货架 {:?} 的第 {slot} 个挂点缺失", ev.shelf);
            continue;
        };
        let from = world_transform(held, &nodes).unwrap_or(to);
        let duration = config.transfer.fly_duration;

        match def.kind {
            ItemKind::ShopItem => {
                if shelf.stock(def.id) >= shelf.capacity_per_item() {
                    log.write(LogEvent(format!("{} 在货架上已经放满了", def.name)));
                    continue;
                }
                if !inventory.has_item(def.id, 1) {
                    log.write(LogEvent(format!("背包里没有 {}", def.name)));
                    continue;
                }

                carry.take();
                spawner.release(held, &mut instance);
                shelf.set_busy(true);
                transfer::launch(
                    &mut spawner.commands,
                    &def,
                    from.translation,
                    to.translation,
                    duration,
                    TransferPayload::Stock {
                        shelf: ev.shelf,
                        item: def.id,
                    },
                );
            }
            ItemKind::Box => {
                if instance.interior_count == 0 {
                    log.write(LogEvent("箱子已经空了".into()));
                    continue;
                }
                let Some(sub) = def
                    .first_content()
                    .and_then(|id| spawner.catalog.get(id))
                    .cloned()
                else {
                    error!("箱子 {} 没有内容物", def.name);
                    continue;
                };
                if shelf.stock(sub.id) >= shelf.capacity_per_item() {
                    log.write(LogEvent(format!("{} 在货架上已经放满了", sub.name)));
                    continue;
                }

                // 起飞时就从箱子里扣掉，失败时回滚加回
                instance.interior_count -= 1;
                inventory.update_box_interior(&def, instance.interior_count);
                changed.write(InventoryChanged);

                shelf.set_busy(true);
                transfer::launch(
                    &mut spawner.commands,
                    &sub,
                    from.translation,
                    to.translation,
                    duration,
                    TransferPayload::Unpack {
                        shelf: ev.shelf,
                        box_entity: held,
                        box_item: def.id,
                        sub_item: sub.id,
                    },
                );
            }
            ItemKind::Furniture => {
                log.write(LogEvent("家具不能放上货架".into()));
            }
        }
    }
}

/// 空手取下最后一个商品；背包满时直接拒绝
pub fn take_from_shelf(
    mut ev_take: EventReader<TakeFromShelf>,
    mut commands: Commands,
    mut shelves: Query<&mut Shelf>,
    mut log: EventWriter<LogEvent>,
    carry: Res<CarrySlot>,
    inventory: Res<Inventory>,
    catalog: Res<Catalog>,
    config: Res<GameConfig>,
    items: Query<&ItemInstance>,
    hands: Query<Entity, With<HandAnchor>>,
    nodes: NodeQuery,
) {
    for ev in ev_take.read() {
        let Ok(mut shelf) = shelves.get_mut(ev.shelf) else {
            error!("{:?} 不是货架", ev.shelf);
            continue;
        };
        if carry.is_carrying() {
            log.write(LogEvent("手上拿着东西，先放下或收起".into()));
            continue;
        }
        if shelf.is_busy() {
            log.write(LogEvent("货架正忙，稍等".into()));
            continue;
        }
        let Some((slot, object)) = shelf.last_occupied() else {
            log.write(LogEvent("货架是空的".into()));
            continue;
        };
        let Some(def) = items.get(object).ok().and_then(|i| catalog.get(i.item)) else {
            error!("货架上的 {object:?} 不是已注册的物品");
            continue;
        };
        if !inventory.can_add(def, 1) {
            warn!("背包已满，无法取下 {}", def.name);
            log.write(LogEvent(format!("背包已满，无法取下 {}", def.name)));
            continue;
        }

        let Ok(hand) = hands.single() else {
            error!("场景里没有 HandAnchor");
            continue;
        };
        let (Some(from), Some(to)) = (
            world_transform(object, &nodes),
            world_transform(hand, &nodes),
        ) else {
            continue;
        };

        shelf.remove_physical_item(object);
        shelf.remove_stock(def.id, 1);
        shelf.set_busy(true);
        commands.entity(object).remove::<ChildOf>().insert((
            from,
            Visibility::Hidden,
            Collider::disabled(def.half_extents),
            Body::KINEMATIC,
        ));
        transfer::launch(
            &mut commands,
            def,
            from.translation,
            to.translation,
            config.transfer.fly_duration,
            TransferPayload::Take {
                shelf: ev.shelf,
                item: def.id,
                slot,
                object,
            },
        );
    }
}

pub fn list_shelves(
    mut ev_list: EventReader<ListShelvesEvent>,
    mut log: EventWriter<LogEvent>,
    shelves: Query<(Entity, &Shelf, Option<&Name>)>,
    catalog: Res<Catalog>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    if shelves.is_empty() {
        log.write(LogEvent("场景里没有货架".into()));
        return;
    }

    for (entity, shelf, name) in &shelves {
        let title = name.map_or_else(|| format!("{entity:?}"), |n| n.to_string());
        log.write(LogEvent(format!(
            "{title}: 空位 {}/{}{}",
            shelf.free_slots(),
            shelf.slot_count(),
            if shelf.is_busy() { " (忙)" } else { "" }
        )));

        let mut stock: Vec<_> = shelf
            .stock_entries()
            .map(|(id, count)| {
                let name = catalog.get(id).map_or_else(|| id.to_string(), |d| d.name.clone());
                (name, count)
            })
            .collect();
        stock.sort();
        for (name, count) in stock {
            log.write(LogEvent(format!("  {name} ×{count}/{}", shelf.capacity_per_item())));
        }
    }
}

/// 对准货架且手上有能上架的东西时，在下一个空位显示预览
pub fn update_shelf_preview(
    mut commands: Commands,
    mut preview: ResMut<ShelfPreview>,
    target: Res<Target>,
    carry: Res<CarrySlot>,
    catalog: Res<Catalog>,
    interactables: Query<&Interactable>,
    shelves: Query<&Shelf>,
    items: Query<&ItemInstance>,
    nodes: NodeQuery,
) {
    let wanted = (|| {
        let shelf_entity = target.entity?;
        let interactable = interactables.get(shelf_entity).ok()?;
        let shelf = shelves.get(shelf_entity).ok()?;
        if shelf.is_busy() {
            return None;
        }

        let held = carry.held().and_then(|e| items.get(e).ok());
        let ctx = InteractContext {
            catalog: &catalog,
            held: held.and_then(|i| catalog.get(i.item)),
            held_interior: held.map_or(0, |i| i.interior_count),
            shelf: Some(shelf),
        };
        let item = interactable.preview_item(&ctx)?;
        let pose = interactable.preview_transform(Some(shelf), |a| world_transform(a, &nodes))?;
        let slot = shelf.next_free_slot_index()?;
        Some((shelf_entity, item, slot, pose))
    })();

    match (preview.current, wanted) {
        (Some(current), Some((shelf, item, slot, _)))
            if current.shelf == shelf && current.item == item && current.slot == slot => {}
        (None, None) => {}
        (current, wanted) => {
            if let Some(current) = current {
                if let Ok(mut ghost) = commands.get_entity(current.ghost) {
                    ghost.despawn();
                }
            }
            preview.current = wanted.and_then(|(shelf, item, slot, pose)| {
                let def = catalog.get(item)?;
                let ghost = commands.spawn(GhostBundle::new(def, pose)).id();
                Some(PreviewGhost {
                    ghost,
                    shelf,
                    item,
                    slot,
                })
            });
        }
    }
}

pub fn clear_shelf_preview(mut commands: Commands, mut preview: ResMut<ShelfPreview>) {
    if let Some(current) = preview.current.take() {
        if let Ok(mut ghost) = commands.get_entity(current.ghost) {
            ghost.despawn();
        }
    }
}
