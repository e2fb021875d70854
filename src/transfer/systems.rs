use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::data::catalog::{ItemDefinition, ItemId};
use crate::inventory::{components::Inventory, events::InventoryChanged};
use crate::pool::ItemSpawner;
use crate::scene::{attach, components::*};
use crate::shelf::components::Shelf;

/// 结算 / 回滚需要碰到的全部状态
#[derive(SystemParam)]
pub struct Ledger<'w, 's> {
    spawner: ItemSpawner<'w, 's>,
    inventory: ResMut<'w, Inventory>,
    shelves: Query<'w, 's, &'static mut Shelf>,
    items: Query<'w, 's, &'static mut ItemInstance>,
    changed: EventWriter<'w, InventoryChanged>,
}

impl Ledger<'_, '_> {
    fn definition(&self, item: ItemId) -> Result<ItemDefinition, TransferError> {
        self.spawner
            .catalog
            .get(item)
            .cloned()
            .ok_or(TransferError::UnknownItem(item))
    }

    fn name_of(&self, item: ItemId) -> String {
        self.spawner
            .catalog
            .get(item)
            .map_or_else(|| item.to_string(), |d| d.name.clone())
    }

    fn despawn(&mut self, entity: Entity) {
        if let Ok(mut ghost) = self.spawner.commands.get_entity(entity) {
            ghost.despawn();
        }
    }

    /// 提交；返回 Err 时已经撤销了本函数内做过的修改
    fn settle(&mut self, payload: &TransferPayload) -> Result<(), TransferError> {
        match *payload {
            TransferPayload::Collect {
                object,
                item,
                interior,
            } => {
                let def = self.definition(item)?;
                let added = if def.is_box() {
                    self.inventory.add_box(&def, 1, interior)
                } else {
                    self.inventory.add_item(&def, 1)
                };
                if !added {
                    return Err(TransferError::InventoryFull(def.name));
                }
                self.changed.write(InventoryChanged);
                self.release(object);
                Ok(())
            }

            TransferPayload::Stock { shelf, item } => {
                let def = self.definition(item)?;
                if !self.inventory.remove_item(item, 1) {
                    return Err(TransferError::NotInInventory(def.name));
                }
                if let Err(err) = self.shelve(shelf, &def) {
                    self.inventory.add_item(&def, 1);
                    return Err(err);
                }
                self.changed.write(InventoryChanged);
                Ok(())
            }

            // 箱子里的一件在起飞时已经扣掉了
            TransferPayload::Unpack {
                shelf, sub_item, ..
            } => {
                let sub = self.definition(sub_item)?;
                self.shelve(shelf, &sub)
            }

            TransferPayload::Take { item, object, .. } => {
                let def = self.definition(item)?;
                if !self.inventory.add_item(&def, 1) {
                    return Err(TransferError::InventoryFull(def.name));
                }
                self.changed.write(InventoryChanged);
                self.release(object);
                Ok(())
            }
        }
    }

    /// 实例上架：占位、加库存、从对象池生成并挂到挂点
    fn shelve(&mut self, shelf_entity: Entity, def: &ItemDefinition) -> Result<(), TransferError> {
        let Ok(mut shelf) = self.shelves.get_mut(shelf_entity) else {
            return Err(TransferError::MissingShelf(shelf_entity));
        };
        let Some((slot, anchor)) = shelf
            .next_free_slot_index()
            .and_then(|i| Some((i, shelf.anchor(i)?)))
        else {
            return Err(TransferError::ShelfFull);
        };
        if shelf.add_stock(def.id, 1) == 0 {
            return Err(TransferError::StockFull(def.name.clone()));
        }
        let Some(object) = self.spawner.spawn(def.id, Transform::IDENTITY) else {
            shelf.remove_stock(def.id, 1);
            return Err(TransferError::UnknownItem(def.id));
        };

        shelf.place_physical_item_at(slot, object);
        attach(&mut self.spawner.commands, object, anchor);
        Ok(())
    }

    /// 撤销飞行开始时已经做过的修改
    fn rollback(&mut self, payload: &TransferPayload) {
        match *payload {
            TransferPayload::Collect { object, item, .. } => {
                let half_extents = self.half_extents(item);
                if let Ok(mut restored) = self.spawner.commands.get_entity(object) {
                    restored.insert((Visibility::Visible, Collider::new(half_extents)));
                }
            }

            // 起飞时只把手上的实例还给了对象池，背包没动
            TransferPayload::Stock { .. } => {}

            TransferPayload::Unpack {
                box_entity,
                box_item,
                ..
            } => self.refund_box(box_entity, box_item),

            TransferPayload::Take {
                shelf,
                item,
                slot,
                object,
            } => {
                let half_extents = self.half_extents(item);
                let anchor = match self.shelves.get_mut(shelf) {
                    Ok(mut shelf) => {
                        shelf.add_stock(item, 1);
                        if shelf.place_physical_item_at(slot, object) {
                            shelf.anchor(slot)
                        } else {
                            shelf.place_physical_item(object).and_then(|i| shelf.anchor(i))
                        }
                    }
                    Err(_) => None,
                };

                let Ok(mut restored) = self.spawner.commands.get_entity(object) else {
                    error!("回滚时 {object:?} 已经不存在");
                    return;
                };
                restored.insert((Visibility::Visible, Collider::new(half_extents)));
                match anchor {
                    Some(anchor) => attach(&mut self.spawner.commands, object, anchor),
                    None => {
                        warn!("货架 {shelf:?} 放不回去，{object:?} 留在原地");
                        self.spawner.commands.entity(object).insert(Body::SIMULATED);
                    }
                }
            }
        }
    }

    /// 把起飞时预扣的一件还给箱子；手上的实例已收起时改背包里的
    fn refund_box(&mut self, box_entity: Entity, box_item: ItemId) {
        let Ok(boxed) = self.definition(box_item) else {
            return;
        };
        let restored = match self.items.get_mut(box_entity) {
            Ok(mut instance) if !instance.released && instance.item == box_item => {
                instance.interior_count = instance.interior_count.saturating_add(1);
                Some(instance.interior_count)
            }
            _ => self
                .inventory
                .slots()
                .iter()
                .find(|s| s.holds(box_item))
                .map(|s| s.interior_count.saturating_add(1)),
        };

        match restored {
            Some(restored) => {
                self.inventory.update_box_interior(&boxed, restored);
                self.changed.write(InventoryChanged);
            }
            None => warn!("{} 已不在手上也不在背包里，拆出的一件无法退回", boxed.name),
        }
    }

    fn finish(&mut self, payload: &TransferPayload) {
        if let Some(shelf) = payload.shelf() {
            if let Ok(mut shelf) = self.shelves.get_mut(shelf) {
                shelf.set_busy(false);
            }
        }
    }

    fn release(&mut self, object: Entity) {
        if let Ok(mut instance) = self.items.get_mut(object) {
            self.spawner.release(object, &mut instance);
        }
    }

    fn half_extents(&self, item: ItemId) -> Vec3 {
        self.spawner
            .catalog
            .get(item)
            .map_or(Vec3::splat(0.25), |d| d.half_extents)
    }

    fn describe(&self, payload: &TransferPayload) -> String {
        let name = self.name_of(payload.item());
        match payload {
            TransferPayload::Collect { .. } | TransferPayload::Take { .. } => {
                format!("{name} 已放进背包")
            }
            TransferPayload::Stock { .. } => format!("{name} 已上架"),
            TransferPayload::Unpack { .. } => format!("从箱子里拆出 {name} 上架"),
        }
    }
}

/// 推进飞行动画，落地后结算
pub fn advance_flights(
    time: Res<Time>,
    mut flights: Query<(Entity, &mut Flight, &mut Transform)>,
    mut ledger: Ledger,
    mut settled: EventWriter<TransferSettled>,
    mut log: EventWriter<LogEvent>,
) {
    for (ghost, mut flight, mut transform) in &mut flights {
        flight.timer.tick(time.delta());
        transform.translation = flight.position();
        if !flight.timer.finished() {
            continue;
        }

        ledger.despawn(ghost);
        let payload = flight.payload;
        let outcome = ledger.settle(&payload);
        match &outcome {
            Ok(()) => {
                log.write(LogEvent(ledger.describe(&payload)));
            }
            Err(err) => {
                warn!("转移失败，回滚: {err}");
                log.write(LogEvent(format!("操作失败: {err}")));
                ledger.rollback(&payload);
            }
        }
        ledger.finish(&payload);
        settled.write(TransferSettled { payload, outcome });
    }
}

pub fn cancel_transfers(
    mut reader: EventReader<CancelTransfers>,
    flights: Query<(Entity, &Flight)>,
    mut ledger: Ledger,
    mut settled: EventWriter<TransferSettled>,
    mut log: EventWriter<LogEvent>,
) {
    if reader.is_empty() {
        return;
    }
    reader.clear();

    let cancelled = abort_all(&flights, &mut ledger, &mut settled);
    log.write(LogEvent(format!("已取消 {cancelled} 个进行中的转移")));
}

/// 离开 InGame 时不能留下半途的物品
pub fn cancel_on_exit(
    flights: Query<(Entity, &Flight)>,
    mut ledger: Ledger,
    mut settled: EventWriter<TransferSettled>,
) {
    let cancelled = abort_all(&flights, &mut ledger, &mut settled);
    if cancelled > 0 {
        info!("退出时回滚了 {cancelled} 个转移");
    }
}

fn abort_all(
    flights: &Query<(Entity, &Flight)>,
    ledger: &mut Ledger,
    settled: &mut EventWriter<TransferSettled>,
) -> usize {
    let mut count = 0;
    for (ghost, flight) in flights {
        ledger.despawn(ghost);
        ledger.rollback(&flight.payload);
        ledger.finish(&flight.payload);
        settled.write(TransferSettled {
            payload: flight.payload,
            outcome: Err(TransferError::Cancelled),
        });
        count += 1;
    }
    count
}
