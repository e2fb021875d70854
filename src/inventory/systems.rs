use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::data::catalog::Catalog;
use bevy::prelude::*;
use serde_json::json;

/// give 命令：往背包里塞物品
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
    catalog: Res<Catalog>,
) {
    for ev in ev_give.read() {
        let Some(def) = catalog.find(&ev.id) else {
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
            continue;
        };

        if inventory.add_item(def, ev.count) {
            info!("获得 {} ×{}", def.name, ev.count);
            log.write(LogEvent(format!("获得 {} ×{}", def.name, ev.count)));
            changed.write(InventoryChanged);
        } else {
            warn!("背包已满，无法获得 {} ×{}", def.name, ev.count);
            log.write(LogEvent(format!("背包已满，无法获得 {}", def.name)));
        }
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    inventory: Res<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut empty = true;
    for (idx, slot) in inventory.slots().iter().enumerate() {
        let Some(def) = &slot.item else { continue };
        empty = false;
        let line = if def.is_box() {
            format!(
                "[{}] {} ×{} (剩余 {} 件, id={})",
                idx + 1,
                def.name,
                slot.quantity,
                slot.interior_count,
                def.key
            )
        } else {
            format!("[{}] {} ×{} (id={})", idx + 1, def.name, slot.quantity, def.key)
        };
        log.write(LogEvent(line));
    }

    if empty {
        log.write(LogEvent("  (empty)".into()));
    }
}

/// JSON 快照，方便外部工具读取
pub fn dump_inventory(
    mut ev_dump: EventReader<DumpInventoryEvent>,
    inventory: Res<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_dump.is_empty() {
        return;
    }
    ev_dump.clear();

    log.write(LogEvent(snapshot(&inventory).to_string()));
}

pub(crate) fn snapshot(inventory: &Inventory) -> serde_json::Value {
    let slots: Vec<_> = inventory
        .slots()
        .iter()
        .map(|slot| match &slot.item {
            Some(def) => json!({
                "item": def.key,
                "quantity": slot.quantity,
                "interior": slot.interior_count,
            }),
            None => serde_json::Value::Null,
        })
        .collect();

    json!({ "max_slots": inventory.max_slots(), "slots": slots })
}
