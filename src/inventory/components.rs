use bevy::prelude::*;

use crate::data::catalog::{ItemDefinition, ItemId};

/// 背包的一格；空格 item = None 且数量都为 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySlot {
    pub item: Option<ItemDefinition>,
    pub quantity: u32,
    /// 箱子里剩余的子物品；非箱子恒等于 quantity
    pub interior_count: u32,
}

impl InventorySlot {
    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn holds(&self, item: ItemId) -> bool {
        self.item.as_ref().is_some_and(|def| def.id == item)
    }

    fn can_stack(&self, def: &ItemDefinition, quantity: u32) -> bool {
        self.holds(def.id)
            && def.stackable
            && self
                .quantity
                .checked_add(quantity)
                .is_some_and(|total| total <= def.stack_limit())
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 玩家背包：固定格数，建好后不再改变
#[derive(Resource, Debug, Clone)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
}

impl Inventory {
    pub fn new(max_slots: usize) -> Self {
        Self {
            slots: vec![InventorySlot::default(); max_slots],
        }
    }

    pub fn max_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    /// 先找能叠加的格子，再找第一个空格
    fn find_slot(&self, def: &ItemDefinition, quantity: u32) -> Option<usize> {
        if quantity == 0 {
            return None;
        }
        self.slots
            .iter()
            .position(|s| s.can_stack(def, quantity))
            .or_else(|| {
                if quantity > def.stack_limit() {
                    return None;
                }
                self.slots.iter().position(InventorySlot::is_empty)
            })
    }

    pub fn can_add(&self, def: &ItemDefinition, quantity: u32) -> bool {
        self.find_slot(def, quantity).is_some()
    }

    pub fn add_item(&mut self, def: &ItemDefinition, quantity: u32) -> bool {
        let interior = if def.is_box() {
            def.box_capacity().checked_mul(quantity)
        } else {
            Some(quantity)
        };
        interior.is_some_and(|interior| self.insert(def, quantity, interior))
    }

    /// 放入拆过的箱子：每箱剩余数量由调用方给出
    pub fn add_box(&mut self, def: &ItemDefinition, quantity: u32, interior_per_box: u32) -> bool {
        if !def.is_box() {
            warn!("{} 不是箱子，不能用 add_box", def.name);
            return false;
        }
        interior_per_box
            .checked_mul(quantity)
            .is_some_and(|interior| self.insert(def, quantity, interior))
    }

    fn insert(&mut self, def: &ItemDefinition, quantity: u32, interior: u32) -> bool {
        let Some(index) = self.find_slot(def, quantity) else {
            return false;
        };

        let slot = &mut self.slots[index];
        let Some(interior_count) = slot.interior_count.checked_add(interior) else {
            warn!("{} 的剩余数量溢出，拒绝放入", def.name);
            return false;
        };
        if slot.is_empty() {
            slot.item = Some(def.clone());
        }
        // find_slot 已保证不超过 stack_limit
        slot.quantity += quantity;
        slot.interior_count = interior_count;
        true
    }

    /// 全有或全无：数量不够时不做任何修改
    pub fn remove_item(&mut self, item: ItemId, quantity: u32) -> bool {
        if quantity == 0 || !self.has_item(item, quantity) {
            return false;
        }

        let mut remaining = quantity;
        for slot in self.slots.iter_mut().filter(|s| s.holds(item)) {
            if remaining == 0 {
                break;
            }
            let taken = slot.quantity.min(remaining);
            let is_box = slot.item.as_ref().is_some_and(ItemDefinition::is_box);

            // 箱子按比例带走剩余子物品
            slot.interior_count -= if is_box {
                (u64::from(slot.interior_count) * u64::from(taken) / u64::from(slot.quantity)) as u32
            } else {
                taken
            };
            slot.quantity -= taken;
            remaining -= taken;

            if slot.quantity == 0 {
                slot.clear();
            }
        }
        true
    }

    pub fn has_item(&self, item: ItemId, quantity: u32) -> bool {
        self.quantity_of(item) >= quantity
    }

    pub fn quantity_of(&self, item: ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.holds(item))
            .map(|s| s.quantity)
            .sum()
    }

    /// 覆盖该箱子所有格子的剩余数量（拆出一个后调用）
    pub fn update_box_interior(&mut self, def: &ItemDefinition, interior_count: u32) -> bool {
        if !def.is_box() {
            warn!("{} 不是箱子", def.name);
            return false;
        }
        for slot in self.slots.iter_mut().filter(|s| s.holds(def.id)) {
            slot.interior_count = interior_count;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_ron_str(
            r#"(items: [
                (id: "apple", name: "Apple", kind: ShopItem, stackable: true, max_stack: 5),
                (id: "banana", name: "Banana", kind: ShopItem, stackable: true, max_stack: 5),
                (id: "vase", name: "Vase", kind: ShopItem),
                (id: "apple_box", name: "Apple Box", kind: Box, stackable: true, max_stack: 3,
                 contents: [(item: "apple", quantity: 4), (item: "banana", quantity: 2)]),
                (id: "chair", name: "Chair", kind: Furniture),
            ])"#,
        )
        .unwrap()
    }

    fn def<'a>(catalog: &'a Catalog, key: &str) -> &'a ItemDefinition {
        catalog.by_key(key).unwrap()
    }

    fn assert_invariants(inventory: &Inventory) {
        for slot in inventory.slots() {
            match &slot.item {
                None => {
                    assert_eq!(slot.quantity, 0);
                    assert_eq!(slot.interior_count, 0);
                }
                Some(def) => {
                    assert!(slot.quantity >= 1);
                    assert!(slot.quantity <= def.stack_limit());
                    if !def.is_box() {
                        assert_eq!(slot.interior_count, slot.quantity);
                    }
                }
            }
        }
    }

    #[test]
    fn single_slot_rejects_other_item() {
        let catalog = catalog();
        let mut inventory = Inventory::new(1);

        assert!(inventory.add_item(def(&catalog, "apple"), 1));
        assert!(!inventory.add_item(def(&catalog, "banana"), 1));

        let slot = inventory.slot(0).unwrap();
        assert!(slot.holds(ItemId::from_key("apple")));
        assert_eq!(slot.quantity, 1);
        assert_eq!(inventory.quantity_of(ItemId::from_key("banana")), 0);
    }

    #[test]
    fn stacks_before_using_empty_slots() {
        let catalog = catalog();
        let apple = def(&catalog, "apple");
        let mut inventory = Inventory::new(3);

        assert!(inventory.add_item(apple, 2));
        assert!(inventory.add_item(def(&catalog, "banana"), 1));
        assert!(inventory.add_item(apple, 3));
        assert_eq!(inventory.slot(0).unwrap().quantity, 5);

        // 第一格满了，溢出到空格
        assert!(inventory.add_item(apple, 1));
        assert!(inventory.slot(2).unwrap().holds(apple.id));
        assert_eq!(inventory.quantity_of(apple.id), 6);
        assert_invariants(&inventory);
    }

    #[test]
    fn rejects_zero_and_oversized_quantities() {
        let catalog = catalog();
        let mut inventory = Inventory::new(2);

        assert!(!inventory.add_item(def(&catalog, "apple"), 0));
        assert!(!inventory.add_item(def(&catalog, "apple"), 6));
        assert!(inventory.slots().iter().all(InventorySlot::is_empty));
    }

    #[test]
    fn overflowing_quantities_are_rejected() {
        let catalog = catalog();
        let apple = def(&catalog, "apple");
        let boxed = def(&catalog, "apple_box");
        let mut inventory = Inventory::new(2);

        assert!(inventory.add_item(apple, 1));
        assert!(!inventory.can_add(apple, u32::MAX));
        assert!(!inventory.add_item(apple, u32::MAX));
        assert_eq!(inventory.quantity_of(apple.id), 1);

        assert!(!inventory.add_item(boxed, u32::MAX));
        assert!(!inventory.add_box(boxed, 2, u32::MAX));

        // 剩余数量加不上去时整格不动
        assert!(inventory.add_box(boxed, 1, u32::MAX));
        assert!(!inventory.add_box(boxed, 1, 1));
        assert_eq!(inventory.quantity_of(boxed.id), 1);
        assert_eq!(inventory.slot(1).unwrap().interior_count, u32::MAX);

        assert!(inventory.remove_item(boxed.id, 1));
        assert_invariants(&inventory);
    }

    #[test]
    fn non_stackable_items_take_a_slot_each() {
        let catalog = catalog();
        let vase = def(&catalog, "vase");
        let mut inventory = Inventory::new(2);

        assert!(inventory.add_item(vase, 1));
        assert!(inventory.add_item(vase, 1));
        assert!(!inventory.add_item(vase, 1));
        assert_eq!(inventory.quantity_of(vase.id), 2);
        assert_invariants(&inventory);
    }

    #[test]
    fn boxes_track_interior() {
        let catalog = catalog();
        let boxed = def(&catalog, "apple_box");
        let mut inventory = Inventory::new(2);

        assert!(inventory.add_item(boxed, 2));
        assert_eq!(inventory.slot(0).unwrap().interior_count, 12);

        assert!(inventory.add_box(boxed, 1, 3));
        assert_eq!(inventory.slot(0).unwrap().quantity, 3);
        assert_eq!(inventory.slot(0).unwrap().interior_count, 15);

        assert!(!inventory.add_box(def(&catalog, "apple"), 1, 3));
    }

    #[test]
    fn update_box_interior_overwrites() {
        let catalog = catalog();
        let boxed = def(&catalog, "apple_box");
        let mut inventory = Inventory::new(2);
        inventory.add_item(boxed, 1);

        assert!(inventory.update_box_interior(boxed, 5));
        assert_eq!(inventory.slot(0).unwrap().interior_count, 5);
        assert!(!inventory.update_box_interior(def(&catalog, "apple"), 1));
    }

    #[test]
    fn remove_is_all_or_nothing() {
        let catalog = catalog();
        let apple = def(&catalog, "apple");
        let mut inventory = Inventory::new(3);
        inventory.add_item(apple, 5);
        inventory.add_item(apple, 2);
        let before = inventory.clone();

        assert!(!inventory.remove_item(apple.id, 8));
        assert_eq!(inventory.slots(), before.slots());

        assert!(inventory.remove_item(apple.id, 6));
        assert!(inventory.slot(0).unwrap().is_empty());
        assert_eq!(inventory.slot(1).unwrap().quantity, 1);
        assert_eq!(inventory.slot(1).unwrap().interior_count, 1);
        assert!(inventory.has_item(apple.id, 1));
        assert!(!inventory.has_item(apple.id, 2));
        assert_invariants(&inventory);
    }

    #[test]
    fn removing_boxes_takes_their_share() {
        let catalog = catalog();
        let boxed = def(&catalog, "apple_box");
        let mut inventory = Inventory::new(1);
        inventory.add_item(boxed, 2);

        assert!(inventory.remove_item(boxed.id, 1));
        assert_eq!(inventory.slot(0).unwrap().quantity, 1);
        assert_eq!(inventory.slot(0).unwrap().interior_count, 6);

        assert!(inventory.remove_item(boxed.id, 1));
        assert!(inventory.slot(0).unwrap().is_empty());
    }

    #[test]
    fn can_add_matches_add_item() {
        let catalog = catalog();
        let apple = def(&catalog, "apple");
        let mut inventory = Inventory::new(1);
        inventory.add_item(apple, 4);

        assert!(inventory.can_add(apple, 1));
        assert!(!inventory.can_add(apple, 2));
        assert!(!inventory.can_add(def(&catalog, "chair"), 1));
    }

    #[test]
    fn random_sequences_keep_invariants() {
        let catalog = catalog();
        let keys = ["apple", "banana", "vase", "apple_box"];
        let mut inventory = Inventory::new(4);
        let mut expected = std::collections::HashMap::<ItemId, u32>::new();
        let mut seed = 0x2545_f491_u32;

        for _ in 0..500 {
            // xorshift
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let item = def(&catalog, keys[(seed % 4) as usize]);
            let quantity = (seed >> 8) % 4;
            let count = expected.entry(item.id).or_default();

            if (seed >> 4) % 2 == 0 {
                if inventory.add_item(item, quantity) {
                    *count += quantity;
                }
            } else if inventory.remove_item(item.id, quantity) {
                *count -= quantity;
            }

            assert_invariants(&inventory);
            assert_eq!(inventory.quantity_of(item.id), *count);
        }
    }
}
