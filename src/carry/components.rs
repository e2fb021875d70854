use bevy::prelude::*;

/// 手上最多拿一个物体
#[derive(Resource, Debug, Default)]
pub struct CarrySlot {
    held: Option<Entity>,
    /// 手上物体对应的背包格
    slot: Option<usize>,
}

impl CarrySlot {
    pub fn held(&self) -> Option<Entity> {
        self.held
    }

    pub fn is_carrying(&self) -> bool {
        self.held.is_some()
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// 返回之前拿着的物体
    pub fn hold(&mut self, entity: Entity, slot: Option<usize>) -> Option<Entity> {
        self.slot = slot;
        self.held.replace(entity)
    }

    pub fn take(&mut self) -> Option<Entity> {
        self.slot = None;
        self.held.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_replaces_and_take_clears() {
        let mut carry = CarrySlot::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        assert!(!carry.is_carrying());
        assert_eq!(carry.hold(a, Some(2)), None);
        assert_eq!(carry.slot(), Some(2));

        assert_eq!(carry.hold(b, None), Some(a));
        assert_eq!(carry.held(), Some(b));
        assert_eq!(carry.slot(), None);

        assert_eq!(carry.take(), Some(b));
        assert_eq!(carry.take(), None);
        assert!(!carry.is_carrying());
    }
}
