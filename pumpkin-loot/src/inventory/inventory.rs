use std::fmt::Debug;

use pumpkin_util::ResourceLocation;

use crate::item::ItemStack;

/// A fixed number of slots holding item stacks, e.g. a chest.
pub trait Inventory: Debug {
    fn size(&self) -> usize;

    fn get_stack(&self, slot: usize) -> &ItemStack;

    fn set_stack(&mut self, slot: usize, stack: ItemStack);

    fn is_empty(&self) -> bool {
        (0..self.size()).all(|slot| self.get_stack(slot).is_empty())
    }

    fn remove_stack(&mut self, slot: usize) -> ItemStack {
        let stack = self.get_stack(slot).clone();
        self.set_stack(slot, ItemStack::empty());
        stack
    }

    fn count(&self, item: &ResourceLocation) -> i32 {
        (0..self.size())
            .map(|slot| self.get_stack(slot))
            .filter(|stack| !stack.is_empty() && &stack.item.id == item)
            .map(ItemStack::get_count)
            .sum()
    }

    fn empty_slots(&self) -> Vec<usize> {
        (0..self.size())
            .filter(|slot| self.get_stack(*slot).is_empty())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SimpleInventory {
    stacks: Vec<ItemStack>,
}

impl SimpleInventory {
    /// Slots of a single chest.
    pub const CHEST_SIZE: usize = 27;

    pub fn new(size: usize) -> Self {
        Self {
            stacks: vec![ItemStack::empty(); size],
        }
    }

    pub fn chest() -> Self {
        Self::new(Self::CHEST_SIZE)
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }
}

impl Inventory for SimpleInventory {
    fn size(&self) -> usize {
        self.stacks.len()
    }

    fn get_stack(&self, slot: usize) -> &ItemStack {
        &self.stacks[slot]
    }

    fn set_stack(&mut self, slot: usize, stack: ItemStack) {
        self.stacks[slot] = stack;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pumpkin_util::ResourceLocation;

    use super::{Inventory, SimpleInventory};
    use crate::item::{Item, ItemStack};

    #[test]
    fn chest_starts_empty() {
        let chest = SimpleInventory::chest();
        assert_eq!(chest.size(), 27);
        assert!(chest.is_empty());
        assert_eq!(chest.empty_slots().len(), 27);
    }

    #[test]
    fn count_and_remove() {
        let bread = Arc::new(Item::new(ResourceLocation::vanilla("bread")));
        let mut chest = SimpleInventory::new(3);
        chest.set_stack(0, ItemStack::new(4, bread.clone()));
        chest.set_stack(2, ItemStack::new(2, bread));

        assert_eq!(chest.count(&ResourceLocation::vanilla("bread")), 6);
        assert_eq!(chest.empty_slots(), vec![1]);

        let removed = chest.remove_stack(0);
        assert_eq!(removed.get_count(), 4);
        assert!(chest.get_stack(0).is_empty());
    }
}
