use std::{fmt, sync::Arc, sync::LazyLock};

use pumpkin_util::ResourceLocation;

pub const DEFAULT_MAX_STACK_SIZE: u8 = 64;

static AIR: LazyLock<Arc<Item>> =
    LazyLock::new(|| Arc::new(Item::new(ResourceLocation::vanilla("air"))));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ResourceLocation,
    pub max_stack_size: u8,
    /// Items with a max damage can be damaged (tools, armor).
    pub max_damage: Option<u32>,
}

impl Item {
    pub fn new(id: ResourceLocation) -> Self {
        Self {
            id,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_damage: None,
        }
    }

    pub fn with_max_stack_size(mut self, max_stack_size: u8) -> Self {
        self.max_stack_size = max_stack_size.max(1);
        self
    }

    /// Damageable items never stack.
    pub fn with_max_damage(mut self, max_damage: u32) -> Self {
        self.max_damage = Some(max_damage);
        self.max_stack_size = 1;
        self
    }

    pub fn air() -> Arc<Self> {
        AIR.clone()
    }

    pub fn is_air(&self) -> bool {
        self.id == AIR.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemComponents {
    pub damage: Option<u32>,
    pub custom_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item_count: i32,
    pub item: Arc<Item>,
    pub components: ItemComponents,
}

impl ItemStack {
    pub fn new(item_count: i32, item: Arc<Item>) -> Self {
        Self {
            item_count,
            item,
            components: ItemComponents::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(0, Item::air())
    }

    pub fn is_empty(&self) -> bool {
        self.item_count <= 0 || self.item.is_air()
    }

    pub fn get_item(&self) -> &Item {
        &self.item
    }

    pub fn get_count(&self) -> i32 {
        if self.is_empty() { 0 } else { self.item_count }
    }

    pub fn max_stack_size(&self) -> i32 {
        i32::from(self.item.max_stack_size)
    }

    pub fn set_count(&mut self, count: i32) {
        self.item_count = count;
    }

    pub fn grow(&mut self, amount: i32) {
        self.item_count = self.item_count.saturating_add(amount);
    }

    pub fn shrink(&mut self, amount: i32) {
        self.grow(-amount);
    }

    /// Same item and components with a different count.
    pub fn copy_with_count(&self, count: i32) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let mut copy = self.clone();
        copy.item_count = count;
        copy
    }

    /// Takes up to `amount` items off this stack and returns them as a new stack.
    pub fn split(&mut self, amount: i32) -> Self {
        let taken = amount.min(self.get_count()).max(0);
        let piece = self.copy_with_count(taken);
        self.shrink(taken);
        piece
    }

    pub fn is_damageable(&self) -> bool {
        self.item.max_damage.is_some()
    }

    pub fn max_damage(&self) -> u32 {
        self.item.max_damage.unwrap_or(0)
    }

    pub fn damage_value(&self) -> u32 {
        self.components.damage.unwrap_or(0)
    }

    pub fn set_damage_value(&mut self, damage: u32) {
        self.components.damage = Some(damage.min(self.max_damage()));
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.components.custom_name.as_deref()
    }

    pub fn set_custom_name(&mut self, name: Option<String>) {
        self.components.custom_name = name;
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.get_count(), self.item.id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pumpkin_util::ResourceLocation;

    use super::{Item, ItemStack};

    fn stick() -> Arc<Item> {
        Arc::new(Item::new(ResourceLocation::vanilla("stick")))
    }

    #[test]
    fn empty_stacks() {
        assert!(ItemStack::empty().is_empty());
        assert!(ItemStack::new(0, stick()).is_empty());
        assert!(ItemStack::new(-3, stick()).is_empty());
        assert!(ItemStack::new(5, Item::air()).is_empty());
        assert!(!ItemStack::new(1, stick()).is_empty());
    }

    #[test]
    fn split_takes_at_most_count() {
        let mut stack = ItemStack::new(10, stick());
        let piece = stack.split(4);
        assert_eq!(piece.get_count(), 4);
        assert_eq!(stack.get_count(), 6);

        let rest = stack.split(100);
        assert_eq!(rest.get_count(), 6);
        assert!(stack.is_empty());
    }

    #[test]
    fn copy_keeps_components() {
        let mut stack = ItemStack::new(3, stick());
        stack.set_custom_name(Some("Walking Stick".to_string()));
        let copy = stack.copy_with_count(1);
        assert_eq!(copy.get_count(), 1);
        assert_eq!(copy.custom_name(), Some("Walking Stick"));
    }

    #[test]
    fn damageable_items_do_not_stack() {
        let pickaxe = Item::new(ResourceLocation::vanilla("iron_pickaxe")).with_max_damage(250);
        assert_eq!(pickaxe.max_stack_size, 1);

        let mut stack = ItemStack::new(1, Arc::new(pickaxe));
        assert!(stack.is_damageable());
        stack.set_damage_value(1000);
        assert_eq!(stack.damage_value(), 250);
    }
}
