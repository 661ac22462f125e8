use std::collections::HashSet;

use pumpkin_util::{
    ResourceLocation,
    random::{RandomGenerator, RandomImpl, shuffle},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{inventory::Inventory, item::ItemStack};

use super::{
    LootContextBuilder, LootOutput, LootParams,
    context::{
        LootContext, LootWarning, VisitedElement,
        param_set::{LootContextParamSet, LootTableType},
    },
    function::{self, LootFunction},
    pool::LootPool,
    validation::ValidationContext,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LootTableError {
    #[error("Duplicate pool name: {0}")]
    DuplicatePoolName(String),
}

/// What happened when a table filled a container.
#[derive(Debug, Default)]
pub struct FillReport {
    pub placed: usize,
    /// Stacks that did not fit.
    pub dropped: usize,
    pub warnings: Vec<LootWarning>,
}

/// A set of pools rolled together. Immutable once built and safe to share between threads.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(try_from = "LootTableRepr", into = "LootTableRepr")]
pub struct LootTable {
    table_type: LootTableType,
    pools: Vec<LootPool>,
    functions: Vec<LootFunction>,
    random_sequence: Option<ResourceLocation>,
}

#[derive(Deserialize, Serialize)]
struct LootTableRepr {
    #[serde(rename = "type", default)]
    table_type: LootTableType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pools: Vec<LootPool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    functions: Vec<LootFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    random_sequence: Option<ResourceLocation>,
}

impl TryFrom<LootTableRepr> for LootTable {
    type Error = LootTableError;

    fn try_from(repr: LootTableRepr) -> Result<Self, Self::Error> {
        let mut builder = LootTable::builder().set_type(repr.table_type);
        for pool in repr.pools {
            builder = builder.with_pool(pool);
        }
        for function in repr.functions {
            builder = builder.apply(function);
        }
        if let Some(sequence) = repr.random_sequence {
            builder = builder.set_random_sequence(sequence);
        }
        builder.build()
    }
}

impl From<LootTable> for LootTableRepr {
    fn from(table: LootTable) -> Self {
        Self {
            table_type: table.table_type,
            pools: table.pools,
            functions: table.functions,
            random_sequence: table.random_sequence,
        }
    }
}

impl LootTable {
    pub fn builder() -> LootTableBuilder {
        LootTableBuilder::default()
    }

    /// A table that never produces anything.
    pub fn empty() -> Self {
        Self {
            table_type: LootTableType::Empty,
            pools: Vec::new(),
            functions: Vec::new(),
            random_sequence: None,
        }
    }

    pub fn to_builder(&self) -> LootTableBuilder {
        LootTableBuilder {
            table: self.clone(),
        }
    }

    pub fn table_type(&self) -> LootTableType {
        self.table_type
    }

    pub fn param_set(&self) -> &'static LootContextParamSet {
        self.table_type.param_set()
    }

    pub fn pools(&self) -> &[LootPool] {
        &self.pools
    }

    pub fn get_pool(&self, name: &str) -> Option<&LootPool> {
        self.pools
            .iter()
            .find(|pool| pool.name.as_deref() == Some(name))
    }

    pub fn random_sequence(&self) -> Option<&ResourceLocation> {
        self.random_sequence.as_ref()
    }

    /// Rolls every pool in order without splitting oversized stacks.
    /// Re-entering a table that is already being rolled logs a warning and yields nothing.
    pub fn get_random_items_raw<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        let element = VisitedElement::table(self);
        if !ctx.push_visited(element) {
            ctx.warn(LootWarning::InfiniteLoop);
            return;
        }
        let mut decorated = |stack: ItemStack, ctx: &mut LootContext<'a>| {
            let stack = function::apply_all(&self.functions, stack, ctx);
            output(stack, ctx);
        };
        for pool in &self.pools {
            pool.add_random_items(ctx, &mut decorated);
        }
        ctx.pop_visited(element);
    }

    /// Like [`Self::get_random_items_raw`], but every stack that reaches `output` has
    /// `0 < count <= max_stack_size`.
    pub fn get_random_items<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        self.get_random_items_raw(ctx, &mut |mut stack: ItemStack, ctx: &mut LootContext<'a>| {
            if stack.is_empty() {
                return;
            }
            let max = stack.max_stack_size().max(1);
            while stack.get_count() > max {
                let piece = stack.split(max);
                output(piece, ctx);
            }
            output(stack, ctx);
        });
    }

    pub fn collect_random_items(&self, ctx: &mut LootContext) -> Vec<ItemStack> {
        let mut items = Vec::new();
        self.get_random_items(ctx, &mut |stack, _| items.push(stack));
        items
    }

    /// Rolls with the table's random sequence, or the level's random when it has none.
    pub fn get_random_items_for(&self, params: &LootParams) -> Vec<ItemStack> {
        let mut ctx = LootContextBuilder::new(params).create(self.random_sequence.as_ref());
        self.collect_random_items(&mut ctx)
    }

    /// A `seed` of `0` behaves like [`Self::get_random_items_for`].
    pub fn get_random_items_seeded(&self, params: &LootParams, seed: i64) -> Vec<ItemStack> {
        let mut ctx = LootContextBuilder::new(params)
            .with_optional_random_seed(seed)
            .create(self.random_sequence.as_ref());
        self.collect_random_items(&mut ctx)
    }

    pub fn get_random_items_with_random(
        &self,
        params: &LootParams,
        random: RandomGenerator,
    ) -> Vec<ItemStack> {
        let mut ctx = LootContextBuilder::new(params)
            .with_random(random)
            .create(self.random_sequence.as_ref());
        self.collect_random_items(&mut ctx)
    }

    /// Places the table's loot into randomly chosen empty slots of `inventory`.
    ///
    /// Stacks are split up to spread over the free slots. Whatever does not fit is dropped
    /// with a warning.
    pub fn fill(&self, inventory: &mut dyn Inventory, params: &LootParams, seed: i64) -> FillReport {
        let mut ctx = LootContextBuilder::new(params)
            .with_optional_random_seed(seed)
            .create(self.random_sequence.as_ref());
        let mut items = self.collect_random_items(&mut ctx);

        let mut slots = inventory.empty_slots();
        {
            let mut random = ctx.random();
            shuffle(&mut slots, &mut *random);
            shuffle_and_split_items(&mut items, slots.len(), &mut random);
        }

        let mut report = FillReport::default();
        let mut items = items.into_iter();
        for stack in items.by_ref() {
            let Some(slot) = slots.pop() else {
                report.dropped = 1;
                break;
            };
            if !stack.is_empty() {
                report.placed += 1;
            }
            inventory.set_stack(slot, stack);
        }
        if report.dropped > 0 {
            report.dropped += items.count();
            ctx.warn(LootWarning::OverfilledContainer {
                dropped: report.dropped,
            });
        }
        report.warnings = ctx.take_warnings();
        report
    }

    /// Reports every problem found in the pools and functions. Never stops early.
    pub fn validate(&self, ctx: &mut ValidationContext) {
        for (i, pool) in self.pools.iter().enumerate() {
            pool.validate(&mut ctx.for_child(&format!(".pools[{i}]")));
        }
        function::validate_all(&self.functions, ctx, ".functions");
    }
}

/// Splits stacks of more than one item in two until the stacks can cover `empty_slots`,
/// then shuffles everything.
fn shuffle_and_split_items(
    items: &mut Vec<ItemStack>,
    empty_slots: usize,
    random: &mut RandomGenerator,
) {
    let (mut splittable, singles): (Vec<_>, Vec<_>) = std::mem::take(items)
        .into_iter()
        .filter(|stack| !stack.is_empty())
        .partition(|stack| stack.get_count() > 1);
    *items = singles;

    while empty_slots > items.len() + splittable.len() && !splittable.is_empty() {
        let index = random.next_inbetween_i32(0, splittable.len() as i32 - 1) as usize;
        let mut stack = splittable.remove(index);
        let amount = random.next_inbetween_i32(1, stack.get_count() / 2);
        let piece = stack.split(amount);

        for part in [stack, piece] {
            if part.get_count() > 1 && random.next_bool() {
                splittable.push(part);
            } else {
                items.push(part);
            }
        }
    }

    items.append(&mut splittable);
    shuffle(items, random);
}

#[derive(Default)]
pub struct LootTableBuilder {
    table: LootTable,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            table_type: LootTableType::default(),
            pools: Vec::new(),
            functions: Vec::new(),
            random_sequence: None,
        }
    }
}

impl LootTableBuilder {
    pub fn with_pool(mut self, pool: LootPool) -> Self {
        self.table.pools.push(pool);
        self
    }

    pub fn apply(mut self, function: impl Into<LootFunction>) -> Self {
        self.table.functions.push(function.into());
        self
    }

    pub fn set_type(mut self, table_type: LootTableType) -> Self {
        self.table.table_type = table_type;
        self
    }

    pub fn set_random_sequence(mut self, random_sequence: ResourceLocation) -> Self {
        self.table.random_sequence = Some(random_sequence);
        self
    }

    /// Fails when two pools share a name.
    pub fn build(self) -> Result<LootTable, LootTableError> {
        let mut names = HashSet::new();
        for name in self.table.pools.iter().filter_map(|pool| pool.name.as_ref()) {
            if !names.insert(name) {
                return Err(LootTableError::DuplicatePoolName(name.clone()));
            }
        }
        Ok(self.table)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pumpkin_util::{
        ResourceLocation,
        random::{RandomGenerator, legacy_rand::LegacyRand},
    };

    use super::{LootTable, LootTableError, shuffle_and_split_items};
    use crate::{
        item::{Item, ItemStack},
        level::Level,
        loot::{
            LootParamsBuilder, LootTableType,
            entry::LootPoolEntry,
            function::{LootFunction, SetCountFunction},
            number::NumberProvider,
            pool::LootPool,
            registry::LootRegistry,
        },
    };

    fn pool_of(entry: LootPoolEntry, rolls: f32) -> LootPool {
        LootPool::builder()
            .set_rolls(NumberProvider::constant(rolls))
            .add(entry)
            .build()
    }

    fn set_count(count: f32) -> LootFunction {
        LootFunction::new(SetCountFunction {
            count: NumberProvider::constant(count),
            add: false,
        })
    }

    #[test]
    fn duplicate_pool_names_are_rejected() {
        let named = |name: &str| {
            LootPool::builder()
                .name(name)
                .add(LootPoolEntry::empty())
                .build()
        };
        let result = LootTable::builder()
            .with_pool(named("main"))
            .with_pool(named("main"))
            .build();
        assert_eq!(
            result,
            Err(LootTableError::DuplicatePoolName("main".to_string()))
        );

        let table = LootTable::builder()
            .with_pool(named("main"))
            .with_pool(named("bonus"))
            .build()
            .unwrap();
        assert!(table.get_pool("bonus").is_some());
        assert!(table.get_pool("missing").is_none());

        let extended = table.to_builder().with_pool(named("bonus")).build();
        assert!(extended.is_err());
    }

    #[test]
    fn oversized_stacks_are_split() {
        let level = Level::new(0, Arc::new(LootRegistry::new()));
        let table = LootTable::builder()
            .set_type(LootTableType::Empty)
            .with_pool(pool_of(LootPoolEntry::item(ResourceLocation::vanilla("stone")), 1.0))
            .apply(set_count(150.0))
            .build()
            .unwrap();
        let params = LootParamsBuilder::new(&level)
            .build(table.param_set())
            .unwrap();
        let items = table.get_random_items_seeded(&params, 5);
        let counts: Vec<i32> = items.iter().map(ItemStack::get_count).collect();
        assert_eq!(counts, vec![64, 64, 22]);
    }

    #[test]
    fn empty_stacks_are_dropped() {
        let level = Level::new(0, Arc::new(LootRegistry::new()));
        let table = LootTable::builder()
            .set_type(LootTableType::Empty)
            .with_pool(pool_of(LootPoolEntry::item(ResourceLocation::vanilla("stone")), 2.0))
            .apply(set_count(0.0))
            .build()
            .unwrap();
        let params = LootParamsBuilder::new(&level)
            .build(table.param_set())
            .unwrap();
        assert!(table.get_random_items_seeded(&params, 5).is_empty());
    }

    #[test]
    fn split_keeps_every_item() {
        let stone = Arc::new(Item::new(ResourceLocation::vanilla("stone")));
        let mut items = vec![
            ItemStack::new(32, stone.clone()),
            ItemStack::new(1, stone.clone()),
            ItemStack::new(0, stone.clone()),
            ItemStack::new(7, stone),
        ];
        let mut random = RandomGenerator::Legacy(LegacyRand::from_seed(11));
        shuffle_and_split_items(&mut items, 27, &mut random);
        assert!(items.iter().all(|stack| !stack.is_empty()));
        assert_eq!(items.iter().map(ItemStack::get_count).sum::<i32>(), 40);
        assert!(items.len() > 3 && items.len() <= 27);
    }

    #[test]
    fn serde_round_trip_keeps_type_and_sequence() {
        let table: LootTable = serde_json::from_str(
            r#"{
                "type": "minecraft:chest",
                "pools": [{"rolls": 1, "entries": [{"type": "minecraft:item", "name": "minecraft:apple"}]}],
                "random_sequence": "minecraft:chests/test",
                "unknown_field": true
            }"#,
        )
        .unwrap();
        assert_eq!(table.table_type(), LootTableType::Chest);
        assert_eq!(
            table.random_sequence(),
            Some(&ResourceLocation::vanilla("chests/test"))
        );

        let duplicate = serde_json::from_str::<LootTable>(
            r#"{"pools": [{"name": "a", "rolls": 1}, {"name": "a", "rolls": 1}]}"#,
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn tables_can_be_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LootTable>();
    }
}
