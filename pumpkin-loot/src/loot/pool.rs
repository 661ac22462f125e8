use pumpkin_util::random::RandomImpl;
use serde::{Deserialize, Serialize};

use crate::item::ItemStack;

use super::{
    LootOutput,
    condition::{self, LootCondition},
    context::LootContext,
    entry::{ExpandedEntry, LootPoolEntry},
    function::{self, LootFunction},
    number::{NumberProvider, NumberProviderImpl},
    validation::ValidationContext,
};

fn default_bonus_rolls() -> NumberProvider {
    NumberProvider::constant(0.0)
}

fn is_zero_constant(provider: &NumberProvider) -> bool {
    provider.as_constant() == Some(0.0)
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LootPool {
    pub rolls: NumberProvider,
    #[serde(default = "default_bonus_rolls", skip_serializing_if = "is_zero_constant")]
    pub bonus_rolls: NumberProvider,
    #[serde(default)]
    pub entries: Vec<LootPoolEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<LootCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<LootFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LootPool {
    pub fn builder() -> LootPoolBuilder {
        LootPoolBuilder::default()
    }

    /// Rolls `rolls + floor(bonus_rolls * luck)` times if every condition passes.
    /// Every stack goes through the pool's functions before reaching `output`.
    pub fn add_random_items<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        if !condition::all_pass(&self.conditions, ctx) {
            return;
        }
        let mut decorated = |stack: ItemStack, ctx: &mut LootContext<'a>| {
            let stack = function::apply_all(&self.functions, stack, ctx);
            output(stack, ctx);
        };

        let rolls = self.rolls.get_int(ctx);
        let bonus = (self.bonus_rolls.get_float(ctx) * ctx.luck()).floor() as i32;
        for _ in 0..rolls.saturating_add(bonus) {
            self.add_random_item(ctx, &mut decorated);
        }
    }

    /// One roll: expands every entry, then draws one choice by weight.
    pub fn add_random_item<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        let luck = ctx.luck();
        let mut choices: Vec<ExpandedEntry> = Vec::new();
        let mut total_weight: i32 = 0;
        for entry in &self.entries {
            entry.expand(ctx, &mut |choice| {
                let weight = choice.weight(luck);
                if weight > 0 {
                    total_weight = total_weight.saturating_add(weight);
                    choices.push(choice);
                }
            });
        }

        match choices.as_slice() {
            [] => {}
            _ if total_weight == 0 => {}
            [only] => only.create_item_stack(ctx, output),
            _ => {
                let mut remaining = ctx.random().next_bounded_i32(total_weight);
                for choice in &choices {
                    remaining -= choice.weight(luck);
                    if remaining < 0 {
                        choice.create_item_stack(ctx, output);
                        return;
                    }
                }
            }
        }
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        condition::validate_all(&self.conditions, ctx, ".conditions");
        function::validate_all(&self.functions, ctx, ".functions");
        for (i, entry) in self.entries.iter().enumerate() {
            entry.validate(&mut ctx.for_child(&format!(".entries[{i}]")));
        }
        self.rolls.validate(&mut ctx.for_child(".rolls"));
        self.bonus_rolls.validate(&mut ctx.for_child(".bonus_rolls"));
    }
}

pub struct LootPoolBuilder {
    pool: LootPool,
}

impl Default for LootPoolBuilder {
    fn default() -> Self {
        Self {
            pool: LootPool {
                rolls: NumberProvider::constant(1.0),
                bonus_rolls: default_bonus_rolls(),
                entries: Vec::new(),
                conditions: Vec::new(),
                functions: Vec::new(),
                name: None,
            },
        }
    }
}

impl LootPoolBuilder {
    pub fn set_rolls(mut self, rolls: NumberProvider) -> Self {
        self.pool.rolls = rolls;
        self
    }

    pub fn set_bonus_rolls(mut self, bonus_rolls: NumberProvider) -> Self {
        self.pool.bonus_rolls = bonus_rolls;
        self
    }

    pub fn add(mut self, entry: LootPoolEntry) -> Self {
        self.pool.entries.push(entry);
        self
    }

    pub fn when(mut self, condition: impl Into<LootCondition>) -> Self {
        self.pool.conditions.push(condition.into());
        self
    }

    pub fn apply(mut self, function: impl Into<LootFunction>) -> Self {
        self.pool.functions.push(function.into());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.pool.name = Some(name.to_string());
        self
    }

    pub fn build(self) -> LootPool {
        self.pool
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pumpkin_util::{
        ResourceLocation,
        random::{RandomGenerator, legacy_rand::LegacyRand},
    };

    use super::LootPool;
    use crate::{
        item::ItemStack,
        level::Level,
        loot::{
            LootContextBuilder, LootParamsBuilder,
            condition::{KilledByPlayerCondition, LootCondition},
            context::param_set::EMPTY,
            entry::LootPoolEntry,
            function::{LootFunction, SetCountFunction},
            number::NumberProvider,
            registry::LootRegistry,
        },
    };

    fn roll(pool: &LootPool, seed: u64, luck: f32) -> Vec<ItemStack> {
        let level = Level::new(0, Arc::new(LootRegistry::new()));
        let params = LootParamsBuilder::new(&level)
            .with_luck(luck)
            .build(&EMPTY)
            .unwrap();
        let mut ctx = LootContextBuilder::new(&params)
            .with_random(RandomGenerator::Legacy(LegacyRand::from_seed(seed)))
            .create(None);
        let mut stacks = Vec::new();
        pool.add_random_items(&mut ctx, &mut |stack, _| stacks.push(stack));
        stacks
    }

    fn item(path: &str) -> LootPoolEntry {
        LootPoolEntry::item(ResourceLocation::vanilla(path))
    }

    #[test]
    fn zero_rolls_produce_nothing() {
        let pool = LootPool::builder()
            .set_rolls(NumberProvider::constant(0.0))
            .add(item("stone"))
            .build();
        assert!(roll(&pool, 1, 0.0).is_empty());
    }

    #[test]
    fn failing_condition_skips_pool() {
        let pool = LootPool::builder()
            .set_rolls(NumberProvider::constant(3.0))
            .add(item("stone"))
            .when(LootCondition::KilledByPlayer(KilledByPlayerCondition {}))
            .build();
        assert!(roll(&pool, 1, 0.0).is_empty());
    }

    #[test]
    fn single_entry_is_deterministic() {
        let pool = LootPool::builder()
            .set_rolls(NumberProvider::constant(5.0))
            .add(item("diamond"))
            .build();
        for seed in 0..20 {
            let stacks = roll(&pool, seed, 0.0);
            assert_eq!(stacks.len(), 5);
            assert!(stacks.iter().all(|stack| stack.item.id.path == "diamond"));
        }
    }

    #[test]
    fn bonus_rolls_scale_with_luck() {
        let pool = LootPool::builder()
            .set_rolls(NumberProvider::constant(1.0))
            .set_bonus_rolls(NumberProvider::constant(1.5))
            .add(item("stone"))
            .build();
        assert_eq!(roll(&pool, 1, 0.0).len(), 1);
        assert_eq!(roll(&pool, 1, 2.0).len(), 4);
    }

    #[test]
    fn non_positive_weights_are_never_chosen() {
        let pool = LootPool::builder()
            .set_rolls(NumberProvider::constant(50.0))
            .add(item("dirt").with_weight(0))
            .add(item("gold_ingot").with_weight(5).with_quality(-10))
            .add(item("stone").with_weight(3))
            .add(item("cobblestone").with_weight(1))
            .build();
        let stacks = roll(&pool, 7, 1.0);
        assert_eq!(stacks.len(), 50);
        assert!(stacks.iter().all(|stack| {
            let path = stack.item.id.path.as_str();
            path == "stone" || path == "cobblestone"
        }));
    }

    #[test]
    fn extreme_weights_and_rolls_saturate() {
        let heavy = LootPool::builder()
            .set_rolls(NumberProvider::constant(4.0))
            .add(item("diamond").with_weight(i32::MAX))
            .add(item("emerald").with_weight(i32::MAX))
            .build();
        for seed in 0..5 {
            assert_eq!(roll(&heavy, seed, 0.0).len(), 4);
        }

        let negative = LootPool::builder()
            .set_rolls(NumberProvider::constant(i32::MIN as f32))
            .set_bonus_rolls(NumberProvider::constant(1.0))
            .add(item("stone"))
            .build();
        assert!(roll(&negative, 1, -1.0).is_empty());
    }

    #[test]
    fn pool_functions_apply_to_every_stack() {
        let pool = LootPool::builder()
            .set_rolls(NumberProvider::constant(2.0))
            .add(item("arrow"))
            .add(item("string"))
            .apply(LootFunction::new(SetCountFunction {
                count: NumberProvider::constant(4.0),
                add: false,
            }))
            .build();
        let stacks = roll(&pool, 3, 0.0);
        assert_eq!(stacks.len(), 2);
        assert!(stacks.iter().all(|stack| stack.get_count() == 4));
    }

    #[test]
    fn parse_pool() {
        let pool: LootPool = serde_json::from_str(
            r#"{
                "rolls": {"type": "minecraft:uniform", "min": 1, "max": 3},
                "entries": [{"type": "minecraft:item", "name": "minecraft:bone"}]
            }"#,
        )
        .unwrap();
        assert_eq!(pool.bonus_rolls.as_constant(), Some(0.0));
        assert!(pool.name.is_none());
    }
}
