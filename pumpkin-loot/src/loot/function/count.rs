use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    item::ItemStack,
    loot::{
        context::LootContext,
        int_range::IntRange,
        number::{NumberProvider, NumberProviderImpl},
        validation::ValidationContext,
    },
};

use super::LootFunctionImpl;

/// Sets the count, or adds to it when `add` is set.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SetCountFunction {
    pub count: NumberProvider,
    #[serde(default)]
    pub add: bool,
}

impl LootFunctionImpl for SetCountFunction {
    fn apply(&self, mut stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        let base = if self.add { stack.get_count() } else { 0 };
        stack.set_count(base + self.count.get_int(ctx));
        stack
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.count.referenced_params()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.count.validate(&mut ctx.for_child(".count"));
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LimitCountFunction {
    pub limit: IntRange,
}

impl LootFunctionImpl for LimitCountFunction {
    fn apply(&self, mut stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        let count = self.limit.clamp(ctx, stack.get_count());
        stack.set_count(count);
        stack
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.limit.referenced_params()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.limit.validate(&mut ctx.for_child(".limit"));
    }
}
