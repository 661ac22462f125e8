use std::collections::BTreeSet;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::item::ItemStack;

use super::{
    condition::{self, LootCondition},
    context::LootContext,
    validation::ValidationContext,
};

pub use count::{LimitCountFunction, SetCountFunction};
pub use explosion_decay::ExplosionDecayFunction;
pub use reference::{ReferenceFunction, SequenceFunction};
pub use set_damage::SetDamageFunction;
pub use set_name::SetNameFunction;

mod count;
mod explosion_decay;
mod reference;
mod set_damage;
mod set_name;

#[enum_dispatch]
pub trait LootFunctionImpl {
    fn apply(&self, stack: ItemStack, ctx: &mut LootContext) -> ItemStack;

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::new()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        ctx.validate_context_usage(&self.referenced_params());
    }
}

#[enum_dispatch(LootFunctionImpl)]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "function")]
pub enum LootFunctionTypes {
    #[serde(rename = "minecraft:set_count", alias = "set_count")]
    SetCount(SetCountFunction),
    #[serde(rename = "minecraft:limit_count", alias = "limit_count")]
    LimitCount(LimitCountFunction),
    #[serde(rename = "minecraft:explosion_decay", alias = "explosion_decay")]
    ExplosionDecay(ExplosionDecayFunction),
    #[serde(rename = "minecraft:set_damage", alias = "set_damage")]
    SetDamage(SetDamageFunction),
    #[serde(rename = "minecraft:set_name", alias = "set_name")]
    SetName(SetNameFunction),
    #[serde(rename = "minecraft:sequence", alias = "sequence")]
    Sequence(SequenceFunction),
    #[serde(rename = "minecraft:reference", alias = "reference")]
    Reference(ReferenceFunction),
}

/// An item function that only applies when all of its conditions pass.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LootFunction {
    #[serde(flatten)]
    pub content: LootFunctionTypes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<LootCondition>,
}

impl LootFunction {
    pub fn new(content: impl Into<LootFunctionTypes>) -> Self {
        Self {
            content: content.into(),
            conditions: Vec::new(),
        }
    }

    pub fn when(mut self, condition: impl Into<LootCondition>) -> Self {
        self.conditions.push(condition.into());
        self
    }
}

impl LootFunctionImpl for LootFunction {
    fn apply(&self, stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        if condition::all_pass(&self.conditions, ctx) {
            self.content.apply(stack, ctx)
        } else {
            stack
        }
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        let mut params = self.content.referenced_params();
        params.extend(condition::referenced_params(&self.conditions));
        params
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.content.validate(ctx);
        condition::validate_all(&self.conditions, ctx, ".conditions");
    }
}

/// Runs `functions` in order, each on the previous one's result.
pub fn apply_all(functions: &[LootFunction], stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
    functions
        .iter()
        .fold(stack, |stack, function| function.apply(stack, ctx))
}

pub fn validate_all(functions: &[LootFunction], ctx: &mut ValidationContext, path: &str) {
    for (i, function) in functions.iter().enumerate() {
        function.validate(&mut ctx.for_child(&format!("{path}[{i}]")));
    }
}
