use std::collections::BTreeSet;

use pumpkin_util::random::RandomImpl;
use serde::{Deserialize, Serialize};

use crate::loot::{
    context::LootContext,
    number::{NumberProvider, NumberProviderImpl},
    validation::ValidationContext,
};

use super::LootConditionImpl;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct RandomChanceCondition {
    pub chance: NumberProvider,
}

impl LootConditionImpl for RandomChanceCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        // The roll happens before the chance is evaluated.
        let roll = ctx.random().next_f32();
        roll < self.chance.get_float(ctx)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.chance.referenced_params()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.chance.validate(&mut ctx.for_child(".chance"));
    }
}
