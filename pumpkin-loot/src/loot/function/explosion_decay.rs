use std::collections::BTreeSet;

use pumpkin_util::random::RandomImpl;
use serde::{Deserialize, Serialize};

use crate::{
    item::ItemStack,
    loot::context::{LootContext, param::EXPLOSION_RADIUS},
};

use super::LootFunctionImpl;

/// Each item survives with probability `1 / radius`.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ExplosionDecayFunction {}

impl LootFunctionImpl for ExplosionDecayFunction {
    fn apply(&self, mut stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        let Some(&radius) = ctx.get_parameter(EXPLOSION_RADIUS) else {
            return stack;
        };
        let chance = 1.0 / radius;
        let survivors = (0..stack.get_count())
            .filter(|_| ctx.random().next_f32() <= chance)
            .count();
        stack.set_count(survivors as i32);
        stack
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([EXPLOSION_RADIUS.name()])
    }
}
