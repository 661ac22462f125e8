use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    item::ItemStack,
    loot::{
        context::{LootContext, LootWarning},
        number::{NumberProvider, NumberProviderImpl},
        validation::ValidationContext,
    },
};

use super::LootFunctionImpl;

/// Sets durability as a fraction of the maximum: `1.0` is undamaged.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SetDamageFunction {
    pub damage: NumberProvider,
    #[serde(default)]
    pub add: bool,
}

impl LootFunctionImpl for SetDamageFunction {
    fn apply(&self, mut stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        if !stack.is_damageable() {
            ctx.warn(LootWarning::UndamageableItem(stack.get_item().id.clone()));
            return stack;
        }
        let max_damage = stack.max_damage() as f32;
        let current = if self.add {
            1.0 - stack.damage_value() as f32 / max_damage
        } else {
            0.0
        };
        let durability = (self.damage.get_float(ctx) + current).clamp(0.0, 1.0);
        stack.set_damage_value(((1.0 - durability) * max_damage).floor() as u32);
        stack
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.damage.referenced_params()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.damage.validate(&mut ctx.for_child(".damage"));
    }
}
