use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::{
    item::ItemStack,
    loot::{
        LootOutput,
        context::{LootContext, LootWarning},
        validation::ValidationContext,
    },
};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ItemEntry {
    pub name: ResourceLocation,
}

impl ItemEntry {
    pub fn create_item_stack<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        match ctx.resolver().item(&self.name) {
            Some(item) => output(ItemStack::new(1, item), ctx),
            None => ctx.warn(LootWarning::UnknownItem(self.name.clone())),
        }
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        if ctx
            .resolver()
            .is_some_and(|resolver| resolver.item(&self.name).is_none())
        {
            ctx.report(format!("Unknown item {}", self.name));
        }
    }
}
