use std::sync::Arc;

use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::{
    item::{Item, ItemStack},
    loot::{
        LootOutput,
        context::{LootContext, LootWarning},
        validation::ValidationContext,
    },
};

/// All items of a tag. With `expand`, each item becomes its own weighted choice;
/// otherwise one stack of every item is emitted.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TagEntry {
    pub name: ResourceLocation,
    #[serde(default)]
    pub expand: bool,
}

impl TagEntry {
    pub(super) fn items(&self, ctx: &mut LootContext) -> Vec<Arc<Item>> {
        match ctx.resolver().item_tag(&self.name) {
            Some(items) => items,
            None => {
                ctx.warn(LootWarning::UnknownTag(self.name.clone()));
                Vec::new()
            }
        }
    }

    pub fn create_item_stack<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        for item in self.items(ctx) {
            output(ItemStack::new(1, item), ctx);
        }
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        if ctx
            .resolver()
            .is_some_and(|resolver| resolver.item_tag(&self.name).is_none())
        {
            ctx.report(format!("Unknown item tag {}", self.name));
        }
    }
}
