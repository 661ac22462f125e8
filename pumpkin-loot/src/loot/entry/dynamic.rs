use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::loot::{LootOutput, context::LootContext};

/// Drops supplied by the caller at evaluation time, such as a container's contents.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DynamicEntry {
    pub name: ResourceLocation,
}

impl DynamicEntry {
    pub fn create_item_stack<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        let params = ctx.params();
        params.add_dynamic_drops(&self.name, &mut |stack| output(stack, ctx));
    }
}
