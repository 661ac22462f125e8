use serde::{Deserialize, Serialize};

use crate::{item::ItemStack, loot::context::LootContext};

use super::LootFunctionImpl;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SetNameFunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LootFunctionImpl for SetNameFunction {
    fn apply(&self, mut stack: ItemStack, _ctx: &mut LootContext) -> ItemStack {
        stack.set_custom_name(self.name.clone());
        stack
    }
}
