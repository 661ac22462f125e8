use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::loot::{
    LootOutput, LootTable,
    context::{ElementKind, LootContext, LootWarning},
    validation::ValidationContext,
};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum NestedTable {
    Reference(ResourceLocation),
    Inline(Box<LootTable>),
}

/// Rolls another table into this pool. The nested table's stacks are not split.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LootTableEntry {
    pub value: NestedTable,
}

impl LootTableEntry {
    pub fn create_item_stack<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        match &self.value {
            NestedTable::Reference(id) => match ctx.resolver().table(id) {
                Some(table) => table.get_random_items_raw(ctx, output),
                None => ctx.warn(LootWarning::UnknownTable(id.clone())),
            },
            NestedTable::Inline(table) => table.get_random_items_raw(ctx, output),
        }
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        match &self.value {
            NestedTable::Reference(id) => {
                if ctx.has_visited(ElementKind::Table, id) {
                    ctx.report(format!("Table {id} is recursively called"));
                    return;
                }
                let Some(resolver) = ctx.resolver() else {
                    return;
                };
                match resolver.table(id) {
                    Some(table) => table.validate(&mut ctx.enter_element(
                        &format!("->{{{id}}}"),
                        ElementKind::Table,
                        id,
                    )),
                    None => ctx.report(format!("Unknown loot table called {id}")),
                }
            }
            NestedTable::Inline(table) => table.validate(&mut ctx.for_child("->{inline}")),
        }
    }
}
