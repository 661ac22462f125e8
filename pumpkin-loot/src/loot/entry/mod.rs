use std::sync::Arc;

use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemStack};

use super::{
    LootOutput, LootTable,
    condition::{self, LootCondition},
    context::LootContext,
    function::{self, LootFunction},
    validation::ValidationContext,
};

pub use composite::{AlternativeEntry, GroupEntry, SequenceEntry};
pub use dynamic::DynamicEntry;
pub use item::ItemEntry;
pub use loot_table::{LootTableEntry, NestedTable};
pub use tag::TagEntry;

mod composite;
mod dynamic;
mod item;
mod loot_table;
mod tag;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum LootPoolEntryTypes {
    #[serde(rename = "minecraft:empty", alias = "empty")]
    Empty,
    #[serde(rename = "minecraft:item", alias = "item")]
    Item(ItemEntry),
    #[serde(rename = "minecraft:loot_table", alias = "loot_table")]
    LootTable(LootTableEntry),
    #[serde(rename = "minecraft:dynamic", alias = "dynamic")]
    Dynamic(DynamicEntry),
    #[serde(rename = "minecraft:tag", alias = "tag")]
    Tag(TagEntry),
    #[serde(rename = "minecraft:alternatives", alias = "alternatives")]
    Alternatives(AlternativeEntry),
    #[serde(rename = "minecraft:sequence", alias = "sequence")]
    Sequence(SequenceEntry),
    #[serde(rename = "minecraft:group", alias = "group")]
    Group(GroupEntry),
}

impl LootPoolEntryTypes {
    fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Alternatives(_) | Self::Sequence(_) | Self::Group(_)
        )
    }

    /// Emits the undecorated stacks of a leaf entry.
    fn create_item_stack<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        match self {
            Self::Item(item) => item.create_item_stack(ctx, output),
            Self::LootTable(table) => table.create_item_stack(ctx, output),
            Self::Dynamic(dynamic) => dynamic.create_item_stack(ctx, output),
            Self::Tag(tag) => tag.create_item_stack(ctx, output),
            Self::Empty | Self::Alternatives(_) | Self::Sequence(_) | Self::Group(_) => {}
        }
    }
}

fn default_weight() -> i32 {
    1
}

fn is_default_weight(weight: &i32) -> bool {
    *weight == 1
}

fn is_zero(quality: &i32) -> bool {
    *quality == 0
}

/// One entry of a pool. `weight`, `quality` and `functions` only apply to leaf entries.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LootPoolEntry {
    #[serde(flatten)]
    pub content: LootPoolEntryTypes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<LootCondition>,
    #[serde(default = "default_weight", skip_serializing_if = "is_default_weight")]
    pub weight: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub quality: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<LootFunction>,
}

/// A weighted choice produced by expanding an entry.
pub struct ExpandedEntry<'e> {
    entry: &'e LootPoolEntry,
    tag_item: Option<Arc<Item>>,
}

impl ExpandedEntry<'_> {
    /// `floor(weight + quality * luck)`, never negative.
    pub fn weight(&self, luck: f32) -> i32 {
        let weight = self.entry.weight as f32 + self.entry.quality as f32 * luck;
        (weight.floor() as i32).max(0)
    }

    /// Emits this choice's stacks with the entry's functions applied.
    pub fn create_item_stack<'a>(&self, ctx: &mut LootContext<'a>, output: &mut LootOutput<'_, 'a>) {
        let functions = &self.entry.functions;
        let mut decorated = |stack: ItemStack, ctx: &mut LootContext<'a>| {
            let stack = function::apply_all(functions, stack, ctx);
            output(stack, ctx);
        };
        match &self.tag_item {
            Some(item) => decorated(ItemStack::new(1, item.clone()), ctx),
            None => self.entry.content.create_item_stack(ctx, &mut decorated),
        }
    }
}

impl LootPoolEntry {
    pub fn new(content: LootPoolEntryTypes) -> Self {
        Self {
            content,
            conditions: Vec::new(),
            weight: 1,
            quality: 0,
            functions: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(LootPoolEntryTypes::Empty)
    }

    pub fn item(name: ResourceLocation) -> Self {
        Self::new(LootPoolEntryTypes::Item(ItemEntry { name }))
    }

    pub fn table_reference(id: ResourceLocation) -> Self {
        Self::new(LootPoolEntryTypes::LootTable(LootTableEntry {
            value: NestedTable::Reference(id),
        }))
    }

    pub fn inline_table(table: LootTable) -> Self {
        Self::new(LootPoolEntryTypes::LootTable(LootTableEntry {
            value: NestedTable::Inline(Box::new(table)),
        }))
    }

    pub fn tag(name: ResourceLocation, expand: bool) -> Self {
        Self::new(LootPoolEntryTypes::Tag(TagEntry { name, expand }))
    }

    pub fn dynamic(name: ResourceLocation) -> Self {
        Self::new(LootPoolEntryTypes::Dynamic(DynamicEntry { name }))
    }

    pub fn alternatives(children: Vec<LootPoolEntry>) -> Self {
        Self::new(LootPoolEntryTypes::Alternatives(AlternativeEntry { children }))
    }

    pub fn sequence(children: Vec<LootPoolEntry>) -> Self {
        Self::new(LootPoolEntryTypes::Sequence(SequenceEntry { children }))
    }

    pub fn group(children: Vec<LootPoolEntry>) -> Self {
        Self::new(LootPoolEntryTypes::Group(GroupEntry { children }))
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    pub fn when(mut self, condition: impl Into<LootCondition>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn apply(mut self, function: impl Into<LootFunction>) -> Self {
        self.functions.push(function.into());
        self
    }

    /// Feeds the weighted choices of this entry to `consumer`. Returns whether the entry
    /// could run, which is what `alternatives` and `sequence` branch on.
    pub fn expand<'e>(
        &'e self,
        ctx: &mut LootContext,
        consumer: &mut dyn FnMut(ExpandedEntry<'e>),
    ) -> bool {
        if !condition::all_pass(&self.conditions, ctx) {
            return false;
        }
        match &self.content {
            LootPoolEntryTypes::Alternatives(alternatives) => alternatives.expand(ctx, consumer),
            LootPoolEntryTypes::Sequence(sequence) => sequence.expand(ctx, consumer),
            LootPoolEntryTypes::Group(group) => group.expand(ctx, consumer),
            LootPoolEntryTypes::Tag(tag) if tag.expand => {
                for item in tag.items(ctx) {
                    consumer(ExpandedEntry {
                        entry: self,
                        tag_item: Some(item),
                    });
                }
                true
            }
            _ => {
                consumer(ExpandedEntry {
                    entry: self,
                    tag_item: None,
                });
                true
            }
        }
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        condition::validate_all(&self.conditions, ctx, ".conditions");
        if !self.content.is_composite() {
            function::validate_all(&self.functions, ctx, ".functions");
        }
        match &self.content {
            LootPoolEntryTypes::Empty => {}
            LootPoolEntryTypes::Item(item) => item.validate(ctx),
            LootPoolEntryTypes::LootTable(table) => table.validate(ctx),
            LootPoolEntryTypes::Dynamic(_) => {}
            LootPoolEntryTypes::Tag(tag) => tag.validate(ctx),
            LootPoolEntryTypes::Alternatives(alternatives) => alternatives.validate(ctx),
            LootPoolEntryTypes::Sequence(sequence) => sequence.validate(ctx),
            LootPoolEntryTypes::Group(group) => group.validate(ctx),
        }
    }
}
