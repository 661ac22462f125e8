use serde::{Deserialize, Serialize};

use crate::loot::{context::LootContext, validation::ValidationContext};

use super::{ExpandedEntry, LootPoolEntry};

fn validate_children(children: &[LootPoolEntry], ctx: &mut ValidationContext) {
    if children.is_empty() {
        ctx.report("Empty children list");
    }
    for (i, child) in children.iter().enumerate() {
        child.validate(&mut ctx.for_child(&format!(".children[{i}]")));
    }
}

/// The first child that can run.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AlternativeEntry {
    pub children: Vec<LootPoolEntry>,
}

impl AlternativeEntry {
    pub fn expand<'e>(
        &'e self,
        ctx: &mut LootContext,
        consumer: &mut dyn FnMut(ExpandedEntry<'e>),
    ) -> bool {
        self.children.iter().any(|child| child.expand(ctx, consumer))
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        validate_children(&self.children, ctx);
        // A child without conditions always runs, so nothing after it can.
        for (i, pair) in self.children.windows(2).enumerate() {
            if pair[0].conditions.is_empty() {
                ctx.for_child(&format!(".children[{}]", i + 1))
                    .report("Unreachable entry!");
            }
        }
    }
}

/// Children in order until one cannot run.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SequenceEntry {
    pub children: Vec<LootPoolEntry>,
}

impl SequenceEntry {
    pub fn expand<'e>(
        &'e self,
        ctx: &mut LootContext,
        consumer: &mut dyn FnMut(ExpandedEntry<'e>),
    ) -> bool {
        self.children.iter().all(|child| child.expand(ctx, consumer))
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        validate_children(&self.children, ctx);
    }
}

/// Every child that can run.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct GroupEntry {
    pub children: Vec<LootPoolEntry>,
}

impl GroupEntry {
    pub fn expand<'e>(
        &'e self,
        ctx: &mut LootContext,
        consumer: &mut dyn FnMut(ExpandedEntry<'e>),
    ) -> bool {
        for child in &self.children {
            child.expand(ctx, consumer);
        }
        true
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        validate_children(&self.children, ctx);
    }
}
