use std::collections::BTreeSet;

use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::{
    item::ItemStack,
    loot::{
        context::{ElementKind, LootContext, LootWarning, VisitedElement},
        validation::ValidationContext,
    },
};

use super::{LootFunction, LootFunctionImpl, apply_all, validate_all};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SequenceFunction {
    pub functions: Vec<LootFunction>,
}

impl LootFunctionImpl for SequenceFunction {
    fn apply(&self, stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        apply_all(&self.functions, stack, ctx)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.functions
            .iter()
            .flat_map(LootFunctionImpl::referenced_params)
            .collect()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        validate_all(&self.functions, ctx, ".functions");
    }
}

/// Applies the item modifier registered under `name`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ReferenceFunction {
    pub name: ResourceLocation,
}

impl LootFunctionImpl for ReferenceFunction {
    fn apply(&self, stack: ItemStack, ctx: &mut LootContext) -> ItemStack {
        let Some(function) = ctx.resolver().modifier(&self.name) else {
            ctx.warn(LootWarning::UnknownModifier(self.name.clone()));
            return stack;
        };
        let element = VisitedElement::modifier(&function);
        if !ctx.push_visited(element) {
            ctx.warn(LootWarning::InfiniteLoop);
            return stack;
        }
        let stack = function.apply(stack, ctx);
        ctx.pop_visited(element);
        stack
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        if ctx.has_visited(ElementKind::Modifier, &self.name) {
            ctx.report(format!("Function {} is recursively called", self.name));
            return;
        }
        let Some(resolver) = ctx.resolver() else {
            return;
        };
        match resolver.modifier(&self.name) {
            Some(function) => function.validate(&mut ctx.enter_element(
                &format!("->{{{}}}", self.name),
                ElementKind::Modifier,
                &self.name,
            )),
            None => ctx.report(format!("Unknown function table called {}", self.name)),
        }
    }
}
