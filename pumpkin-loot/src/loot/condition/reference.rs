use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::loot::{
    context::{ElementKind, LootContext, LootWarning, VisitedElement},
    validation::ValidationContext,
};

use super::LootConditionImpl;

/// Evaluates a predicate registered under `name`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ReferenceCondition {
    pub name: ResourceLocation,
}

impl LootConditionImpl for ReferenceCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let Some(condition) = ctx.resolver().predicate(&self.name) else {
            ctx.warn(LootWarning::UnknownPredicate(self.name.clone()));
            return false;
        };
        let element = VisitedElement::predicate(&condition);
        if !ctx.push_visited(element) {
            ctx.warn(LootWarning::InfiniteLoop);
            return false;
        }
        let result = condition.test(ctx);
        ctx.pop_visited(element);
        result
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        if ctx.has_visited(ElementKind::Predicate, &self.name) {
            ctx.report(format!("Condition {} is recursively called", self.name));
            return;
        }
        let Some(resolver) = ctx.resolver() else {
            return;
        };
        match resolver.predicate(&self.name) {
            Some(condition) => condition.validate(&mut ctx.enter_element(
                &format!("->{{{}}}", self.name),
                ElementKind::Predicate,
                &self.name,
            )),
            None => ctx.report(format!("Unknown condition table called {}", self.name)),
        }
    }
}
