use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::loot::{context::LootContext, validation::ValidationContext};

use super::{LootCondition, LootConditionImpl, validate_all};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct InvertedCondition {
    pub term: Box<LootCondition>,
}

impl LootConditionImpl for InvertedCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        !self.term.test(ctx)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.term.referenced_params()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.term.validate(&mut ctx.for_child(".term"));
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AnyOfCondition {
    pub terms: Vec<LootCondition>,
}

impl LootConditionImpl for AnyOfCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        self.terms.iter().any(|term| term.test(ctx))
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        super::referenced_params(&self.terms)
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        validate_all(&self.terms, ctx, ".terms");
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AllOfCondition {
    pub terms: Vec<LootCondition>,
}

impl LootConditionImpl for AllOfCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        super::all_pass(&self.terms, ctx)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        super::referenced_params(&self.terms)
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        validate_all(&self.terms, ctx, ".terms");
    }
}
