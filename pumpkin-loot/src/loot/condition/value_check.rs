use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::loot::{
    context::LootContext,
    int_range::IntRange,
    number::{NumberProvider, NumberProviderImpl},
    validation::ValidationContext,
};

use super::LootConditionImpl;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ValueCheckCondition {
    pub value: NumberProvider,
    pub range: IntRange,
}

impl LootConditionImpl for ValueCheckCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let value = self.value.get_int(ctx);
        self.range.test(ctx, value)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        let mut params = self.value.referenced_params();
        params.extend(self.range.referenced_params());
        params
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.value.validate(&mut ctx.for_child(".value"));
        self.range.validate(&mut ctx.for_child(".range"));
    }
}

/// Checks the level's day time, optionally taken modulo `period`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TimeCheckCondition {
    pub value: IntRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<i64>,
}

impl LootConditionImpl for TimeCheckCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let mut time = ctx.level().day_time();
        // A zero period leaves the time as is.
        if let Some(wrapped) = self.period.and_then(|period| time.checked_rem(period)) {
            time = wrapped;
        }
        self.value.test(ctx, time as i32)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        self.value.referenced_params()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.value.validate(&mut ctx.for_child(".value"));
    }
}
