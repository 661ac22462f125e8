use serde::{Deserialize, Serialize};

use crate::loot::context::LootContext;

use super::LootConditionImpl;

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct WeatherCheckCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raining: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thundering: Option<bool>,
}

impl LootConditionImpl for WeatherCheckCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let level = ctx.level();
        self.raining.is_none_or(|raining| raining == level.is_raining())
            && self
                .thundering
                .is_none_or(|thundering| thundering == level.is_thundering())
    }
}
