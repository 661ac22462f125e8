use std::collections::{BTreeMap, BTreeSet};

use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::loot::context::{LootContext, param::BLOCK_STATE};

use super::LootConditionImpl;

/// Matches the broken block and, optionally, the exact values of some of its properties.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct BlockStatePropertyCondition {
    pub block: ResourceLocation,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl LootConditionImpl for BlockStatePropertyCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let Some(state) = ctx.get_parameter(BLOCK_STATE) else {
            return false;
        };
        state.block == self.block
            && self
                .properties
                .iter()
                .all(|(name, value)| state.properties.get(name) == Some(value))
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([BLOCK_STATE.name()])
    }
}
