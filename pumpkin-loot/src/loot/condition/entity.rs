use std::collections::BTreeSet;

use pumpkin_util::ResourceLocation;
use serde::{Deserialize, Serialize};

use crate::loot::context::{
    EntityTarget, LootContext,
    param::{LAST_DAMAGE_PLAYER, LootEntity, ORIGIN},
};

use super::LootConditionImpl;

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct KilledByPlayerCondition {}

impl LootConditionImpl for KilledByPlayerCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        ctx.has_parameter(LAST_DAMAGE_PLAYER)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([LAST_DAMAGE_PLAYER.name()])
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct EntityPredicate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<ResourceLocation>,
}

impl EntityPredicate {
    pub fn matches(&self, entity: Option<&LootEntity>) -> bool {
        let Some(entity) = entity else {
            return false;
        };
        self.entity_type
            .as_ref()
            .is_none_or(|entity_type| *entity_type == entity.entity_type)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct EntityPropertiesCondition {
    pub entity: EntityTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<EntityPredicate>,
}

impl LootConditionImpl for EntityPropertiesCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        // No predicate passes even without an entity.
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate.matches(ctx.get_parameter(self.entity.param())))
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([ORIGIN.name(), self.entity.param().name()])
    }
}
