use std::collections::BTreeSet;

use pumpkin_util::random::RandomImpl;
use serde::{Deserialize, Serialize};

use crate::loot::context::{LootContext, param::EXPLOSION_RADIUS};

use super::LootConditionImpl;

/// Passes with probability `1 / radius` when the loot comes from an explosion.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct SurvivesExplosionCondition {}

impl LootConditionImpl for SurvivesExplosionCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        match ctx.get_parameter(EXPLOSION_RADIUS) {
            Some(&radius) => ctx.random().next_f32() <= 1.0 / radius,
            None => true,
        }
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([EXPLOSION_RADIUS.name()])
    }
}
