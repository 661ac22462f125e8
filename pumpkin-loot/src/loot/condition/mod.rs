use std::collections::BTreeSet;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{context::LootContext, validation::ValidationContext};

pub use block_state_property::BlockStatePropertyCondition;
pub use composite::{AllOfCondition, AnyOfCondition, InvertedCondition};
pub use entity::{EntityPredicate, EntityPropertiesCondition, KilledByPlayerCondition};
pub use match_tool::{ItemMatcher, ItemPredicate, MatchToolCondition};
pub use random_chance::RandomChanceCondition;
pub use reference::ReferenceCondition;
pub use survives_explosion::SurvivesExplosionCondition;
pub use value_check::{TimeCheckCondition, ValueCheckCondition};
pub use weather_check::WeatherCheckCondition;

mod block_state_property;
mod composite;
mod entity;
mod match_tool;
mod random_chance;
mod reference;
mod survives_explosion;
mod value_check;
mod weather_check;

#[enum_dispatch]
pub trait LootConditionImpl {
    fn test(&self, ctx: &mut LootContext) -> bool;

    /// Context parameters this condition reads.
    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::new()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        ctx.validate_context_usage(&self.referenced_params());
    }
}

#[enum_dispatch(LootConditionImpl)]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "condition")]
pub enum LootCondition {
    #[serde(rename = "minecraft:inverted", alias = "inverted")]
    Inverted(InvertedCondition),
    #[serde(rename = "minecraft:any_of", alias = "any_of")]
    AnyOf(AnyOfCondition),
    #[serde(rename = "minecraft:all_of", alias = "all_of")]
    AllOf(AllOfCondition),
    #[serde(rename = "minecraft:random_chance", alias = "random_chance")]
    RandomChance(RandomChanceCondition),
    #[serde(rename = "minecraft:entity_properties", alias = "entity_properties")]
    EntityProperties(EntityPropertiesCondition),
    #[serde(rename = "minecraft:killed_by_player", alias = "killed_by_player")]
    KilledByPlayer(KilledByPlayerCondition),
    #[serde(rename = "minecraft:block_state_property", alias = "block_state_property")]
    BlockStateProperty(BlockStatePropertyCondition),
    #[serde(rename = "minecraft:match_tool", alias = "match_tool")]
    MatchTool(MatchToolCondition),
    #[serde(rename = "minecraft:survives_explosion", alias = "survives_explosion")]
    SurvivesExplosion(SurvivesExplosionCondition),
    #[serde(rename = "minecraft:weather_check", alias = "weather_check")]
    WeatherCheck(WeatherCheckCondition),
    #[serde(rename = "minecraft:reference", alias = "reference")]
    Reference(ReferenceCondition),
    #[serde(rename = "minecraft:time_check", alias = "time_check")]
    TimeCheck(TimeCheckCondition),
    #[serde(rename = "minecraft:value_check", alias = "value_check")]
    ValueCheck(ValueCheckCondition),
}

/// `true` when every condition passes. Stops at the first failure.
pub fn all_pass(conditions: &[LootCondition], ctx: &mut LootContext) -> bool {
    conditions.iter().all(|condition| condition.test(ctx))
}

pub fn referenced_params(conditions: &[LootCondition]) -> BTreeSet<&'static str> {
    conditions
        .iter()
        .flat_map(LootConditionImpl::referenced_params)
        .collect()
}

/// Validates each condition under `{path}[i]`.
pub fn validate_all(conditions: &[LootCondition], ctx: &mut ValidationContext, path: &str) {
    for (i, condition) in conditions.iter().enumerate() {
        condition.validate(&mut ctx.for_child(&format!("{path}[{i}]")));
    }
}

#[cfg(test)]
mod tests {
    use super::LootCondition;

    #[test]
    fn parse_with_and_without_namespace() {
        let conditions: Vec<LootCondition> = serde_json::from_str(
            r#"[
                {"condition": "minecraft:survives_explosion"},
                {"condition": "killed_by_player"},
                {"condition": "minecraft:inverted", "term": {"condition": "minecraft:killed_by_player"}},
                {"condition": "minecraft:random_chance", "chance": 0.5},
                {"condition": "minecraft:time_check", "value": {"min": 0, "max": 12000}, "period": 24000}
            ]"#,
        )
        .unwrap();
        assert_eq!(conditions.len(), 5);
        assert!(matches!(conditions[0], LootCondition::SurvivesExplosion(_)));
        assert!(matches!(conditions[1], LootCondition::KilledByPlayer(_)));
        assert!(matches!(conditions[2], LootCondition::Inverted(_)));
    }

    #[test]
    fn serialize_uses_namespaced_tag() {
        let condition: LootCondition =
            serde_json::from_str(r#"{"condition": "survives_explosion"}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&condition).unwrap(),
            r#"{"condition":"minecraft:survives_explosion"}"#
        );
    }
}
