use std::{collections::BTreeSet, sync::LazyLock};

use serde::{Deserialize, Serialize};

use super::param::{
    ATTACKING_ENTITY, BLOCK_ENTITY, BLOCK_STATE, ContextParam, DAMAGE_SOURCE,
    DIRECT_ATTACKING_ENTITY, EXPLOSION_RADIUS, LAST_DAMAGE_PLAYER, ORIGIN, THIS_ENTITY, TOOL,
};

/// Which parameters an evaluation must and may provide. `required` is always a subset of `allowed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LootContextParamSet {
    required: BTreeSet<&'static str>,
    allowed: BTreeSet<&'static str>,
}

impl LootContextParamSet {
    pub fn builder() -> LootContextParamSetBuilder {
        LootContextParamSetBuilder::default()
    }

    pub fn required(&self) -> &BTreeSet<&'static str> {
        &self.required
    }

    pub fn allowed(&self) -> &BTreeSet<&'static str> {
        &self.allowed
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.contains(name)
    }
}

#[derive(Default)]
pub struct LootContextParamSetBuilder {
    set: LootContextParamSet,
}

impl LootContextParamSetBuilder {
    pub fn required<T>(mut self, param: ContextParam<T>) -> Self {
        self.set.required.insert(param.name());
        self.set.allowed.insert(param.name());
        self
    }

    pub fn optional<T>(mut self, param: ContextParam<T>) -> Self {
        self.set.allowed.insert(param.name());
        self
    }

    pub fn build(self) -> LootContextParamSet {
        self.set
    }
}

macro_rules! param_set {
    ($name:ident { $(required: $($required:ident),* ;)? $(optional: $($optional:ident),* ;)? }) => {
        pub static $name: LazyLock<LootContextParamSet> = LazyLock::new(|| {
            LootContextParamSet::builder()
                $($(.required($required))*)?
                $($(.optional($optional))*)?
                .build()
        });
    };
}

param_set!(EMPTY {});
param_set!(CHEST { required: ORIGIN; optional: THIS_ENTITY, ATTACKING_ENTITY; });
param_set!(COMMAND { required: ORIGIN; optional: THIS_ENTITY; });
param_set!(SELECTOR { required: ORIGIN, THIS_ENTITY; });
param_set!(FISHING { required: ORIGIN, TOOL; optional: THIS_ENTITY; });
param_set!(ENTITY {
    required: THIS_ENTITY, ORIGIN, DAMAGE_SOURCE;
    optional: ATTACKING_ENTITY, DIRECT_ATTACKING_ENTITY, LAST_DAMAGE_PLAYER;
});
param_set!(EQUIPMENT { required: ORIGIN, THIS_ENTITY; });
param_set!(ARCHAEOLOGY { required: ORIGIN; optional: THIS_ENTITY; });
param_set!(GIFT { required: ORIGIN, THIS_ENTITY; });
param_set!(BARTER { required: THIS_ENTITY; });
param_set!(VAULT { required: ORIGIN; optional: THIS_ENTITY, TOOL; });
param_set!(ADVANCEMENT_REWARD { required: THIS_ENTITY, ORIGIN; });
param_set!(ADVANCEMENT_ENTITY { required: THIS_ENTITY, ORIGIN; });
param_set!(ALL_PARAMS {
    required: THIS_ENTITY, LAST_DAMAGE_PLAYER, DAMAGE_SOURCE, ATTACKING_ENTITY,
        DIRECT_ATTACKING_ENTITY, ORIGIN, BLOCK_STATE, BLOCK_ENTITY, TOOL, EXPLOSION_RADIUS;
});
param_set!(BLOCK {
    required: BLOCK_STATE, ORIGIN, TOOL;
    optional: THIS_ENTITY, BLOCK_ENTITY, EXPLOSION_RADIUS;
});
param_set!(SHEARING { required: ORIGIN; optional: THIS_ENTITY, TOOL; });

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LootTableType {
    #[serde(rename = "minecraft:empty", alias = "empty")]
    /// Nothing will be dropped
    Empty,
    #[serde(rename = "minecraft:chest", alias = "chest")]
    Chest,
    #[serde(rename = "minecraft:command", alias = "command")]
    Command,
    #[serde(rename = "minecraft:selector", alias = "selector")]
    Selector,
    #[serde(rename = "minecraft:fishing", alias = "fishing")]
    Fishing,
    #[serde(rename = "minecraft:entity", alias = "entity")]
    /// Mob drops
    Entity,
    #[serde(rename = "minecraft:equipment", alias = "equipment")]
    Equipment,
    #[serde(rename = "minecraft:archaeology", alias = "archaeology")]
    Archaeology,
    #[serde(rename = "minecraft:gift", alias = "gift")]
    Gift,
    #[serde(rename = "minecraft:barter", alias = "barter")]
    Barter,
    #[serde(rename = "minecraft:vault", alias = "vault")]
    Vault,
    #[serde(rename = "minecraft:advancement_reward", alias = "advancement_reward")]
    AdvancementReward,
    #[serde(rename = "minecraft:advancement_entity", alias = "advancement_entity")]
    AdvancementEntity,
    #[default]
    #[serde(rename = "minecraft:generic", alias = "generic")]
    /// Every parameter is available
    Generic,
    #[serde(rename = "minecraft:block", alias = "block")]
    /// A block was broken
    Block,
    #[serde(rename = "minecraft:shearing", alias = "shearing")]
    Shearing,
}

impl LootTableType {
    pub fn param_set(self) -> &'static LootContextParamSet {
        match self {
            Self::Empty => &EMPTY,
            Self::Chest => &CHEST,
            Self::Command => &COMMAND,
            Self::Selector => &SELECTOR,
            Self::Fishing => &FISHING,
            Self::Entity => &ENTITY,
            Self::Equipment => &EQUIPMENT,
            Self::Archaeology => &ARCHAEOLOGY,
            Self::Gift => &GIFT,
            Self::Barter => &BARTER,
            Self::Vault => &VAULT,
            Self::AdvancementReward => &ADVANCEMENT_REWARD,
            Self::AdvancementEntity => &ADVANCEMENT_ENTITY,
            Self::Generic => &ALL_PARAMS,
            Self::Block => &BLOCK,
            Self::Shearing => &SHEARING,
        }
    }
}
