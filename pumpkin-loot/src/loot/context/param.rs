//! Typed keys for the values a loot evaluation can read.

use std::{collections::BTreeMap, fmt, marker::PhantomData};

use pumpkin_util::ResourceLocation;

use crate::item::ItemStack;

/// A typed key into [`LootParams`](crate::loot::LootParams). The name is its identity.
pub struct ContextParam<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> ContextParam<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ContextParam<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContextParam<T> {}

impl<T> fmt::Debug for ContextParam<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<parameter {}>", self.name)
    }
}

pub const THIS_ENTITY: ContextParam<LootEntity> = ContextParam::new("this_entity");
pub const LAST_DAMAGE_PLAYER: ContextParam<LootEntity> = ContextParam::new("last_damage_player");
pub const DAMAGE_SOURCE: ContextParam<DamageSource> = ContextParam::new("damage_source");
pub const ATTACKING_ENTITY: ContextParam<LootEntity> = ContextParam::new("attacking_entity");
pub const DIRECT_ATTACKING_ENTITY: ContextParam<LootEntity> =
    ContextParam::new("direct_attacking_entity");
pub const ORIGIN: ContextParam<Origin> = ContextParam::new("origin");
pub const BLOCK_STATE: ContextParam<BlockStateSnapshot> = ContextParam::new("block_state");
pub const BLOCK_ENTITY: ContextParam<BlockEntitySnapshot> = ContextParam::new("block_entity");
pub const TOOL: ContextParam<ItemStack> = ContextParam::new("tool");
pub const EXPLOSION_RADIUS: ContextParam<f32> = ContextParam::new("explosion_radius");

#[derive(Clone, Debug, PartialEq)]
pub struct LootEntity {
    pub entity_type: ResourceLocation,
    pub name: String,
}

impl LootEntity {
    pub fn new(entity_type: ResourceLocation, name: &str) -> Self {
        Self {
            entity_type,
            name: name.to_string(),
        }
    }

    pub fn player(name: &str) -> Self {
        Self::new(ResourceLocation::vanilla("player"), name)
    }

    pub fn is_player(&self) -> bool {
        self.entity_type == ResourceLocation::vanilla("player")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DamageSource {
    pub damage_type: ResourceLocation,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Origin {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockStateSnapshot {
    pub block: ResourceLocation,
    pub properties: BTreeMap<String, String>,
}

impl BlockStateSnapshot {
    pub fn new(block: ResourceLocation) -> Self {
        Self {
            block,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockEntitySnapshot {
    pub block_entity_type: ResourceLocation,
}
