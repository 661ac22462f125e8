use std::{
    any::Any,
    collections::{BTreeSet, HashMap},
};

use pumpkin_config::advanced_config;
use pumpkin_util::ResourceLocation;
use thiserror::Error;

use crate::{item::ItemStack, level::Level};

use super::context::{param::ContextParam, param_set::LootContextParamSet};

/// Produces the drops of a `dynamic` entry, e.g. the contents of a shulker box.
pub type DynamicDrop<'a> = Box<dyn Fn(&mut dyn FnMut(ItemStack)) + 'a>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LootParamsError {
    #[error("Missing required parameters: {0:?}")]
    MissingRequired(Vec<&'static str>),
    #[error("Parameters not allowed in this context: {0:?}")]
    NotAllowed(Vec<&'static str>),
}

/// Everything the caller knows about the event that produced the loot.
pub struct LootParams<'a> {
    level: &'a Level,
    params: HashMap<&'static str, Box<dyn Any>>,
    dynamic_drops: HashMap<ResourceLocation, DynamicDrop<'a>>,
    luck: f32,
}

impl<'a> LootParams<'a> {
    pub fn level(&self) -> &'a Level {
        self.level
    }

    pub fn luck(&self) -> f32 {
        self.luck
    }

    pub fn has_parameter<T>(&self, param: ContextParam<T>) -> bool {
        self.params.contains_key(param.name())
    }

    pub fn get_parameter<T: 'static>(&self, param: ContextParam<T>) -> Option<&T> {
        self.params
            .get(param.name())
            .and_then(|value| value.downcast_ref())
    }

    /// Feeds the drops registered under `name` to `output`; does nothing when none are registered.
    pub fn add_dynamic_drops(&self, name: &ResourceLocation, output: &mut dyn FnMut(ItemStack)) {
        if let Some(source) = self.dynamic_drops.get(name) {
            source(output);
        }
    }
}

pub struct LootParamsBuilder<'a> {
    level: &'a Level,
    params: HashMap<&'static str, Box<dyn Any>>,
    dynamic_drops: HashMap<ResourceLocation, DynamicDrop<'a>>,
    luck: f32,
    strict: bool,
}

impl<'a> LootParamsBuilder<'a> {
    pub fn new(level: &'a Level) -> Self {
        Self {
            level,
            params: HashMap::new(),
            dynamic_drops: HashMap::new(),
            luck: 0.0,
            strict: advanced_config().loot.strict_context_params,
        }
    }

    pub fn with_parameter<T: 'static>(mut self, param: ContextParam<T>, value: T) -> Self {
        self.params.insert(param.name(), Box::new(value));
        self
    }

    pub fn with_optional_parameter<T: 'static>(
        mut self,
        param: ContextParam<T>,
        value: Option<T>,
    ) -> Self {
        match value {
            Some(value) => self.params.insert(param.name(), Box::new(value)),
            None => self.params.remove(param.name()),
        };
        self
    }

    pub fn with_luck(mut self, luck: f32) -> Self {
        self.luck = luck;
        self
    }

    pub fn with_dynamic_drop(
        mut self,
        name: ResourceLocation,
        drop: impl Fn(&mut dyn FnMut(ItemStack)) + 'a,
    ) -> Self {
        self.dynamic_drops.insert(name, Box::new(drop));
        self
    }

    /// Reject parameters the set does not allow instead of carrying them along.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self, param_set: &LootContextParamSet) -> Result<LootParams<'a>, LootParamsError> {
        let provided: BTreeSet<&'static str> = self.params.keys().copied().collect();

        let missing: Vec<_> = param_set.required().difference(&provided).copied().collect();
        if !missing.is_empty() {
            return Err(LootParamsError::MissingRequired(missing));
        }

        if self.strict {
            let extra: Vec<_> = provided.difference(param_set.allowed()).copied().collect();
            if !extra.is_empty() {
                return Err(LootParamsError::NotAllowed(extra));
            }
        }

        Ok(LootParams {
            level: self.level,
            params: self.params,
            dynamic_drops: self.dynamic_drops,
            luck: self.luck,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pumpkin_util::ResourceLocation;

    use super::{LootParamsBuilder, LootParamsError};
    use crate::{
        item::{Item, ItemStack},
        level::Level,
        loot::{
            context::{
                param::{BLOCK_STATE, BlockStateSnapshot, EXPLOSION_RADIUS, ORIGIN, Origin, TOOL},
                param_set::{BLOCK, CHEST, EMPTY},
            },
            registry::LootRegistry,
        },
    };

    fn level() -> Level {
        Level::new(0, Arc::new(LootRegistry::new()))
    }

    #[test]
    fn missing_required_is_fatal() {
        let level = level();
        let result = LootParamsBuilder::new(&level)
            .with_parameter(ORIGIN, Origin::default())
            .build(&BLOCK);
        match result {
            Err(LootParamsError::MissingRequired(missing)) => {
                assert_eq!(missing, vec!["block_state", "tool"]);
            }
            _ => panic!("expected missing parameters"),
        }
    }

    #[test]
    fn extra_parameters_are_kept_unless_strict() {
        let level = level();
        let params = LootParamsBuilder::new(&level)
            .with_parameter(ORIGIN, Origin::new(1.0, 2.0, 3.0))
            .with_parameter(EXPLOSION_RADIUS, 4.0)
            .strict(false)
            .build(&CHEST)
            .unwrap();
        assert_eq!(params.get_parameter(EXPLOSION_RADIUS), Some(&4.0));
        assert_eq!(params.get_parameter(ORIGIN).map(|o| o.y), Some(2.0));

        let strict = LootParamsBuilder::new(&level)
            .with_parameter(EXPLOSION_RADIUS, 4.0)
            .strict(true)
            .build(&EMPTY);
        assert!(matches!(strict, Err(LootParamsError::NotAllowed(_))));
    }

    #[test]
    fn typed_lookup() {
        let level = level();
        let tool = ItemStack::new(1, Arc::new(Item::new(ResourceLocation::vanilla("shears"))));
        let params = LootParamsBuilder::new(&level)
            .with_parameter(ORIGIN, Origin::default())
            .with_parameter(TOOL, tool.clone())
            .with_parameter(
                BLOCK_STATE,
                BlockStateSnapshot::new(ResourceLocation::vanilla("oak_leaves")),
            )
            .with_optional_parameter(EXPLOSION_RADIUS, None)
            .with_luck(1.5)
            .build(&BLOCK)
            .unwrap();
        assert_eq!(params.get_parameter(TOOL), Some(&tool));
        assert!(!params.has_parameter(EXPLOSION_RADIUS));
        assert_eq!(params.luck(), 1.5);
    }

    #[test]
    fn dynamic_drops() {
        let level = level();
        let stick = Arc::new(Item::new(ResourceLocation::vanilla("stick")));
        let params = LootParamsBuilder::new(&level)
            .with_dynamic_drop(ResourceLocation::vanilla("contents"), move |output| {
                output(ItemStack::new(2, stick.clone()));
                output(ItemStack::new(3, stick.clone()));
            })
            .build(&EMPTY)
            .unwrap();

        let mut total = 0;
        params.add_dynamic_drops(&ResourceLocation::vanilla("contents"), &mut |stack| {
            total += stack.get_count();
        });
        params.add_dynamic_drops(&ResourceLocation::vanilla("sherds"), &mut |_| total += 100);
        assert_eq!(total, 5);
    }
}
