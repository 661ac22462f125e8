use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use pumpkin_util::{
    ResourceLocation,
    random::{RandomGenerator, legacy_rand::LegacyRand},
};
use thiserror::Error;

use crate::{
    item::ItemStack,
    level::{Level, SharedRandom},
};

use super::{
    LootParams,
    condition::LootCondition,
    function::LootFunction,
    registry::LootDataResolver,
    table::LootTable,
};

use param::{
    ATTACKING_ENTITY, ContextParam, DIRECT_ATTACKING_ENTITY, LAST_DAMAGE_PLAYER, LootEntity,
    THIS_ENTITY,
};

pub mod param;
pub mod param_set;

/// Something recoverable that happened while evaluating loot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LootWarning {
    #[error("Detected infinite loop in loot tables")]
    InfiniteLoop,
    #[error("Unknown loot table called {0}")]
    UnknownTable(ResourceLocation),
    #[error("Unknown predicate {0}")]
    UnknownPredicate(ResourceLocation),
    #[error("Unknown item modifier {0}")]
    UnknownModifier(ResourceLocation),
    #[error("Unknown item {0}")]
    UnknownItem(ResourceLocation),
    #[error("Unknown item tag {0}")]
    UnknownTag(ResourceLocation),
    #[error("Tried to over-fill a container, dropped {dropped} stacks")]
    OverfilledContainer { dropped: usize },
    #[error("Couldn't set damage of loot item {0}")]
    UndamageableItem(ResourceLocation),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Table,
    Predicate,
    Modifier,
}

/// A table, predicate or modifier currently being evaluated, identified by address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisitedElement {
    kind: ElementKind,
    identity: usize,
}

impl VisitedElement {
    pub fn table(table: &LootTable) -> Self {
        Self {
            kind: ElementKind::Table,
            identity: std::ptr::from_ref(table) as usize,
        }
    }

    pub fn predicate(condition: &LootCondition) -> Self {
        Self {
            kind: ElementKind::Predicate,
            identity: std::ptr::from_ref(condition) as usize,
        }
    }

    pub fn modifier(function: &LootFunction) -> Self {
        Self {
            kind: ElementKind::Modifier,
            identity: std::ptr::from_ref(function) as usize,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTarget {
    This,
    Attacker,
    DirectAttacker,
    AttackingPlayer,
}

impl EntityTarget {
    pub fn param(self) -> ContextParam<LootEntity> {
        match self {
            Self::This => THIS_ENTITY,
            Self::Attacker => ATTACKING_ENTITY,
            Self::DirectAttacker => DIRECT_ATTACKING_ENTITY,
            Self::AttackingPlayer => LAST_DAMAGE_PLAYER,
        }
    }
}

/// State of a single evaluation: the params, the random in use and the elements being visited.
///
/// Not shared between threads; every evaluation builds its own.
pub struct LootContext<'a> {
    params: &'a LootParams<'a>,
    random: SharedRandom,
    resolver: &'a dyn LootDataResolver,
    visited: Vec<VisitedElement>,
    warnings: Vec<LootWarning>,
}

impl<'a> LootContext<'a> {
    /// Locks the random for one draw. Holding the guard across another evaluation on
    /// the same random deadlocks.
    pub fn random(&self) -> MutexGuard<'_, RandomGenerator> {
        self.random.lock()
    }

    pub fn luck(&self) -> f32 {
        self.params.luck()
    }

    pub fn level(&self) -> &'a Level {
        self.params.level()
    }

    pub fn params(&self) -> &'a LootParams<'a> {
        self.params
    }

    pub fn resolver(&self) -> &'a dyn LootDataResolver {
        self.resolver
    }

    pub fn has_parameter<T>(&self, param: ContextParam<T>) -> bool {
        self.params.has_parameter(param)
    }

    pub fn get_parameter<T: 'static>(&self, param: ContextParam<T>) -> Option<&'a T> {
        self.params.get_parameter(param)
    }

    pub fn add_dynamic_drops(&self, name: &ResourceLocation, output: &mut dyn FnMut(ItemStack)) {
        self.params.add_dynamic_drops(name, output);
    }

    /// Marks `element` as being evaluated. Returns `false` if it already is, i.e. a cycle.
    pub fn push_visited(&mut self, element: VisitedElement) -> bool {
        if self.has_visited(element) {
            return false;
        }
        self.visited.push(element);
        true
    }

    pub fn pop_visited(&mut self, element: VisitedElement) {
        if let Some(index) = self.visited.iter().rposition(|visited| *visited == element) {
            self.visited.remove(index);
        }
    }

    pub fn has_visited(&self, element: VisitedElement) -> bool {
        self.visited.contains(&element)
    }

    pub fn warn(&mut self, warning: LootWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[LootWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<LootWarning> {
        std::mem::take(&mut self.warnings)
    }
}

pub struct LootContextBuilder<'a> {
    params: &'a LootParams<'a>,
    random: Option<RandomGenerator>,
    resolver: Option<&'a dyn LootDataResolver>,
}

impl<'a> LootContextBuilder<'a> {
    pub fn new(params: &'a LootParams<'a>) -> Self {
        Self {
            params,
            random: None,
            resolver: None,
        }
    }

    pub fn with_random(mut self, random: RandomGenerator) -> Self {
        self.random = Some(random);
        self
    }

    /// A seed of `0` means no seed.
    pub fn with_optional_random_seed(mut self, seed: i64) -> Self {
        if seed != 0 {
            self.random = Some(RandomGenerator::Legacy(LegacyRand::from_seed(seed as u64)));
        }
        self
    }

    /// Overrides the level's data for lookups of referenced tables, predicates and modifiers.
    pub fn with_resolver(mut self, resolver: &'a dyn LootDataResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Picks the random: the explicit one, else the level's sequence named `random_sequence`,
    /// else the level's ambient random.
    pub fn create(self, random_sequence: Option<&ResourceLocation>) -> LootContext<'a> {
        let level = self.params.level();
        let random = match (self.random, random_sequence) {
            (Some(random), _) => Arc::new(Mutex::new(random)),
            (None, Some(sequence)) => level.random_sequence(sequence),
            (None, None) => level.random(),
        };
        LootContext {
            params: self.params,
            random,
            resolver: self.resolver.unwrap_or_else(|| level.data()),
            visited: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
