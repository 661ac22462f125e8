//! Loot tables and everything they are made of.
//!
//! A [`LootTable`] is rolled inside a [`LootContext`], which is built from the
//! [`LootParams`] describing the event (a chest opened, a block broken, an entity killed).

use crate::item::ItemStack;

pub mod condition;
pub mod context;
pub mod entry;
pub mod function;
pub mod int_range;
pub mod number;
pub mod params;
pub mod pool;
pub mod registry;
pub mod table;
pub mod validation;

pub use context::{
    EntityTarget, LootContext, LootContextBuilder, LootWarning,
    param_set::{LootContextParamSet, LootTableType},
};
pub use entry::LootPoolEntry;
pub use int_range::IntRange;
pub use number::NumberProvider;
pub use params::{LootParams, LootParamsBuilder, LootParamsError};
pub use pool::LootPool;
pub use registry::{LootDataError, LootDataResolver, LootRegistry};
pub use table::{FillReport, LootTable, LootTableError};
pub use validation::{Problem, ProblemReporter, ValidationContext};

/// Receives every stack a table, pool or entry produces, together with the context so
/// that decorating functions can keep rolling.
pub type LootOutput<'o, 'a> = dyn FnMut(ItemStack, &mut LootContext<'a>) + 'o;
