use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{
    context::LootContext,
    number::{NumberProvider, NumberProviderImpl},
    validation::ValidationContext,
};

/// Which bounds a range has. Chosen once when the range is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RangeBounds {
    Unbounded,
    AtLeast,
    AtMost,
    Between,
}

/// One bound of an [`IntRange`]. Integers stay exact instead of going through `f32`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum IntBound {
    Exact(i32),
    Provider(NumberProvider),
}

impl IntBound {
    pub fn get_int(&self, ctx: &mut LootContext) -> i32 {
        match self {
            Self::Exact(value) => *value,
            Self::Provider(provider) => provider.get_int(ctx),
        }
    }

    /// The value when it is an integer that does not depend on the evaluation.
    pub fn as_exact(&self) -> Option<i32> {
        match self {
            Self::Exact(value) => Some(*value),
            Self::Provider(provider) => {
                let value = provider.as_constant()?;
                (value.fract() == 0.0 && value >= i32::MIN as f32 && value < i32::MAX as f32)
                    .then_some(value as i32)
            }
        }
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        match self {
            Self::Exact(_) => BTreeSet::new(),
            Self::Provider(provider) => provider.referenced_params(),
        }
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        if let Self::Provider(provider) = self {
            provider.validate(ctx);
        }
    }
}

impl From<i32> for IntBound {
    fn from(value: i32) -> Self {
        Self::Exact(value)
    }
}

impl From<NumberProvider> for IntBound {
    fn from(provider: NumberProvider) -> Self {
        Self::Provider(provider)
    }
}

/// An integer range whose optional bounds are evaluated per use.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(from = "IntRangeRepr", into = "IntRangeRepr")]
pub struct IntRange {
    min: Option<IntBound>,
    max: Option<IntBound>,
    bounds: RangeBounds,
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum IntRangeRepr {
    Exact(i32),
    Bounds {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<IntBound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<IntBound>,
    },
}

impl From<IntRangeRepr> for IntRange {
    fn from(repr: IntRangeRepr) -> Self {
        match repr {
            IntRangeRepr::Exact(value) => Self::exact(value),
            IntRangeRepr::Bounds { min, max } => Self::new(min, max),
        }
    }
}

impl From<IntRange> for IntRangeRepr {
    fn from(range: IntRange) -> Self {
        if let Some(value) = range.exact_value() {
            return Self::Exact(value);
        }
        Self::Bounds {
            min: range.min,
            max: range.max,
        }
    }
}

impl IntRange {
    pub fn new(min: Option<IntBound>, max: Option<IntBound>) -> Self {
        let bounds = match (&min, &max) {
            (None, None) => RangeBounds::Unbounded,
            (Some(_), None) => RangeBounds::AtLeast,
            (None, Some(_)) => RangeBounds::AtMost,
            (Some(_), Some(_)) => RangeBounds::Between,
        };
        Self { min, max, bounds }
    }

    pub fn exact(value: i32) -> Self {
        Self::range(value, value)
    }

    pub fn range(min: i32, max: i32) -> Self {
        Self::new(Some(IntBound::Exact(min)), Some(IntBound::Exact(max)))
    }

    pub fn lower_bound(min: i32) -> Self {
        Self::new(Some(IntBound::Exact(min)), None)
    }

    pub fn upper_bound(max: i32) -> Self {
        Self::new(None, Some(IntBound::Exact(max)))
    }

    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub fn min(&self) -> Option<&IntBound> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&IntBound> {
        self.max.as_ref()
    }

    /// Both bounds are the same integral constant.
    fn exact_value(&self) -> Option<i32> {
        let min = self.min.as_ref()?.as_exact()?;
        let max = self.max.as_ref()?.as_exact()?;
        (min == max).then_some(min)
    }

    /// Evaluates both bounds (min first) and clamps `value` into them.
    pub fn clamp(&self, ctx: &mut LootContext, value: i32) -> i32 {
        match self.bounds {
            RangeBounds::Unbounded => value,
            RangeBounds::AtLeast => value.max(self.bound(&self.min, ctx)),
            RangeBounds::AtMost => value.min(self.bound(&self.max, ctx)),
            RangeBounds::Between => {
                let min = self.bound(&self.min, ctx);
                let max = self.bound(&self.max, ctx);
                // A reversed range yields `min`.
                if value < min { min } else { value.min(max) }
            }
        }
    }

    /// Evaluates both bounds (min first) and checks `min <= value <= max`.
    pub fn test(&self, ctx: &mut LootContext, value: i32) -> bool {
        match self.bounds {
            RangeBounds::Unbounded => true,
            RangeBounds::AtLeast => value >= self.bound(&self.min, ctx),
            RangeBounds::AtMost => value <= self.bound(&self.max, ctx),
            RangeBounds::Between => {
                let min = self.bound(&self.min, ctx);
                let max = self.bound(&self.max, ctx);
                min <= value && value <= max
            }
        }
    }

    fn bound(&self, bound: &Option<IntBound>, ctx: &mut LootContext) -> i32 {
        bound.as_ref().map_or(0, |bound| bound.get_int(ctx))
    }

    pub fn referenced_params(&self) -> BTreeSet<&'static str> {
        let mut params = BTreeSet::new();
        for bound in self.min.iter().chain(self.max.iter()) {
            params.extend(bound.referenced_params());
        }
        params
    }

    pub fn validate(&self, ctx: &mut ValidationContext) {
        if let Some(min) = &self.min {
            min.validate(&mut ctx.for_child(".min"));
        }
        if let Some(max) = &self.max {
            max.validate(&mut ctx.for_child(".max"));
        }
    }
}
