use std::collections::BTreeSet;

use enum_dispatch::enum_dispatch;
use pumpkin_util::random::RandomImpl;
use serde::{Deserialize, Serialize};

use super::{context::LootContext, validation::ValidationContext};

#[enum_dispatch]
pub trait NumberProviderImpl {
    fn get_float(&self, ctx: &mut LootContext) -> f32;

    /// Rounds half up.
    fn get_int(&self, ctx: &mut LootContext) -> i32 {
        (self.get_float(ctx) + 0.5).floor() as i32
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::new()
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        ctx.validate_context_usage(&self.referenced_params());
    }
}

/// A number drawn at evaluation time. A bare JSON number is a constant.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum NumberProvider {
    Constant(f32),
    Typed(TypedNumberProvider),
    Uniform(UniformNumberProvider),
}

impl NumberProvider {
    pub fn constant(value: f32) -> Self {
        Self::Constant(value)
    }

    pub fn uniform(min: f32, max: f32) -> Self {
        Self::Typed(TypedNumberProvider::Uniform(UniformNumberProvider {
            min: Box::new(Self::Constant(min)),
            max: Box::new(Self::Constant(max)),
        }))
    }

    pub fn binomial(n: i32, p: f32) -> Self {
        Self::Typed(TypedNumberProvider::Binomial(BinomialNumberProvider {
            n: Box::new(Self::Constant(n as f32)),
            p: Box::new(Self::Constant(p)),
        }))
    }

    /// The value when it does not depend on the evaluation.
    pub fn as_constant(&self) -> Option<f32> {
        match self {
            Self::Constant(value) => Some(*value),
            Self::Typed(TypedNumberProvider::Constant(constant)) => Some(constant.value),
            _ => None,
        }
    }
}

impl From<f32> for NumberProvider {
    fn from(value: f32) -> Self {
        Self::Constant(value)
    }
}

impl NumberProviderImpl for NumberProvider {
    fn get_float(&self, ctx: &mut LootContext) -> f32 {
        match self {
            Self::Constant(value) => *value,
            Self::Typed(provider) => provider.get_float(ctx),
            Self::Uniform(provider) => provider.get_float(ctx),
        }
    }

    fn get_int(&self, ctx: &mut LootContext) -> i32 {
        match self {
            Self::Constant(value) => (value + 0.5).floor() as i32,
            Self::Typed(provider) => provider.get_int(ctx),
            Self::Uniform(provider) => provider.get_int(ctx),
        }
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        match self {
            Self::Constant(_) => BTreeSet::new(),
            Self::Typed(provider) => provider.referenced_params(),
            Self::Uniform(provider) => provider.referenced_params(),
        }
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        match self {
            Self::Constant(_) => {}
            Self::Typed(provider) => provider.validate(ctx),
            Self::Uniform(provider) => provider.validate(ctx),
        }
    }
}

#[enum_dispatch(NumberProviderImpl)]
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum TypedNumberProvider {
    #[serde(rename = "minecraft:constant", alias = "constant")]
    Constant(ConstantNumberProvider),
    #[serde(rename = "minecraft:uniform", alias = "uniform")]
    Uniform(UniformNumberProvider),
    #[serde(rename = "minecraft:binomial", alias = "binomial")]
    Binomial(BinomialNumberProvider),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ConstantNumberProvider {
    pub value: f32,
}

impl NumberProviderImpl for ConstantNumberProvider {
    fn get_float(&self, _ctx: &mut LootContext) -> f32 {
        self.value
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct UniformNumberProvider {
    pub min: Box<NumberProvider>,
    pub max: Box<NumberProvider>,
}

impl NumberProviderImpl for UniformNumberProvider {
    fn get_float(&self, ctx: &mut LootContext) -> f32 {
        let min = self.min.get_float(ctx);
        let max = self.max.get_float(ctx);
        ctx.random().next_f32_between(min, max)
    }

    fn get_int(&self, ctx: &mut LootContext) -> i32 {
        let min = self.min.get_int(ctx);
        let max = self.max.get_int(ctx);
        ctx.random().next_inbetween_i32(min, max)
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        let mut params = self.min.referenced_params();
        params.extend(self.max.referenced_params());
        params
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.min.validate(&mut ctx.for_child(".min"));
        self.max.validate(&mut ctx.for_child(".max"));
    }
}

/// Number of successes out of `n` trials with probability `p`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct BinomialNumberProvider {
    pub n: Box<NumberProvider>,
    pub p: Box<NumberProvider>,
}

impl NumberProviderImpl for BinomialNumberProvider {
    fn get_float(&self, ctx: &mut LootContext) -> f32 {
        self.get_int(ctx) as f32
    }

    fn get_int(&self, ctx: &mut LootContext) -> i32 {
        let n = self.n.get_int(ctx);
        let p = self.p.get_float(ctx);
        let mut successes = 0;
        for _ in 0..n {
            if ctx.random().next_f32() < p {
                successes += 1;
            }
        }
        successes
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        let mut params = self.n.referenced_params();
        params.extend(self.p.referenced_params());
        params
    }

    fn validate(&self, ctx: &mut ValidationContext) {
        self.n.validate(&mut ctx.for_child(".n"));
        self.p.validate(&mut ctx.for_child(".p"));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pumpkin_util::random::{RandomGenerator, legacy_rand::LegacyRand};

    use super::{NumberProvider, NumberProviderImpl, TypedNumberProvider};
    use crate::{
        level::Level,
        loot::{LootContextBuilder, LootParamsBuilder, context::param_set::EMPTY, registry::LootRegistry},
    };

    #[test]
    fn parse_forms() {
        let constant: NumberProvider = serde_json::from_str("3").unwrap();
        assert_eq!(constant.as_constant(), Some(3.0));

        let typed: NumberProvider =
            serde_json::from_str(r#"{"type": "minecraft:constant", "value": 2.5}"#).unwrap();
        assert_eq!(typed.as_constant(), Some(2.5));

        let uniform: NumberProvider =
            serde_json::from_str(r#"{"type": "minecraft:uniform", "min": 1, "max": 3}"#).unwrap();
        assert!(matches!(
            uniform,
            NumberProvider::Typed(TypedNumberProvider::Uniform(_))
        ));

        let untyped: NumberProvider = serde_json::from_str(r#"{"min": 1, "max": 3}"#).unwrap();
        assert!(matches!(untyped, NumberProvider::Uniform(_)));

        let binomial: NumberProvider =
            serde_json::from_str(r#"{"type": "binomial", "n": 3, "p": 0.5}"#).unwrap();
        assert_eq!(binomial.as_constant(), None);
    }

    #[test]
    fn values_stay_in_range() {
        let level = Level::new(0, Arc::new(LootRegistry::new()));
        let params = LootParamsBuilder::new(&level).build(&EMPTY).unwrap();
        let mut ctx = LootContextBuilder::new(&params)
            .with_random(RandomGenerator::Legacy(LegacyRand::from_seed(99)))
            .create(None);

        let uniform = NumberProvider::uniform(2.0, 5.0);
        let binomial = NumberProvider::binomial(4, 0.5);
        for _ in 0..200 {
            let int = uniform.get_int(&mut ctx);
            assert!((2..=5).contains(&int));
            let float = uniform.get_float(&mut ctx);
            assert!((2.0..5.0).contains(&float));
            assert!((0..=4).contains(&binomial.get_int(&mut ctx)));
        }

        assert_eq!(NumberProvider::constant(2.5).get_int(&mut ctx), 3);
        assert_eq!(NumberProvider::constant(2.4).get_int(&mut ctx), 2);
        assert_eq!(NumberProvider::binomial(5, 1.0).get_int(&mut ctx), 5);
        assert_eq!(NumberProvider::binomial(5, 0.0).get_int(&mut ctx), 0);
    }
}
