use std::{collections::BTreeSet, fmt, str::FromStr};

use pumpkin_util::{ResourceLocation, resource_location::ParseResourceLocationError};
use serde::{Deserialize, Serialize};

use crate::{
    item::ItemStack,
    loot::{
        context::{LootContext, param::TOOL},
        int_range::IntRange,
        registry::LootDataResolver,
    },
};

use super::LootConditionImpl;

/// An item id, or an item tag when written with a leading `#`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum ItemMatcher {
    Item(ResourceLocation),
    Tag(ResourceLocation),
}

impl ItemMatcher {
    pub fn matches(&self, item: &ResourceLocation, resolver: &dyn LootDataResolver) -> bool {
        match self {
            Self::Item(id) => id == item,
            Self::Tag(tag) => resolver
                .item_tag(tag)
                .is_some_and(|items| items.iter().any(|tagged| tagged.id == *item)),
        }
    }
}

impl FromStr for ItemMatcher {
    type Err = ParseResourceLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('#') {
            Some(tag) => Ok(Self::Tag(tag.parse()?)),
            None => Ok(Self::Item(s.parse()?)),
        }
    }
}

impl TryFrom<String> for ItemMatcher {
    type Error = ParseResourceLocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ItemMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::Tag(tag) => write!(f, "#{tag}"),
        }
    }
}

impl From<ItemMatcher> for String {
    fn from(matcher: ItemMatcher) -> Self {
        matcher.to_string()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ItemMatchers {
    One(ItemMatcher),
    Many(Vec<ItemMatcher>),
}

impl ItemMatchers {
    fn as_slice(&self) -> &[ItemMatcher] {
        match self {
            Self::One(matcher) => std::slice::from_ref(matcher),
            Self::Many(matchers) => matchers,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ItemPredicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemMatchers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<IntRange>,
}

impl ItemPredicate {
    pub fn matches(&self, stack: &ItemStack, ctx: &mut LootContext) -> bool {
        if let Some(items) = &self.items {
            let resolver = ctx.resolver();
            let id = &stack.get_item().id;
            if !items
                .as_slice()
                .iter()
                .any(|matcher| matcher.matches(id, resolver))
            {
                return false;
            }
        }
        self.count
            .as_ref()
            .is_none_or(|count| count.test(ctx, stack.get_count()))
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct MatchToolCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<ItemPredicate>,
}

impl LootConditionImpl for MatchToolCondition {
    fn test(&self, ctx: &mut LootContext) -> bool {
        let Some(tool) = ctx.get_parameter(TOOL) else {
            return false;
        };
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate.matches(tool, ctx))
    }

    fn referenced_params(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([TOOL.name()])
    }
}
