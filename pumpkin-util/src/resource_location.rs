use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};

pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced id such as `minecraft:chests/simple_dungeon`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseResourceLocationError(pub String);

impl fmt::Display for ParseResourceLocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource location '{}'", self.0)
    }
}

impl std::error::Error for ParseResourceLocationError {}

impl ResourceLocation {
    pub fn new(namespace: &str, path: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    pub fn vanilla(path: &str) -> Self {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    fn valid_namespace_char(c: char) -> bool {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
    }

    fn valid_path_char(c: char) -> bool {
        Self::valid_namespace_char(c) || c == '/'
    }
}

impl FromStr for ResourceLocation {
    type Err = ParseResourceLocationError;

    /// Ids without a namespace fall into `minecraft`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s.split_once(':').unwrap_or((DEFAULT_NAMESPACE, s));
        if namespace.is_empty()
            || path.is_empty()
            || !namespace.chars().all(Self::valid_namespace_char)
            || !path.chars().all(Self::valid_path_char)
        {
            return Err(ParseResourceLocationError(s.to_string()));
        }
        Ok(Self::new(namespace, path))
    }
}

impl Serialize for ResourceLocation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResourceLocationVisitor;

        impl Visitor<'_> for ResourceLocationVisitor {
            type Value = ResourceLocation;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a resource location (namespace:path)")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(ResourceLocationVisitor)
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceLocation;

    #[test]
    fn parse_with_namespace() {
        let id: ResourceLocation = "pumpkin:chests/vault".parse().unwrap();
        assert_eq!(id.namespace, "pumpkin");
        assert_eq!(id.path, "chests/vault");
    }

    #[test]
    fn parse_defaults_namespace() {
        let id: ResourceLocation = "diamond".parse().unwrap();
        assert_eq!(id, ResourceLocation::vanilla("diamond"));
        assert_eq!(id.to_string(), "minecraft:diamond");
    }

    #[test]
    fn reject_invalid() {
        assert!("Minecraft:Stone".parse::<ResourceLocation>().is_err());
        assert!(":stone".parse::<ResourceLocation>().is_err());
        assert!("minecraft:".parse::<ResourceLocation>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let id: ResourceLocation = serde_json::from_str("\"stick\"").unwrap();
        assert_eq!(id, ResourceLocation::vanilla("stick"));
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"minecraft:stick\""
        );
    }
}
