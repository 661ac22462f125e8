use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use pumpkin_config::advanced_config;
use pumpkin_util::ResourceLocation;
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::item::Item;

use super::{
    LootTable,
    condition::{AllOfCondition, ItemMatcher, LootCondition, LootConditionImpl},
    context::{ElementKind, param_set::ALL_PARAMS},
    function::{LootFunction, LootFunctionImpl, SequenceFunction},
    validation::{ProblemReporter, ValidationContext},
};

/// Where evaluation looks up everything that is referenced by id.
///
/// `table`, `predicate` and `modifier` must hand out the same `Arc` for the same id on
/// every call. Recursion guards track visited elements by address, so a fresh allocation
/// per lookup lets a cyclic reference loop until the depth limit.
pub trait LootDataResolver: Send + Sync {
    fn table(&self, id: &ResourceLocation) -> Option<Arc<LootTable>>;

    fn predicate(&self, id: &ResourceLocation) -> Option<Arc<LootCondition>>;

    fn modifier(&self, id: &ResourceLocation) -> Option<Arc<LootFunction>>;

    fn item(&self, id: &ResourceLocation) -> Option<Arc<Item>>;

    /// The items of a tag, nested tags included.
    fn item_tag(&self, id: &ResourceLocation) -> Option<Vec<Arc<Item>>>;
}

#[derive(Error, Debug)]
pub enum LootDataError {
    #[error("Couldn't read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Couldn't parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0:?} is not a valid resource path")]
    InvalidPath(PathBuf),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Deserialize)]
struct TagFile {
    #[serde(default)]
    replace: bool,
    values: Vec<TagValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagValue {
    Plain(ItemMatcher),
    Detailed { id: ItemMatcher },
}

impl TagValue {
    fn into_matcher(self) -> ItemMatcher {
        match self {
            Self::Plain(matcher) | Self::Detailed { id: matcher } => matcher,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DataKind {
    Table,
    Predicate,
    Modifier,
    ItemTag,
}

/// In-memory loot data, usually loaded from a data pack directory.
pub struct LootRegistry {
    tables: HashMap<ResourceLocation, Arc<LootTable>>,
    predicates: HashMap<ResourceLocation, Arc<LootCondition>>,
    modifiers: HashMap<ResourceLocation, Arc<LootFunction>>,
    items: HashMap<ResourceLocation, Arc<Item>>,
    tags: HashMap<ResourceLocation, Vec<ItemMatcher>>,
    implicit_items: bool,
    implicit_max_stack_size: u8,
}

impl Default for LootRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LootRegistry {
    pub fn new() -> Self {
        let config = &advanced_config().loot;
        Self {
            tables: HashMap::new(),
            predicates: HashMap::new(),
            modifiers: HashMap::new(),
            items: HashMap::new(),
            tags: HashMap::new(),
            implicit_items: config.implicit_items,
            implicit_max_stack_size: config.implicit_max_stack_size,
        }
    }

    pub fn register_table(&mut self, id: ResourceLocation, table: LootTable) -> Arc<LootTable> {
        let table = Arc::new(table);
        self.tables.insert(id, table.clone());
        table
    }

    pub fn register_predicate(&mut self, id: ResourceLocation, condition: LootCondition) {
        self.predicates.insert(id, Arc::new(condition));
    }

    pub fn register_modifier(&mut self, id: ResourceLocation, function: LootFunction) {
        self.modifiers.insert(id, Arc::new(function));
    }

    pub fn register_item(&mut self, item: Item) {
        self.items.insert(item.id.clone(), Arc::new(item));
    }

    /// Entries written `#namespace:path` include another tag.
    pub fn register_tag(&mut self, id: ResourceLocation, values: Vec<ItemMatcher>) {
        self.tags.entry(id).or_default().extend(values);
    }

    pub fn tables(&self) -> impl Iterator<Item = (&ResourceLocation, &Arc<LootTable>)> {
        self.tables.iter()
    }

    /// Loads every loot table, predicate, item modifier and item tag under `root/data`.
    /// Stops at the first file that can't be read or parsed.
    pub fn load_from_dir(&mut self, root: &Path) -> Result<usize, LootDataError> {
        self.load_dir_with(root, |error| Err(error))
    }

    /// Like [`Self::load_from_dir`], but skips broken files and returns their errors.
    pub fn load_from_dir_lenient(&mut self, root: &Path) -> Vec<LootDataError> {
        let mut errors = Vec::new();
        let result = self.load_dir_with(root, |error| {
            log::warn!("Skipping loot data: {error}");
            errors.push(error);
            Ok(())
        });
        if let Err(error) = result {
            errors.push(error);
        }
        errors
    }

    fn load_dir_with(
        &mut self,
        root: &Path,
        mut on_error: impl FnMut(LootDataError) -> Result<(), LootDataError>,
    ) -> Result<usize, LootDataError> {
        let data_dir = root.join("data");
        let mut loaded = 0;
        for entry in WalkDir::new(&data_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    on_error(error.into())?;
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|extension| extension != "json")
            {
                continue;
            }
            let Some((kind, id)) = Self::classify(&data_dir, path) else {
                log::debug!("Ignoring {path:?}");
                continue;
            };
            match self.load_file(kind, &id, path) {
                Ok(()) => loaded += 1,
                Err(error) => on_error(error)?,
            }
        }
        log::debug!("Loaded {loaded} loot data files from {data_dir:?}");
        Ok(loaded)
    }

    /// Maps `data/<namespace>/<kind>/<path>.json` to its kind and id.
    fn classify(data_dir: &Path, path: &Path) -> Option<(DataKind, String)> {
        let relative = path.strip_prefix(data_dir).ok()?.with_extension("");
        let parts: Vec<&str> = relative
            .iter()
            .map(|part| part.to_str())
            .collect::<Option<_>>()?;
        let (namespace, kind, rest) = match parts.as_slice() {
            [namespace, "loot_table" | "loot_tables", rest @ ..] => {
                (namespace, DataKind::Table, rest)
            }
            [namespace, "predicate" | "predicates", rest @ ..] => {
                (namespace, DataKind::Predicate, rest)
            }
            [namespace, "item_modifier" | "item_modifiers", rest @ ..] => {
                (namespace, DataKind::Modifier, rest)
            }
            [namespace, "tags", "item" | "items", rest @ ..] => {
                (namespace, DataKind::ItemTag, rest)
            }
            _ => return None,
        };
        Some((kind, format!("{namespace}:{}", rest.join("/"))))
    }

    fn load_file(&mut self, kind: DataKind, id: &str, path: &Path) -> Result<(), LootDataError> {
        let id: ResourceLocation = id
            .parse()
            .map_err(|_| LootDataError::InvalidPath(path.to_path_buf()))?;
        let content = fs::read_to_string(path).map_err(|source| LootDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source: serde_json::Error| LootDataError::Parse {
            path: path.to_path_buf(),
            source,
        };
        match kind {
            DataKind::Table => {
                let table: LootTable = serde_json::from_str(&content).map_err(parse_error)?;
                self.register_table(id, table);
            }
            DataKind::Predicate => {
                let condition = match serde_json::from_str(&content).map_err(parse_error)? {
                    OneOrMany::One(condition) => condition,
                    OneOrMany::Many(terms) => LootCondition::AllOf(AllOfCondition { terms }),
                };
                self.register_predicate(id, condition);
            }
            DataKind::Modifier => {
                let function = match serde_json::from_str(&content).map_err(parse_error)? {
                    OneOrMany::One(function) => function,
                    OneOrMany::Many(functions) => LootFunction::new(SequenceFunction { functions }),
                };
                self.register_modifier(id, function);
            }
            DataKind::ItemTag => {
                let tag: TagFile = serde_json::from_str(&content).map_err(parse_error)?;
                if tag.replace {
                    self.tags.remove(&id);
                }
                let values = tag.values.into_iter().map(TagValue::into_matcher).collect();
                self.register_tag(id, values);
            }
        }
        Ok(())
    }

    fn collect_tag(
        &self,
        id: &ResourceLocation,
        visited: &mut Vec<ResourceLocation>,
        items: &mut Vec<Arc<Item>>,
    ) -> bool {
        let Some(values) = self.tags.get(id) else {
            return false;
        };
        if visited.contains(id) {
            return true;
        }
        visited.push(id.clone());
        for value in values {
            match value {
                ItemMatcher::Item(item_id) => {
                    if let Some(item) = self.item(item_id) {
                        if !items.iter().any(|known| known.id == item.id) {
                            items.push(item);
                        }
                    }
                }
                ItemMatcher::Tag(tag) => {
                    self.collect_tag(tag, visited, items);
                }
            }
        }
        true
    }

    /// Validates every table against its own parameter set, and predicates and modifiers
    /// against all parameters. Problems are located by `{id}` paths.
    pub fn validate_all(&self) -> ProblemReporter {
        let mut reporter = ProblemReporter::new();
        let resolver: &dyn LootDataResolver = self;

        let tables: BTreeMap<_, _> = self.tables.iter().collect();
        for (id, table) in tables {
            let mut root =
                ValidationContext::new(&mut reporter, "", table.param_set(), Some(resolver));
            table.validate(&mut root.enter_element(
                &format!("{{{id}}}"),
                ElementKind::Table,
                id,
            ));
        }

        let predicates: BTreeMap<_, _> = self.predicates.iter().collect();
        for (id, condition) in predicates {
            let mut root = ValidationContext::new(&mut reporter, "", &ALL_PARAMS, Some(resolver));
            condition.validate(&mut root.enter_element(
                &format!("{{{id}}}"),
                ElementKind::Predicate,
                id,
            ));
        }

        let modifiers: BTreeMap<_, _> = self.modifiers.iter().collect();
        for (id, function) in modifiers {
            let mut root = ValidationContext::new(&mut reporter, "", &ALL_PARAMS, Some(resolver));
            function.validate(&mut root.enter_element(
                &format!("{{{id}}}"),
                ElementKind::Modifier,
                id,
            ));
        }

        reporter
    }
}

impl LootDataResolver for LootRegistry {
    fn table(&self, id: &ResourceLocation) -> Option<Arc<LootTable>> {
        self.tables.get(id).cloned()
    }

    fn predicate(&self, id: &ResourceLocation) -> Option<Arc<LootCondition>> {
        self.predicates.get(id).cloned()
    }

    fn modifier(&self, id: &ResourceLocation) -> Option<Arc<LootFunction>> {
        self.modifiers.get(id).cloned()
    }

    fn item(&self, id: &ResourceLocation) -> Option<Arc<Item>> {
        if let Some(item) = self.items.get(id) {
            return Some(item.clone());
        }
        let air = Item::air();
        if *id == air.id {
            return Some(air);
        }
        self.implicit_items.then(|| {
            Arc::new(Item::new(id.clone()).with_max_stack_size(self.implicit_max_stack_size))
        })
    }

    fn item_tag(&self, id: &ResourceLocation) -> Option<Vec<Arc<Item>>> {
        let mut items = Vec::new();
        self.collect_tag(id, &mut Vec::new(), &mut items)
            .then_some(items)
    }
}
