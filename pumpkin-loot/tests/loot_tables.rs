use std::{path::Path, sync::Arc};

use pumpkin_loot::{
    inventory::{Inventory, SimpleInventory},
    item::{Item, ItemStack},
    level::Level,
    loot::{
        LootContextBuilder, LootParams, LootParamsBuilder, LootParamsError, LootPool,
        LootPoolEntry, LootRegistry, LootTable, LootTableType, LootWarning, NumberProvider,
        context::{
            param::{BLOCK_STATE, BlockStateSnapshot, ORIGIN, Origin, TOOL},
            param_set::{BLOCK, CHEST, EMPTY},
        },
        registry::LootDataResolver,
    },
};
use pumpkin_util::ResourceLocation;

fn registry() -> Arc<LootRegistry> {
    let _ = env_logger::builder().is_test(true).try_init();
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data");
    let mut registry = LootRegistry::new();
    let loaded = registry.load_from_dir(&root).unwrap();
    assert_eq!(loaded, 13);
    Arc::new(registry)
}

fn table(registry: &LootRegistry, id: &str) -> Arc<LootTable> {
    registry.table(&id.parse().unwrap()).unwrap()
}

fn chest_params(level: &Level) -> LootParams<'_> {
    LootParamsBuilder::new(level)
        .with_parameter(ORIGIN, Origin::new(0.5, 64.0, 0.5))
        .build(&CHEST)
        .unwrap()
}

fn summary(items: &[ItemStack]) -> Vec<(String, i32)> {
    items
        .iter()
        .map(|stack| (stack.item.id.to_string(), stack.get_count()))
        .collect()
}

#[test]
fn three_rolls_yield_three_single_stacks() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let params = chest_params(&level);

    let items = table(&registry, "test:three_rolls").get_random_items_seeded(&params, 7);
    assert_eq!(
        summary(&items),
        vec![("minecraft:apple".to_string(), 1); 3]
    );
}

#[test]
fn zero_rolls_never_call_the_consumer() {
    let level = Level::new(1, Arc::new(LootRegistry::new()));
    let params = LootParamsBuilder::new(&level).build(&EMPTY).unwrap();
    let table = LootTable::builder()
        .set_type(LootTableType::Empty)
        .with_pool(
            LootPool::builder()
                .set_rolls(NumberProvider::constant(0.0))
                .add(LootPoolEntry::item(ResourceLocation::vanilla("diamond")))
                .build(),
        )
        .build()
        .unwrap();

    let mut ctx = LootContextBuilder::new(&params)
        .with_optional_random_seed(3)
        .create(None);
    let mut calls = 0;
    table.get_random_items(&mut ctx, &mut |_, _| calls += 1);
    assert_eq!(calls, 0);
    assert!(ctx.warnings().is_empty());
}

#[test]
fn same_seed_same_loot() {
    let registry = registry();
    let level = Level::new(99, registry.clone());
    let params = chest_params(&level);
    let dungeon = table(&registry, "minecraft:chests/simple_dungeon");

    let first = dungeon.get_random_items_seeded(&params, 12345);
    let second = dungeon.get_random_items_seeded(&params, 12345);
    assert!(!first.is_empty());
    assert_eq!(summary(&first), summary(&second));
    for stack in &first {
        assert!(stack.get_count() > 0 && stack.get_count() <= stack.max_stack_size());
    }
}

#[test]
fn random_sequences_are_reproducible() {
    let registry = registry();
    let dungeon = table(&registry, "minecraft:chests/simple_dungeon");

    let roll = |seed: i64| {
        let level = Level::new(seed, registry.clone());
        let params = chest_params(&level);
        summary(&dungeon.get_random_items_for(&params))
    };
    assert_eq!(roll(2024), roll(2024));
}

#[test]
fn fill_drops_what_does_not_fit() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let params = chest_params(&level);
    let mut chest = SimpleInventory::chest();

    let report = table(&registry, "test:forty_items").fill(&mut chest, &params, 42);

    assert_eq!(report.placed, SimpleInventory::CHEST_SIZE);
    assert_eq!(report.dropped, 13);
    assert_eq!(
        report.warnings,
        vec![LootWarning::OverfilledContainer { dropped: 13 }]
    );
    assert!(chest.empty_slots().is_empty());
    let apples = chest.count(&ResourceLocation::vanilla("apple"));
    let bread = chest.count(&ResourceLocation::vanilla("bread"));
    assert_eq!(apples + bread, 27);
}

#[test]
fn fill_keeps_occupied_slots() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let params = chest_params(&level);
    let stone = Arc::new(Item::new(ResourceLocation::vanilla("stone")));
    let mut chest = SimpleInventory::chest();
    for slot in 0..5 {
        chest.set_stack(slot, ItemStack::new(64, stone.clone()));
    }

    let report = table(&registry, "test:three_rolls").fill(&mut chest, &params, 42);

    assert_eq!(report.placed, 3);
    assert_eq!(report.dropped, 0);
    assert!(report.warnings.is_empty());
    assert_eq!(chest.count(&ResourceLocation::vanilla("stone")), 5 * 64);
    assert_eq!(chest.count(&ResourceLocation::vanilla("apple")), 3);
    assert_eq!(chest.empty_slots().len(), 27 - 5 - 3);
}

#[test]
fn fill_is_deterministic() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let params = chest_params(&level);
    let dungeon = table(&registry, "minecraft:chests/simple_dungeon");

    let mut first = SimpleInventory::chest();
    let mut second = SimpleInventory::chest();
    dungeon.fill(&mut first, &params, 77);
    dungeon.fill(&mut second, &params, 77);
    assert_eq!(summary(first.stacks()), summary(second.stacks()));
}

#[test]
fn cyclic_tables_terminate_with_a_warning() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let params = chest_params(&level);

    let mut ctx = LootContextBuilder::new(&params)
        .with_optional_random_seed(5)
        .create(None);
    let items = table(&registry, "test:cycle_a").collect_random_items(&mut ctx);

    assert_eq!(summary(&items), vec![("minecraft:string".to_string(), 1)]);
    assert_eq!(ctx.warnings(), &[LootWarning::InfiniteLoop]);
}

#[test]
fn references_resolve_through_the_registry() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let params = chest_params(&level);

    let mut ctx = LootContextBuilder::new(&params)
        .with_optional_random_seed(11)
        .create(None);
    let items = table(&registry, "test:references").collect_random_items(&mut ctx);

    assert_eq!(
        summary(&items),
        vec![
            ("minecraft:diamond".to_string(), 2),
            ("minecraft:arrow".to_string(), 1),
            ("minecraft:spectral_arrow".to_string(), 1),
            ("minecraft:tipped_arrow".to_string(), 1),
        ]
    );
    assert_eq!(items[0].custom_name(), Some("Lucky"));
    // the self referencing predicate fails instead of recursing forever
    assert_eq!(ctx.warnings(), &[LootWarning::InfiniteLoop]);
}

#[test]
fn block_drops_depend_on_the_tool() {
    let registry = registry();
    let level = Level::new(1, registry.clone());
    let gravel = table(&registry, "minecraft:blocks/gravel");
    assert_eq!(gravel.table_type(), LootTableType::Block);

    let drop_with = |tool: &str| {
        let params = LootParamsBuilder::new(&level)
            .with_parameter(ORIGIN, Origin::default())
            .with_parameter(
                BLOCK_STATE,
                BlockStateSnapshot::new(ResourceLocation::vanilla("gravel")),
            )
            .with_parameter(
                TOOL,
                ItemStack::new(1, Arc::new(Item::new(ResourceLocation::vanilla(tool)))),
            )
            .build(&BLOCK)
            .unwrap();
        summary(&gravel.get_random_items_seeded(&params, 1))
    };

    assert_eq!(drop_with("shears"), vec![("minecraft:flint".to_string(), 1)]);
    assert_eq!(drop_with("stick"), vec![("minecraft:gravel".to_string(), 1)]);
}

#[test]
fn block_params_require_a_tool() {
    let level = Level::new(1, Arc::new(LootRegistry::new()));
    let error = LootParamsBuilder::new(&level)
        .with_parameter(ORIGIN, Origin::default())
        .build(&BLOCK)
        .err()
        .unwrap();
    assert!(matches!(error, LootParamsError::MissingRequired(missing) if missing == vec!["block_state", "tool"]));
}

#[test]
fn dynamic_entries_read_the_params() {
    let level = Level::new(1, Arc::new(LootRegistry::new()));
    let book = Arc::new(Item::new(ResourceLocation::vanilla("book")));
    let params = LootParamsBuilder::new(&level)
        .with_dynamic_drop(ResourceLocation::vanilla("contents"), move |output| {
            output(ItemStack::new(3, book.clone()));
            output(ItemStack::new(1, book.clone()));
        })
        .build(&EMPTY)
        .unwrap();
    let table = LootTable::builder()
        .set_type(LootTableType::Empty)
        .with_pool(
            LootPool::builder()
                .set_rolls(NumberProvider::constant(1.0))
                .add(LootPoolEntry::dynamic(ResourceLocation::vanilla("contents")))
                .build(),
        )
        .build()
        .unwrap();

    let items = table.get_random_items_seeded(&params, 1);
    assert_eq!(
        summary(&items),
        vec![
            ("minecraft:book".to_string(), 3),
            ("minecraft:book".to_string(), 1)
        ]
    );
}

#[test]
fn dynamic_drops_can_roll_another_table() {
    let level = Level::new(1, Arc::new(LootRegistry::new()));
    let single = |path: &str| {
        LootTable::builder()
            .set_type(LootTableType::Empty)
            .with_pool(
                LootPool::builder()
                    .set_rolls(NumberProvider::uniform(1.0, 3.0))
                    .add(LootPoolEntry::item(ResourceLocation::vanilla(path)))
                    .build(),
            )
            .build()
            .unwrap()
    };
    let contents = single("stick");
    let params = LootParamsBuilder::new(&level)
        .with_dynamic_drop(ResourceLocation::vanilla("contents"), |output| {
            let inner = LootParamsBuilder::new(&level).build(&EMPTY).unwrap();
            for stack in contents.get_random_items_for(&inner) {
                output(stack);
            }
        })
        .build(&EMPTY)
        .unwrap();
    let outer = LootTable::builder()
        .set_type(LootTableType::Empty)
        .with_pool(
            LootPool::builder()
                .set_rolls(NumberProvider::uniform(1.0, 2.0))
                .add(LootPoolEntry::dynamic(ResourceLocation::vanilla("contents")))
                .build(),
        )
        .build()
        .unwrap();

    let items = outer.get_random_items_for(&params);
    assert!(!items.is_empty());
    assert!(items.iter().all(|stack| stack.item.id.path == "stick"));
}

#[test]
fn validation_reports_every_problem() {
    let registry = registry();
    let problems = registry.validate_all().into_problems();
    let has = |path: &str, message: &str| {
        problems
            .iter()
            .any(|problem| problem.path == path && problem.message == message)
    };

    assert!(has(
        "{test:broken}.pools[0].entries[0]",
        "Unknown loot table called test:missing"
    ));
    assert!(has(
        "{test:broken}.pools[0].entries[1].conditions[0]",
        "Parameters [tool] are not provided in this context"
    ));
    assert!(has("{test:broken}.pools[0].entries[2]", "Empty children list"));
    assert!(has(
        "{test:cycle_a}.pools[0].entries[0]->{test:cycle_b}.pools[0].entries[0]",
        "Table test:cycle_a is recursively called"
    ));
    assert!(has(
        "{test:self_reference}",
        "Condition test:self_reference is recursively called"
    ));
    assert!(
        !problems
            .iter()
            .any(|problem| problem.path.starts_with("{minecraft:blocks/gravel}"))
    );
}

#[test]
fn lenient_loading_skips_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    let tables = dir.path().join("data/custom/loot_table");
    std::fs::create_dir_all(&tables).unwrap();
    std::fs::write(tables.join("broken.json"), "{\"pools\": [").unwrap();
    std::fs::write(
        tables.join("fine.json"),
        r#"{"type": "minecraft:empty", "pools": [{"rolls": 1, "entries": [{"type": "minecraft:item", "name": "minecraft:stick"}]}]}"#,
    )
    .unwrap();

    let mut strict = LootRegistry::new();
    assert!(strict.load_from_dir(dir.path()).is_err());

    let mut lenient = LootRegistry::new();
    let errors = lenient.load_from_dir_lenient(dir.path());
    assert_eq!(errors.len(), 1);
    assert!(lenient.table(&"custom:fine".parse().unwrap()).is_some());
    assert!(lenient.table(&"custom:broken".parse().unwrap()).is_none());
}
