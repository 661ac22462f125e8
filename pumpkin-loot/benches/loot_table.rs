use std::{path::Path, sync::Arc};

use criterion::{Criterion, criterion_group, criterion_main};
use pumpkin_loot::{
    inventory::SimpleInventory,
    level::Level,
    loot::{
        LootDataResolver, LootParamsBuilder, LootRegistry,
        context::{
            param::{ORIGIN, Origin},
            param_set::CHEST,
        },
    },
};

fn bench_simple_dungeon(c: &mut Criterion) {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data");
    let mut registry = LootRegistry::new();
    registry.load_from_dir(&root).unwrap();
    let registry = Arc::new(registry);
    let table = registry
        .table(&"minecraft:chests/simple_dungeon".parse().unwrap())
        .unwrap();

    let level = Level::new(0, registry.clone());
    let params = LootParamsBuilder::new(&level)
        .with_parameter(ORIGIN, Origin::default())
        .build(&CHEST)
        .unwrap();

    let mut seed = 0;
    c.bench_function("simple dungeon roll", |b| {
        b.iter(|| {
            seed += 1;
            table.get_random_items_seeded(&params, seed)
        });
    });

    c.bench_function("simple dungeon fill", |b| {
        b.iter(|| {
            seed += 1;
            let mut chest = SimpleInventory::chest();
            table.fill(&mut chest, &params, seed)
        });
    });
}

criterion_group!(benches, bench_simple_dungeon);
criterion_main!(benches);
