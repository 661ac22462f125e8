#![deny(clippy::all)]
// use log crate
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use log::{LevelFilter, SetLoggerError};
use pumpkin_config::{BASIC_CONFIG, advanced_config};
use pumpkin_loot::{
    inventory::{Inventory, SimpleInventory},
    item::ItemStack,
    level::Level,
    loot::{
        LootDataResolver, LootParams, LootParamsBuilder, LootRegistry, LootTable,
        context::param::{LootEntity, ORIGIN, Origin, THIS_ENTITY, TOOL},
    },
};
use pumpkin_util::ResourceLocation;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate and roll data pack loot tables", long_about = None)]
struct Args {
    /// Data pack root, the folder containing `data/`. Defaults to `data_path` of the configuration
    #[arg(long)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every loot file and report problems
    Validate,
    /// Roll a table and print the stacks it produced
    Roll {
        table: ResourceLocation,
        /// 0 uses the table's random sequence
        #[arg(long, default_value_t = 0)]
        seed: i64,
        #[arg(long)]
        luck: Option<f32>,
        /// Item used as the tool, for block and fishing tables
        #[arg(long)]
        tool: Option<ResourceLocation>,
    },
    /// Fill a simulated container with a table
    Fill {
        table: ResourceLocation,
        #[arg(long, default_value_t = SimpleInventory::CHEST_SIZE)]
        slots: usize,
        #[arg(long, default_value_t = 0)]
        seed: i64,
    },
}

fn init_logger() {
    let logging = &advanced_config().logging;
    if !logging.enabled {
        return;
    }

    let mut config = ConfigBuilder::new();
    if logging.timestamp {
        config.set_time_format_rfc3339();
        config.set_time_level(LevelFilter::Error);
    } else {
        config.set_time_level(LevelFilter::Off);
    }
    if !logging.color {
        for level in [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ] {
            config.set_level_color(level, None);
        }
    }
    if logging.threads {
        config.set_thread_level(LevelFilter::Info);
    } else {
        config.set_thread_level(LevelFilter::Off);
    }

    let level = LevelFilter::from_str(&logging.level).unwrap_or(LevelFilter::Info);
    if let Err(err) = TermLogger::init(
        level,
        config.build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        report_logger_failure(&err);
    }
}

// Logging is not up, so stderr is all there is
#[expect(clippy::print_stderr)]
fn report_logger_failure(err: &SetLoggerError) {
    eprintln!("Failed to initialize logger: {err}");
}

fn load_registry(data: &Path) -> Option<LootRegistry> {
    let mut registry = LootRegistry::new();
    let errors = registry.load_from_dir_lenient(data);
    for error in &errors {
        log::error!("{error}");
    }
    errors.is_empty().then_some(registry)
}

/// Provides every parameter the tool knows about that the table accepts.
fn build_params<'a>(
    level: &'a Level,
    table: &LootTable,
    luck: f32,
    tool: Option<ItemStack>,
) -> Option<LootParams<'a>> {
    let set = table.param_set();
    let mut builder = LootParamsBuilder::new(level).with_luck(luck);
    if set.is_allowed(ORIGIN.name()) {
        builder = builder.with_parameter(ORIGIN, Origin::default());
    }
    if set.is_allowed(THIS_ENTITY.name()) {
        builder = builder.with_parameter(THIS_ENTITY, LootEntity::player("LootTool"));
    }
    if set.is_allowed(TOOL.name()) {
        builder = builder.with_optional_parameter(TOOL, tool);
    }
    match builder.build(set) {
        Ok(params) => Some(params),
        Err(err) => {
            log::error!("Can't roll {:?} tables from here: {err}", table.table_type());
            None
        }
    }
}

fn validate(registry: &LootRegistry) -> ExitCode {
    let problems = registry.validate_all().into_problems();
    for problem in &problems {
        log::warn!("{problem}");
    }
    log::info!(
        "Validated {} loot tables, found {} problems",
        registry.tables().count(),
        problems.len()
    );
    if problems.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger();

    let data = args.data.unwrap_or_else(|| BASIC_CONFIG.data_path.clone());
    let Some(registry) = load_registry(&data) else {
        return ExitCode::FAILURE;
    };
    let registry = Arc::new(registry);
    let level = Level::new(BASIC_CONFIG.level_seed, registry.clone());

    match args.command {
        Command::Validate => validate(&registry),
        Command::Roll {
            table,
            seed,
            luck,
            tool,
        } => {
            let Some(loot_table) = registry.table(&table) else {
                log::error!("Unknown loot table {table}");
                return ExitCode::FAILURE;
            };
            let tool = tool
                .and_then(|id| registry.item(&id))
                .map(|item| ItemStack::new(1, item));
            let luck = luck.unwrap_or(BASIC_CONFIG.default_luck);
            let Some(params) = build_params(&level, &loot_table, luck, tool) else {
                return ExitCode::FAILURE;
            };
            let items = loot_table.get_random_items_seeded(&params, seed);
            for stack in &items {
                log::info!("{stack}");
            }
            log::info!("{table} produced {} stacks", items.len());
            ExitCode::SUCCESS
        }
        Command::Fill { table, slots, seed } => {
            let Some(loot_table) = registry.table(&table) else {
                log::error!("Unknown loot table {table}");
                return ExitCode::FAILURE;
            };
            let Some(params) = build_params(&level, &loot_table, BASIC_CONFIG.default_luck, None)
            else {
                return ExitCode::FAILURE;
            };
            let mut inventory = SimpleInventory::new(slots);
            let report = loot_table.fill(&mut inventory, &params, seed);
            for slot in 0..inventory.size() {
                let stack = inventory.get_stack(slot);
                if !stack.is_empty() {
                    log::info!("slot {slot}: {stack}");
                }
            }
            log::info!(
                "Placed {} stacks, dropped {}",
                report.placed,
                report.dropped
            );
            ExitCode::SUCCESS
        }
    }
}
