//! mdminecraft-autocraft - crafts items against a simulated inventory window
//!
//! Loads a recipe pack and a starting inventory, then plans and runs one craft
//! request, optionally journaling every inventory manipulation.

mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{AutocraftConfig, WindowChoice, DEFAULT_CONFIG_PATH};
use mdminecraft_assets::parse_item_key;
use mdminecraft_craft::{CraftOutcome, CraftRequest, Crafter, ParentTask, TaskScheduler};
use mdminecraft_testkit::{CraftReport, JsonlSink, RunResult};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "mdminecraft-autocraft", version, about = "Plan and run a crafting request")]
struct Args {
    /// Path to the TOML config.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Item to craft: `50`, `50:*` or `35:14`.
    #[arg(long)]
    item: String,

    /// Variant of the item; overrides the one given in `--item`.
    #[arg(long)]
    meta: Option<u16>,

    /// Number of items to craft.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    amount: i64,

    /// Window to simulate; overrides the config.
    #[arg(long, value_enum)]
    window: Option<WindowChoice>,

    /// Write every inventory manipulation as JSONL; overrides the config.
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Write a JSON summary of the run.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Only plan the craft and print the ingredient totals.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let loaded = AutocraftConfig::try_load_from_path(&args.config);
    let log_filter = loaded
        .as_ref()
        .map(|cfg| cfg.log_filter.clone())
        .unwrap_or_else(|_| AutocraftConfig::default().log_filter);

    // RUST_LOG wins over the configured filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    info!("Starting mdminecraft-autocraft v{}", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|err| {
        AutocraftConfig::warn_fallback(&args.config, &err);
        AutocraftConfig::default()
    });
    if let Some(window) = args.window {
        config.window = window;
    }
    if args.journal.is_some() {
        config.journal = args.journal.clone();
    }

    let Some(key) = parse_item_key(&args.item) else {
        bail!("invalid item {:?}, expected `id`, `id:*` or `id:meta`", args.item);
    };
    let mut request = CraftRequest::item(key.id).amount(args.amount);
    if let Some(meta) = args.meta.or(key.meta) {
        request = request.meta(meta);
    }

    let registry = Arc::new(config.recipe_registry()?);
    let inventory = config.build_inventory(&registry)?;
    let crafter = Crafter::new(
        registry,
        Arc::new(inventory.clone()),
        TaskScheduler::try_current().context("no tokio runtime")?,
    );

    if args.dry_run {
        let plan = crafter.plan(&request)?;
        println!(
            "{} x{} -> {} cycle(s), {} item(s)",
            plan.recipe().result().key(),
            plan.amount(),
            plan.craft_times(),
            plan.expected_output()
        );
        for (ingredient, needed) in plan.total_needs() {
            println!("  {ingredient} x{needed}");
        }
        return Ok(());
    }

    let (parent, mut failures) = ParentTask::channel();
    let Some(handle) = crafter.craft(request.parent(parent)) else {
        bail!("[Craft] No recipe for {key}");
    };
    info!(recipe = %handle.recipe().result(), task = %handle.id(), "Craft scheduled");
    let item = handle.recipe().result().key().to_string();
    let outcome = handle.wait().await;
    while let Ok(failure) = failures.try_recv() {
        warn!(task = %failure.task, "{}", failure.error);
    }

    let journal = inventory.journal();
    if let Some(path) = &config.journal {
        let mut sink = JsonlSink::create(path)?;
        sink.write_journal(&journal)?;
        info!(ops = sink.written(), "Journal written to {}", path.display());
    }
    for stack in inventory.dropped() {
        warn!(item = %stack.key(), count = stack.count, "Dropped: storage full");
    }

    let report = match &outcome {
        CraftOutcome::Completed { crafted, requested } => {
            let result = if outcome.is_shortfall() {
                RunResult::Shortfall
            } else {
                RunResult::Completed
            };
            CraftReport::new(item.as_str(), result, *requested, *crafted)
        }
        CraftOutcome::Aborted(err) => CraftReport::new(
            item.as_str(),
            RunResult::Aborted,
            u32::try_from(args.amount).unwrap_or(0),
            0,
        )
        .with_error(err),
    }
    .with_ops(journal.len());
    if let Some(path) = &args.report {
        report.write_to(path)?;
    }

    match outcome {
        CraftOutcome::Completed { crafted, requested } => {
            println!("Crafted {crafted} of {requested} {item} in {} ops", journal.len());
            if crafted < requested {
                warn!(crafted, requested, "Craft finished short");
            }
            Ok(())
        }
        CraftOutcome::Aborted(err) => Err(err.into()),
    }
}
