use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use mint_cannabis::{
    config,
    db,
    entities::{BrandModel, ProductModel, ProductVariantModel, StrainModel},
    events,
    services::{InventoryItem, SyncOutcome},
    AppState,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config().context("failed to load application config")?;
    config::init_tracing(config.log_level(), config.log_json || config.is_production());

    let (state, event_rx) = AppState::initialize(config)
        .await
        .context("failed to connect to database")?;
    let events_task = tokio::spawn(events::process_events(event_rx));

    let result = run(&state, cli.command, cli.json).await;
    shutdown(state, events_task).await;
    result
}

async fn run(state: &AppState, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Migrate => {
            db::run_migrations(&state.db)
                .await
                .context("failed to run migrations")?;
            println!("Migrations applied");
        }
        Commands::Brands(args) => {
            let brands = state.services.brands.list_brands(!args.all).await?;
            if json {
                print_json(&brands)?;
            } else {
                brands.iter().for_each(render_brand);
            }
        }
        Commands::Strains(args) => {
            let strains = state.services.strains.list_strains(!args.all).await?;
            if json {
                print_json(&strains)?;
            } else {
                strains.iter().for_each(render_strain);
            }
        }
        Commands::BrandProducts(args) => {
            let brand = state
                .services
                .brands
                .find_brand_by_name(&args.name)
                .await?
                .ok_or_else(|| anyhow!("no brand named '{}'", args.name))?;
            let products = state.services.brands.brand_products(brand.id).await?;
            if json {
                print_json(&products)?;
            } else {
                println!("Products - {}", brand.name);
                products.iter().for_each(render_product);
            }
        }
        Commands::StrainProducts(args) => {
            let strain = state
                .services
                .strains
                .find_strain_by_name(&args.name)
                .await?
                .ok_or_else(|| anyhow!("no strain named '{}'", args.name))?;
            let products = state.services.strains.strain_products(strain.id).await?;
            if json {
                print_json(&products)?;
            } else {
                println!("Products - {}", strain.name);
                products.iter().for_each(render_product);
            }
        }
        Commands::LowStock(args) => {
            let variants = if args.notify {
                state.services.products.mark_low_stock().await?
            } else {
                state.services.products.low_stock_variants().await?
            };
            if json {
                print_json(&variants)?;
            } else {
                variants.iter().for_each(render_variant);
            }
        }
        Commands::Import(args) => {
            let raw = fs::read_to_string(&args.file)
                .with_context(|| format!("failed to read {}", args.file.display()))?;
            let items: Vec<InventoryItem> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of inventory items", args.file.display()))?;

            info!(count = items.len(), file = %args.file.display(), "Importing inventory items");
            let outcomes = state
                .services
                .sync
                .upsert_inventory_items(items)
                .await
                .context("import stopped at the first failing item")?;

            if json {
                print_json(&outcomes)?;
            } else {
                render_import_summary(&outcomes);
            }
        }
    }

    Ok(())
}

async fn shutdown(state: AppState, events_task: JoinHandle<u64>) {
    // The loop ends once every sender is gone
    drop(state);
    match events_task.await {
        Ok(processed) => info!(processed, "Event processing finished"),
        Err(e) => warn!(error = %e, "Event processing task failed"),
    }
}

#[derive(Parser)]
#[command(
    name = "mint-cannabis",
    about = "Cannabis catalog maintenance: brands, strains, products and Dutchie imports",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// List brands
    Brands(ListArgs),
    /// List strains
    Strains(ListArgs),
    /// Products of a brand, looked up by name
    BrandProducts(NameArgs),
    /// Products of a strain, looked up by name
    StrainProducts(NameArgs),
    /// Variants at or below their low-stock threshold
    LowStock(LowStockArgs),
    /// Sync a JSON array of Dutchie inventory items
    Import(ImportArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, action = ArgAction::SetTrue, help = "Include archived records")]
    all: bool,
}

#[derive(Args)]
struct NameArgs {
    #[arg(help = "Name to match, ignoring case")]
    name: String,
}

#[derive(Args)]
struct LowStockArgs {
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Publish a low-stock event for every match"
    )]
    notify: bool,
}

#[derive(Args)]
struct ImportArgs {
    #[arg(help = "Path to a JSON file holding an array of inventory items")]
    file: PathBuf,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_brand(brand: &BrandModel) {
    println!(
        "- Brand {} • {} • {} • {} products{}",
        brand.id,
        brand.name,
        brand.brand_type,
        brand.product_count,
        if brand.active { "" } else { " • archived" }
    );
}

fn render_strain(strain: &StrainModel) {
    println!(
        "- Strain {} • {} • {} • {} products{}",
        strain.id,
        strain.name,
        strain.strain_type,
        strain.product_count,
        if strain.active { "" } else { " • archived" }
    );
}

fn render_product(product: &ProductModel) {
    println!(
        "  • {} • {} • dutchie {}",
        product.id,
        product.name,
        product.dutchie_product_id.as_deref().unwrap_or("-")
    );
}

fn render_variant(variant: &ProductVariantModel) {
    println!(
        "- Variant {} • SKU {} @ {} • available {} (threshold {}){}",
        variant.id,
        variant.dutchie_sku.as_deref().unwrap_or("-"),
        variant.dutchie_location_id.as_deref().unwrap_or("-"),
        variant.quantity_available.unwrap_or_default(),
        variant.low_stock_threshold,
        if variant.needs_reorder() { " • reorder" } else { "" }
    );
}

fn render_import_summary(outcomes: &[SyncOutcome]) {
    let created: usize = outcomes.iter().map(SyncOutcome::created_count).sum();
    println!(
        "Imported {} inventory items ({} records created)",
        outcomes.len(),
        created
    );
}
