//! Catalog browsing CLI for operators and feed QA.
//!
//! Usage:
//!     catalog stats --audience vet
//!     catalog browse --audience vet --path alimento-perro
//!     catalog products --audience pet --path alimento-perro/economico/manada
//!     catalog health

use anyhow::Result;
use clap::{Parser, Subcommand};
use distripet_cascade::{counts_at, options_at, top_level_stats};
use distripet_display::{breadcrumb, option_items, OptionItem};
use distripet_feed::{HttpFeed, HttpFeedConfig, ProductSource};
use distripet_filter::apply_path;
use distripet_model::{Audience, ProductRecord, SelectionPath};
use distripet_taxonomy::Taxonomy;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Browse the distripet product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Product feed URL
    #[arg(long, default_value = "http://127.0.0.1:9080")]
    feed_url: String,

    /// Read products from a JSON file instead of the feed
    #[arg(long)]
    products_file: Option<String>,

    /// Load the taxonomy from a JSON asset instead of the builtin tables
    #[arg(long)]
    taxonomy_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Top-level category counts for sidebar badges
    Stats {
        /// Catalog audience (vet, pet)
        #[arg(short, long)]
        audience: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Drill into the catalog one level at a time
    Browse {
        /// Catalog audience (vet, pet)
        #[arg(short, long)]
        audience: String,

        /// Selection path, slash-separated (e.g. alimento-perro/economico)
        #[arg(short, long, default_value = "")]
        path: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the products matching a selection path
    Products {
        /// Catalog audience (vet, pet)
        #[arg(short, long)]
        audience: String,

        /// Selection path, slash-separated
        #[arg(short, long, default_value = "")]
        path: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check feed health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("distripet=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Stats { audience, format } => {
            let taxonomy = load_taxonomy(&cli, audience)?;
            let products = load_products(&cli).await?;
            run_stats(&taxonomy, &products, format)?;
        }
        Commands::Browse {
            audience,
            path,
            format,
        } => {
            let taxonomy = load_taxonomy(&cli, audience)?;
            let products = load_products(&cli).await?;
            run_browse(&taxonomy, &products, path, format)?;
        }
        Commands::Products {
            audience,
            path,
            format,
        } => {
            let taxonomy = load_taxonomy(&cli, audience)?;
            let products = load_products(&cli).await?;
            run_products(&taxonomy, &products, path, format)?;
        }
        Commands::Health => {
            run_health(&cli).await?;
        }
    }

    Ok(())
}

fn load_taxonomy(cli: &Cli, audience: &str) -> Result<Taxonomy> {
    let audience: Audience = audience.parse()?;

    match &cli.taxonomy_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let taxonomy = Taxonomy::from_json(&text)?;
            anyhow::ensure!(
                taxonomy.audience() == audience,
                "taxonomy asset is for audience '{}', requested '{}'",
                taxonomy.audience(),
                audience
            );
            Ok(taxonomy)
        }
        None => Ok(Taxonomy::builtin(audience)),
    }
}

async fn load_products(cli: &Cli) -> Result<Vec<ProductRecord>> {
    if let Some(path) = &cli.products_file {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    } else {
        let config = HttpFeedConfig {
            base_url: cli.feed_url.clone(),
            ..Default::default()
        };
        let feed = HttpFeed::new(config);
        Ok(feed.fetch_products().await?)
    }
}

fn parse_path(raw: &str) -> Result<SelectionPath> {
    let segments = raw
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty());
    Ok(SelectionPath::from_segments(segments)?)
}

fn run_stats(taxonomy: &Taxonomy, products: &[ProductRecord], format: &str) -> Result<()> {
    let stats = top_level_stats(taxonomy, products);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Catalog: {} ({} products)", taxonomy.audience(), products.len());
        println!("---");
        for stat in &stats {
            println!("{:<30} {:>5}  [{}]", stat.display_name, stat.count, stat.id);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct BrowseView {
    breadcrumb: String,
    terminal: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<OptionItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    products: Vec<ProductRecord>,
}

fn run_browse(
    taxonomy: &Taxonomy,
    products: &[ProductRecord],
    raw_path: &str,
    format: &str,
) -> Result<()> {
    let path = parse_path(raw_path)?;
    let trail = breadcrumb(taxonomy, &path);

    let view = match options_at(taxonomy, products, &path) {
        Some(options) => {
            let counts = counts_at(taxonomy, products, &path).unwrap_or_default();
            BrowseView {
                breadcrumb: trail,
                terminal: false,
                options: option_items(taxonomy, &path, &options, &counts),
                products: Vec::new(),
            }
        }
        None => BrowseView {
            breadcrumb: trail,
            terminal: true,
            options: Vec::new(),
            products: apply_path(taxonomy, products, &path)
                .into_iter()
                .cloned()
                .collect(),
        },
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", view.breadcrumb);
    println!("---");

    if view.terminal {
        println!("No further options; {} product(s) at this path", view.products.len());
        for product in &view.products {
            print_product(product);
        }
    } else {
        for item in &view.options {
            println!("{:<30} {:>5}  [{}]", item.label, item.count, item.value);
        }
    }

    Ok(())
}

fn run_products(
    taxonomy: &Taxonomy,
    products: &[ProductRecord],
    raw_path: &str,
    format: &str,
) -> Result<()> {
    let path = parse_path(raw_path)?;
    let subset = apply_path(taxonomy, products, &path);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&subset)?);
        return Ok(());
    }

    println!("{}", breadcrumb(taxonomy, &path));
    println!("---");
    for product in &subset {
        print_product(product);
    }
    println!("\nTotal: {} product(s)", subset.len());

    Ok(())
}

fn print_product(product: &ProductRecord) {
    println!(
        "{:<10} {:<24} {:<20} ${:>10.2}  stock {}",
        product.id, product.name, product.brand, product.price, product.stock
    );
}

async fn run_health(cli: &Cli) -> Result<()> {
    let config = HttpFeedConfig {
        base_url: cli.feed_url.clone(),
        ..Default::default()
    };
    let feed = HttpFeed::new(config);

    print!("Checking {} supplier... ", feed.name());

    match feed.health_check().await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED: {}", e);
            std::process::exit(1);
        }
    }
}
