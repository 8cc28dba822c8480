//! builtins-builder binary: Generate the Abridged Certs builtin table
//!
//! Usage:
//!   builtins-builder generate --feed webtrust.json --date 2024-01-01 -o builtins.rs
//!   builtins-builder generate --input cache.json -o builtins.rs
//!   builtins-builder lookup --table cache.json ff0001

use std::path::{Path, PathBuf};

use abridged_core::{BuiltinTable, CacheDocument, DigestAlgorithm, GeneratorConfig, Identifier};
use anyhow::Context;
use builtins_builder::{load_records, today, BuiltinsBuilder};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "builtins-builder")]
#[command(about = "Builds a map from identifiers to WebPKI intermediate and root certificate hashes")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the builtins Rust module
    Generate(GenerateArgs),
    /// Resolve an identifier against a cache document or binary table
    Lookup(LookupArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// JSON generator config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Certificate feed (JSON array of creation_time / certificate records)
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    feed: Option<PathBuf>,

    /// Cached table from a previous run. Overrides the date option. The cache
    /// does not record the digest algorithm, so the generated header omits it.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// List version the feed was taken as-of (YYYY-MM-DD, default today)
    #[arg(short, long)]
    date: Option<String>,

    /// Generated Rust module path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the raw 32*N byte table
    #[arg(long)]
    binary_output: Option<PathBuf>,

    /// Write a cache document for later regeneration
    #[arg(long)]
    cache_out: Option<PathBuf>,

    /// Digest algorithm (sha256, keccak256)
    #[arg(long)]
    algorithm: Option<DigestAlgorithm>,

    /// Identifier prefix byte, hex (e.g. ff)
    #[arg(long, value_parser = parse_prefix)]
    prefix: Option<u8>,
}

#[derive(clap::Args)]
struct LookupArgs {
    /// Cache document (.json) or raw binary table (.bin)
    #[arg(long)]
    table: PathBuf,

    /// Hex identifier, e.g. ff0001
    identifier: String,
}

fn parse_prefix(s: &str) -> Result<u8, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u8::from_str_radix(s, 16).map_err(|e| format!("invalid prefix byte {:?}: {}", s, e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Lookup(args) => lookup(args),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(path) = args.binary_output {
        config.binary_output = Some(path);
    }
    if let Some(path) = args.cache_out {
        config.cache_output = Some(path);
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(prefix) = args.prefix {
        config.prefix = prefix;
    }

    let builder = match (&args.input, &args.feed) {
        (Some(cache), _) => BuiltinsBuilder::from_cache(config, cache),
        (None, Some(feed)) => {
            let records = load_records(feed)?;
            println!("Fetched {} certificates", records.len());
            BuiltinsBuilder::from_records(config, records)
                .list_date(args.date.unwrap_or_else(today))
        }
        (None, None) => anyhow::bail!("either --feed or --input is required"),
    };

    let output = builder.config().output.clone();
    let generated = builder.build()?;

    println!("Builtins generated:");
    println!("  Entries: {}", generated.binary.len());
    println!("  List date: {}", generated.provenance.list_date);
    println!("  Generation date: {}", generated.provenance.generation_date);
    println!("Generated file output to {}", output.display());

    Ok(())
}

fn load_table(path: &Path) -> anyhow::Result<BuiltinTable> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let table = if is_json {
        BuiltinTable::from_table(&CacheDocument::load(path)?.table)
    } else {
        BuiltinTable::load(path)?
    };
    Ok(table)
}

fn lookup(args: LookupArgs) -> anyhow::Result<()> {
    let identifier = Identifier::from_hex(&args.identifier)
        .with_context(|| format!("invalid identifier {:?}", args.identifier))?;
    let table = load_table(&args.table)
        .with_context(|| format!("failed to load table {}", args.table.display()))?;

    match table.resolve_identifier(&identifier) {
        Some(digest) => println!("{} {}", identifier, hex::encode(digest)),
        None => println!(
            "{} unknown (index {} outside table of {} entries)",
            identifier,
            identifier.index(),
            table.len()
        ),
    }

    Ok(())
}
