#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelfscan_core::ImageSource;
use shelfscan_match::{InventoryProduct, MatchConfig, Matcher};
use shelfscan_ocr::{OcrPipeline, RemoteOcr, RemoteOcrConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "shelfscan_cli::startup";

/// Shelfscan: receipt recognition, extraction, and inventory matching.
#[derive(Debug, Parser)]
#[command(name = "shelfscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    remote: RemoteOcrConfig,

    #[command(flatten)]
    matching: MatchConfig,

    /// Text the mock recognition engine should "recognize", standing in
    /// for a real on-device engine.
    #[cfg(feature = "mock")]
    #[arg(long = "mock-text", env = "SHELFSCAN_MOCK_TEXT", global = true)]
    mock_text: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recognize text in a receipt image.
    Ocr {
        /// Path to the receipt image.
        image: PathBuf,
    },
    /// Derive structured receipt fields.
    Parse {
        /// Path to the receipt image.
        image: Option<PathBuf>,
        /// Recognized text to parse directly, bypassing recognition.
        #[arg(long, conflicts_with = "image")]
        text: Option<String>,
    },
    /// Match recognized text against an inventory list.
    Match {
        /// Path to a JSON array of inventory products.
        inventory: PathBuf,
        /// Recognized text to match.
        #[arg(long)]
        text: String,
        /// Print every scoreable candidate instead of only the best.
        #[arg(long)]
        rank: bool,
    },
}

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(error = %error, "shelfscan terminated with error");
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        features = ?enabled_features(),
        "starting shelfscan"
    );

    match &cli.command {
        Command::Ocr { image } => {
            let pipeline = build_pipeline(&cli)?;
            let result = pipeline.run(&ImageSource::from_path(image)).await;
            print_json(&result)
        }
        Command::Parse { image, text } => {
            let fields = match (image, text) {
                (_, Some(text)) => shelfscan_extract::parse_receipt_text(text, None),
                (Some(image), None) => {
                    parse_with_engine(&cli, &ImageSource::from_path(image)).await?
                }
                (None, None) => anyhow::bail!("pass an image path or --text"),
            };
            print_json(&fields)
        }
        Command::Match {
            inventory,
            text,
            rank,
        } => {
            let products = load_inventory(inventory)?;
            let matcher = Matcher::new(cli.matching.clone());
            if *rank {
                print_json(&matcher.rank_candidates(&products, text))
            } else {
                print_json(&matcher.best_match(&products, text))
            }
        }
    }
}

/// Builds the recognition chain: remote first, then the local provider when
/// a mock engine is configured.
fn build_pipeline(cli: &Cli) -> anyhow::Result<OcrPipeline> {
    let remote = RemoteOcr::new(cli.remote.clone()).context("invalid remote OCR configuration")?;
    let mut pipeline = OcrPipeline::new().with_provider(remote);

    #[cfg(feature = "mock")]
    if let Some(text) = &cli.mock_text {
        let engine = shelfscan_core::mock::MockEngine::with_text(text.clone());
        pipeline = pipeline.with_provider(shelfscan_ocr::LocalOcr::new(engine));
    }

    if pipeline.health().providers.iter().all(|p| !p.configured) {
        anyhow::bail!(
            "no recognition provider is configured; set SHELFSCAN_VISION_API_KEY or use --mock-text"
        );
    }

    Ok(pipeline)
}

async fn parse_with_engine(
    cli: &Cli,
    image: &ImageSource,
) -> anyhow::Result<shelfscan_extract::ReceiptFields> {
    #[cfg(feature = "mock")]
    if let Some(text) = &cli.mock_text {
        let engine = shelfscan_core::mock::MockEngine::with_text(text.clone());
        return Ok(shelfscan_extract::parse_receipt(&engine, image).await);
    }

    let _ = image;
    anyhow::bail!("no local recognition engine available in this build; pass --text instead")
}

fn load_inventory(path: &PathBuf) -> anyhow::Result<Vec<InventoryProduct>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading inventory file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing inventory {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Returns a list of enabled compile-time features.
fn enabled_features() -> Vec<&'static str> {
    [
        cfg!(feature = "mock").then_some("mock"),
        cfg!(feature = "dotenv").then_some("dotenv"),
    ]
    .into_iter()
    .flatten()
    .collect()
}
