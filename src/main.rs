//! Main entry point for Youdao Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youdao_translator::cli::commands::{self, TranslateArgs};
use youdao_translator::TranslatorConfig;

/// Youdao Translator - translate the selection, an argument or the clipboard
#[derive(Parser, Debug)]
#[command(name = "youdao-translator", version, about, long_about = None)]
struct Args {
    /// Config file (TOML or JSON); defaults to ./youdao-translator.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source language (overrides config, e.g. `en`, `auto`)
    #[arg(long)]
    from: Option<String>,

    /// Target language (overrides config, e.g. `zh-CHS`)
    #[arg(long)]
    to: Option<String>,

    /// Fall back to the clipboard when there is no selection or text
    #[arg(long)]
    clipboard: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    translate: TranslateArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging; stdout is reserved for results
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = TranslatorConfig::load(args.config.as_deref())?;

    // Override config with CLI args if provided
    if let Some(from) = args.from {
        config.from_language = from;
    }
    if let Some(to) = args.to {
        config.to_language = to;
    }
    if args.clipboard {
        config.is_search_clipboard = true;
    }

    commands::handle_translate(args.translate, config).await
}
