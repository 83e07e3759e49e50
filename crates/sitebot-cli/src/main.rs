//! CLI entry point for sitebot.
//!
//! This binary provides the `sitebot` command with subcommands for running
//! the webhook server and inspecting the resolved configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitebot_core::Config;
use sitebot_intent::IntentExtractor;
use sitebot_line::LineClient;
use sitebot_llm::{LlmClient, LlmClientConfig};
use sitebot_sheets::{RecordUpdater, ServiceAccountKey, SheetsClient, TokenProvider};
use sitebot_web::{AppState, ServerConfig, WebServer, Workflow};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// sitebot — LINE webhook bridge for contract-compliance tracking.
#[derive(Parser)]
#[command(
    name = "sitebot",
    version,
    about = "LINE webhook bridge for contract-compliance tracking",
    long_about = "Receives LINE messages, extracts structured compliance updates with a \
                  language model, and writes them into a Google Sheets worksheet."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server.
    Serve,

    /// Resolve configuration from the environment and report it.
    CheckConfig,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => cmd_serve().await,
        Commands::CheckConfig => cmd_check_config(),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve() -> Result<()> {
    init_tracing("info");
    info!("starting sitebot");

    let config = Config::from_env().context("failed to resolve configuration")?;

    // Language model client and extractor.
    let llm_config = match &config.openai_base_url {
        Some(base_url) => LlmClientConfig::openai_compatible(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            base_url.clone(),
        ),
        None => LlmClientConfig::openai(config.openai_api_key.clone(), config.openai_model.clone()),
    };
    let llm = LlmClient::new(llm_config).context("failed to create LLM client")?;
    let extractor = IntentExtractor::new(llm, config.openai_model.clone());
    info!(model = %config.openai_model, "intent extractor ready");

    // Spreadsheet client and updater.
    let sa_key = ServiceAccountKey::from_json(&config.gspread_json)
        .context("failed to parse service-account credential")?;
    let tokens = TokenProvider::new(sa_key).context("failed to load service-account key")?;
    let sheets =
        SheetsClient::new(tokens, config.sheet_id.clone()).context("failed to create sheets client")?;
    let updater = RecordUpdater::new(sheets, config.worksheet.clone());
    info!(worksheet = %config.worksheet, "record updater ready");

    // Messaging client.
    let line = LineClient::new(config.line_channel_access_token.clone())
        .context("failed to create LINE client")?;

    // Assemble the workflow with its injected collaborators.
    let workflow = Workflow::new(
        Arc::new(extractor),
        Arc::new(updater),
        Arc::new(line),
        config.trigger_token.clone(),
    );

    let server = WebServer::new(
        ServerConfig {
            bind_addr: "0.0.0.0".into(),
            port: config.port,
        },
        AppState {
            channel_secret: config.line_channel_secret.clone(),
            workflow,
        },
    );

    server.run().await.context("webhook server failed")
}

// ---------------------------------------------------------------------------
// Subcommand: check-config
// ---------------------------------------------------------------------------

fn cmd_check_config() -> Result<()> {
    init_tracing("warn");

    let config = Config::from_env().context("failed to resolve configuration")?;

    println!("configuration ok");
    println!("  port:           {}", config.port);
    println!("  model:          {}", config.openai_model);
    println!(
        "  base url:       {}",
        config.openai_base_url.as_deref().unwrap_or("(default)")
    );
    println!("  sheet id:       {}", config.sheet_id);
    println!("  worksheet:      {}", config.worksheet);
    println!("  trigger token:  {}", config.trigger_token);

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber, honoring `RUST_LOG` when set.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
