//! `addrval`: validate postal addresses against Azure Maps and keep a
//! bounded history of the results.
//!
//! # Usage
//!
//! ```
//! addrval validate --line1 "1 Microsoft Way" --postal-code 98052 \
//!   --city Redmond --country USA
//! addrval query 10 Downing St, London
//! addrval history --limit 5
//! addrval revalidate 0b6f5c1e-8f0d-4a43-9c55-0f3c2f0f6a11
//! ```
//!
//! Credentials come from `addrval.toml` or `ADDRVAL_SUBSCRIPTION_KEY` /
//! `ADDRVAL_ACCESS_TOKEN`.

mod app;
mod client;
mod settings;
mod ui;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use addrval_core::{
  address::AddressInput,
  engine::Validator,
  history::{DEFAULT_HISTORY_LIMIT, HistoryStore},
};
use addrval_store_json::JsonHistoryStore;
use anyhow::{Context, Result, bail};
use app::Session;
use clap::{Parser, Subcommand};
use client::AzureMapsClient;
use settings::Settings;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Address validation against Azure Maps")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(
    short,
    long,
    global = true,
    env = "ADDRVAL_CONFIG",
    default_value = "addrval.toml"
  )]
  config: PathBuf,

  /// Override the history file location.
  #[arg(long, global = true, value_name = "FILE")]
  history_path: Option<PathBuf>,

  /// Copy this sample log into the history when no history file exists yet.
  #[arg(long, global = true, value_name = "FILE")]
  seed: Option<PathBuf>,

  /// Override the number of records the history keeps.
  #[arg(long, global = true)]
  max_history: Option<usize>,

  /// Override the confidence threshold (0.0 to 1.0).
  #[arg(long, global = true)]
  threshold: Option<f64>,

  /// Override the Azure Maps endpoint.
  #[arg(long, global = true)]
  endpoint: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Validate a structured address and record the result.
  Validate {
    #[arg(long = "line1")]
    address_line1: String,
    #[arg(long = "line2")]
    address_line2: Option<String>,
    #[arg(long = "line3")]
    address_line3: Option<String>,
    #[arg(long)]
    postal_code:   String,
    #[arg(long)]
    city:          String,
    #[arg(long)]
    country:       String,
  },
  /// Validate a free-form address and record the result.
  Query {
    /// The address; multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    address: Vec<String>,
  },
  /// List recent validations, newest first.
  History {
    #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    limit: usize,
  },
  /// Show one history record in full.
  Show { id: Uuid },
  /// Validate a history record again and record the new result.
  Revalidate { id: Uuid },
  /// Delete all history.
  Clear {
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = load_settings(&cli)?;
  debug!(?settings.history_path, settings.max_history_size, "settings loaded");

  let store =
    JsonHistoryStore::open(&settings.history_path, settings.max_history_size)
      .await
      .with_context(|| {
        format!(
          "failed to open history at {}",
          settings.history_path.display()
        )
      })?;

  if let Some(seed) = &settings.seed_history_path
    && store.seed_from(seed).await.with_context(|| {
      format!("failed to seed history from {}", seed.display())
    })?
  {
    info!(seed = %seed.display(), "sample history loaded");
  }

  match cli.command {
    Command::History { limit } => {
      let records = store
        .get_history(limit)
        .await
        .context("failed to read validation history")?;
      print!("{}", ui::render_history(&records));
    }
    Command::Show { id } => {
      let record = store
        .get_by_id(id)
        .await
        .context("failed to read validation history")?;
      match record {
        Some(record) => print!("{}", ui::render_record(&record)),
        None => bail!("no history record with id {id}"),
      }
    }
    Command::Clear { yes } => {
      if !yes && !confirm("Delete all validation history?")? {
        println!("Cancelled.");
        return Ok(());
      }
      if store.clear().await.context("failed to clear history")? {
        println!("Validation history cleared.");
      } else {
        println!("No validation history to clear.");
      }
    }
    Command::Validate {
      address_line1,
      address_line2,
      address_line3,
      postal_code,
      city,
      country,
    } => {
      let input = AddressInput::new(
        address_line1,
        address_line2,
        address_line3,
        postal_code,
        city,
        country,
      )?;
      let session = session(&settings, store)?;
      let result = session.validate_new(input).await?;
      print!("{}", ui::render_result(&result));
    }
    Command::Query { address } => {
      let session = session(&settings, store)?;
      let result = session.validate_text(&address.join(" ")).await?;
      print!("{}", ui::render_result(&result));
    }
    Command::Revalidate { id } => {
      let session = session(&settings, store)?;
      let Some((source, result)) = session.revalidate_by_id(id).await? else {
        bail!("no history record with id {id}");
      };
      println!("Re-validating: {}", source.summary());
      print!("{}", ui::render_result(&result));
    }
  }

  Ok(())
}

/// File and environment first, then any flags given on the command line.
fn load_settings(cli: &Cli) -> Result<Settings> {
  let mut settings = Settings::load(&cli.config)?;

  if let Some(path) = &cli.history_path {
    settings.history_path = path.clone();
  }
  if let Some(seed) = &cli.seed {
    settings.seed_history_path = Some(seed.clone());
  }
  if let Some(max) = cli.max_history {
    settings.max_history_size = max;
  }
  if let Some(threshold) = cli.threshold {
    settings.confidence_threshold = threshold;
  }
  if let Some(endpoint) = &cli.endpoint {
    settings.endpoint = endpoint.clone();
  }

  settings.validate()?;
  Ok(settings)
}

fn session(
  settings: &Settings,
  store: JsonHistoryStore,
) -> Result<Session<AzureMapsClient, JsonHistoryStore>> {
  let client = AzureMapsClient::new(settings.maps_config()?)?;
  let validator = Validator::new(client, settings.confidence_threshold)
    .context("invalid confidence threshold")?;
  Ok(Session::new(validator, store))
}

fn confirm(prompt: &str) -> Result<bool> {
  print!("{prompt} [y/N] ");
  io::stdout().flush().context("failed to flush stdout")?;

  let mut answer = String::new();
  io::stdin()
    .lock()
    .read_line(&mut answer)
    .context("failed to read confirmation")?;
  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
