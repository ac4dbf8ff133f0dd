//! Hypertension Prediction API Client
//!
//! A CLI companion for exercising a running prediction server.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hypertension_api::infrastructure::ApiClient;
use hypertension_api::infrastructure::api_client::sample_patients;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Hypertension Prediction API client", long_about = None)]
struct Cli {
    /// Base URL of the prediction API
    #[arg(long, env = "API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Show model metadata
    ModelInfo,
    /// Predict for one patient
    Predict {
        /// JSON file holding one patient record (defaults to a sample patient)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Predict for several patients at once
    PredictBatch {
        /// JSON file holding an array of patient records (defaults to sample patients)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Run health, model-info, predict and predict-batch in sequence
    Demo,
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context(format!("Failed to parse {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.base_url)?;

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!(
                "status: {}, model_loaded: {}",
                health.status, health.model_loaded
            );
        }
        Commands::ModelInfo => {
            let info = client.model_info().await?;
            println!("Model type: {}", info.model_type);
            println!("Features ({}): {}", info.num_features, info.features.join(", "));
            println!("Target classes: {:?}", info.target_classes);
        }
        Commands::Predict { file } => {
            let patient = match file {
                Some(path) => read_json(&path)?,
                None => sample_patients().remove(0),
            };
            print_json(&client.predict(&patient).await?)?;
        }
        Commands::PredictBatch { file } => {
            let patients = match file {
                Some(path) => match read_json(&path)? {
                    Value::Array(records) => records,
                    _ => bail!("{} must contain a JSON array", path.display()),
                },
                None => sample_patients(),
            };
            print_json(&client.predict_batch(&patients).await?)?;
        }
        Commands::Demo => {
            let health = client.health().await?;
            if !health.model_loaded {
                bail!("API at {} reports no model loaded", client.base_url());
            }
            let info = client.model_info().await?;
            println!("Model: {} ({} features)", info.model_type, info.num_features);

            let patients = sample_patients();
            let single = client.predict(&patients[0]).await?;
            println!(
                "Single: {} (prob: {:.3}, conf: {})",
                describe(single.prediction),
                single.probability,
                single.confidence
            );

            let batch = client.predict_batch(&patients).await?;
            println!("Batch: {} patients", batch.total_patients);
            for item in &batch.predictions {
                println!(
                    "  Patient {}: {} (prob: {:.3}, conf: {})",
                    item.patient_id,
                    describe(item.prediction),
                    item.probability,
                    item.confidence
                );
            }
        }
    }

    Ok(())
}

fn describe(prediction: u8) -> &'static str {
    if prediction == 1 {
        "Hypertension"
    } else {
        "No Hypertension"
    }
}
