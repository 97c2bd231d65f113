//! Prompt synthesis CLI.
//!
//! Usage: `vprompt-synth <request.json> <oracle-response.txt>`

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vprompt_models::SynthesisRequest;
use vprompt_pipeline::{PipelineConfig, PromptService, RecordedOracle};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vprompt=info"));

    // Logs go to stderr so stdout stays pure JSON
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    if let Err(e) = run().await {
        error!("vprompt-synth failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [request_path, response_path] = args.as_slice() else {
        bail!("usage: vprompt-synth <request.json> <oracle-response.txt>");
    };

    let config = PipelineConfig::from_env();
    config.validate()?;
    info!("Pipeline config: {:?}", config);

    let registry = config
        .load_style_registry()
        .context("Failed to load style registry")?;

    let request: SynthesisRequest = serde_json::from_str(
        &std::fs::read_to_string(request_path)
            .with_context(|| format!("Failed to read request {request_path}"))?,
    )
    .context("Invalid request JSON")?;

    let response = std::fs::read_to_string(response_path)
        .with_context(|| format!("Failed to read oracle response {response_path}"))?;

    let service = PromptService::new(
        config,
        Arc::new(registry),
        Arc::new(RecordedOracle::new(response)),
    );

    let result = service.synthesize(&request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
