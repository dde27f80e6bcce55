//! wardrobe-advisor - resolve one styling analysis from the command line.
//!
//! Reads an analysis request as JSON from stdin, resolves it against the
//! configured OpenAI model, and prints the validated result as JSON on
//! stdout. Logs go to stderr.
//!
//! ```text
//! echo '{"kind":"color_season","signals":{"skinTone":"Clara","eyeColor":"Azul","hairColor":"Louro"}}' \
//!     | wardrobe-advisor
//! ```
//!
//! When the request carries a `user_id`, the result is also saved under the
//! configured data directory.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use wardrobe_advisor::adapters::{FsAnalysisRepository, OpenAIConfig, OpenAIProvider, SchemaPromptAssembler};
use wardrobe_advisor::application::{InferenceResolver, RunAnalysisCommand, RunAnalysisHandler};
use wardrobe_advisor::config::AppConfig;
use wardrobe_advisor::domain::foundation::UserId;
use wardrobe_advisor::domain::styling::{AnalysisCatalog, InferenceRequest};

/// Stdin payload: a request plus an optional owner.
#[derive(Debug, Deserialize)]
struct Invocation {
    user_id: Option<String>,
    #[serde(flatten)]
    request: InferenceRequest,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config);

    let Some(api_key) = config.ai.openai_api_key.clone().filter(|_| config.ai.has_openai()) else {
        bail!("WARDROBE_ADVISOR__AI__OPENAI_API_KEY is required");
    };

    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;

    let resolver = Arc::new(
        InferenceResolver::new(
            AnalysisCatalog::builtin(),
            config.resolver.detector(),
            Arc::new(provider),
            Arc::new(SchemaPromptAssembler::new()),
        )
        .with_max_tokens(config.ai.max_tokens)
        .with_temperature(0.2),
    );

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read request from stdin")?;
    let invocation: Invocation =
        serde_json::from_str(&input).context("Request is not a valid analysis request")?;

    tracing::info!(
        kind = invocation.request.kind.as_str(),
        signals = invocation.request.signals.len(),
        has_image = invocation.request.has_visual_input(),
        "Resolving analysis"
    );

    let result = match invocation.user_id {
        Some(user_id) => {
            let handler = RunAnalysisHandler::new(
                resolver,
                Arc::new(FsAnalysisRepository::new(&config.runtime.data_dir)),
            );
            handler
                .handle(RunAnalysisCommand {
                    user_id: UserId::new(user_id)?,
                    request: invocation.request,
                })
                .await?
        }
        None => resolver.resolve(invocation.request).await?,
    };

    println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.runtime.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}
