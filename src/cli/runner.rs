//! CLI runner - executes commands

use crate::auth::AuthSession;
use crate::cli::commands::{Cli, Commands};
use crate::config::ExtractorConfig;
use crate::engine::{ExtractConfig, ExtractStats, Extractor};
use crate::error::Result;
use crate::flatten::flattener_for;
use crate::http::HttpClient;
use crate::output::JsonLinesSink;
use crate::pagination::PageFetcher;
use crate::types::Collection;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Collections => {
                for line in collections_catalog() {
                    self.output_message(&line);
                }
                Ok(())
            }
            Commands::Extract {
                collection,
                output,
                max_pages,
                page_size,
                include,
            } => {
                let config = self.load_config()?;
                let mut extract = config.extract_config();
                if let Some(size) = page_size {
                    extract = extract.with_page_size(*size);
                }
                if let Some(max) = max_pages {
                    extract = extract.with_max_pages(*max);
                }
                if let Some(include) = include {
                    extract = extract.with_include(include.as_str());
                }

                let stats =
                    extract_collection(&config, extract, *collection, output.as_deref()).await?;
                // Rows own stdout when no output file is given
                if output.is_some() {
                    self.output_message(&stats_message(*collection, &stats));
                }
                Ok(())
            }
        }
    }

    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        info!("Checking credentials against {}", config.auth_url);

        let client = HttpClient::with_config(config.http_config())?;
        let session =
            AuthSession::connect(&config.auth_url, config.credentials(), client.inner().clone())
                .await?;
        let token = session.token().await;

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": "SUCCEEDED",
                "expiresAt": token.expires_at.map(|t| t.to_rfc3339()),
            }
        }));
        Ok(())
    }

    fn load_config(&self) -> Result<ExtractorConfig> {
        match &self.cli.config {
            Some(path) => ExtractorConfig::load(path),
            None => ExtractorConfig::from_env(),
        }
    }

    fn output_message(&self, msg: &Value) {
        println!("{}", serde_json::to_string(msg).unwrap_or_default());
    }
}

/// Authenticate, extract one collection and write its rows as JSON lines
///
/// Rows go to `output` when given, otherwise to stdout. Rows written before
/// a fatal error stay in the destination.
pub async fn extract_collection(
    config: &ExtractorConfig,
    extract: ExtractConfig,
    collection: Collection,
    output: Option<&Path>,
) -> Result<ExtractStats> {
    let client = HttpClient::with_config(config.http_config())?;
    let session =
        AuthSession::connect(&config.auth_url, config.credentials(), client.inner().clone())
            .await?;
    let fetcher = PageFetcher::new(client, Arc::new(session), config.retry_policy());
    let extractor = Extractor::new(fetcher).with_config(extract);

    let mut sink = match output {
        Some(path) => JsonLinesSink::create(path).await?,
        None => JsonLinesSink::stdout(),
    };
    extractor.extract_to(collection, &mut sink).await
}

/// One catalog entry per supported collection
pub fn collections_catalog() -> Vec<Value> {
    Collection::ALL
        .into_iter()
        .map(|collection| {
            json!({
                "name": collection.name(),
                "path": collection.api_path(),
                "include": collection.default_include(),
                "columns": flattener_for(collection).columns(),
            })
        })
        .collect()
}

fn stats_message(collection: Collection, stats: &ExtractStats) -> Value {
    json!({
        "type": "SUMMARY",
        "summary": {
            "collection": collection.name(),
            "pages": stats.pages_fetched,
            "records": stats.records_fetched,
            "uniqueRecords": stats.unique_records(),
            "rows": stats.rows_written,
            "firstCreatedAt": stats.first_created_at,
            "lastCreatedAt": stats.last_created_at,
            "durationMs": stats.duration_ms,
        }
    })
}
