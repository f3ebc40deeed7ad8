//! rapidapi: command-line client for RapidAPI hosts.
//!
//! Issues one request through [`RapidApiClient`] and prints the response
//! envelope as JSON.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use rapidapi_client::config::{ClientConfig, Secrets};
use rapidapi_client::{Method, RapidApiClient, RapidApiError, RequestDescriptor};

/// RapidAPI command-line client
#[derive(Parser)]
#[command(name = "rapidapi")]
#[command(version = rapidapi_client::PKG_VERSION)]
#[command(about = "Call RapidAPI endpoints with caching and rate-limit reporting")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gateway host (overrides config and RAPIDAPI_HOST).
    #[arg(long)]
    host: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Perform a request and print the response envelope
    Request {
        /// Request URI, e.g. /current.json
        uri: String,
        /// HTTP method
        #[arg(short = 'X', long, default_value = "get")]
        method: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query")]
        query: Vec<String>,
        /// JSON payload
        #[arg(short, long)]
        data: Option<String>,
        /// Bypass the cache
        #[arg(long)]
        no_cache: bool,
        /// Cache TTL in milliseconds
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Version => {
            println!(
                "rapidapi {} ({}, built {})",
                rapidapi_client::version_string(),
                rapidapi_client::TARGET_TRIPLE,
                rapidapi_client::BUILD_TIMESTAMP
            );
        }
        Command::Request {
            uri,
            method,
            query,
            data,
            no_cache,
            ttl,
        } => {
            let client = build_client(args.config.as_deref(), args.host)?;
            let request = build_request(&uri, &method, &query, data.as_deref(), no_cache, ttl)?;
            let envelope = client.request(&request).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
    }

    Ok(())
}

fn build_client(
    config_path: Option<&std::path::Path>,
    host: Option<String>,
) -> rapidapi_client::Result<RapidApiClient> {
    let mut config = ClientConfig::load(config_path)?.with_env();
    if host.is_some() {
        config.host = host;
    }

    let api_key = Secrets::load()?.api_key().ok_or_else(|| {
        RapidApiError::Configuration(
            "No API key found. Set RAPIDAPI_KEY or create ~/.rapidapi/secrets.toml".to_string(),
        )
    })?;

    config.into_builder(api_key).build()
}

fn build_request(
    uri: &str,
    method: &str,
    query: &[String],
    data: Option<&str>,
    no_cache: bool,
    ttl: Option<u64>,
) -> rapidapi_client::Result<RequestDescriptor> {
    let mut request = RequestDescriptor::new(method.parse::<Method>()?, uri);

    for pair in query {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            RapidApiError::Validation(format!("query parameter '{pair}' is not key=value"))
        })?;
        request = request.param(name, value);
    }
    if let Some(data) = data {
        request = request.payload(serde_json::from_str::<Value>(data)?);
    }
    if no_cache {
        request = request.cache(false);
    }
    if let Some(ms) = ttl {
        request = request.ttl(Duration::from_millis(ms));
    }

    request.validate()?;
    Ok(request)
}
