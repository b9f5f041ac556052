#![allow(missing_docs)]
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use swagger_mcp_core::{Config, Dispatcher, McpServer, SwaggerTools};

const SWAGGER_URL_VAR: &str = "SWAGGER_URL";
const AUTH_KEY_VAR: &str = "AUTH_KEY";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let AppArgs {
        swagger_url,
        auth_key,
    } = AppArgs::parse().context("parsing arguments")?;

    let Some(swagger_url) = swagger_url else {
        report_missing_url();
        return Ok(ExitCode::FAILURE);
    };

    let config = Config::new(&swagger_url, auth_key).context("invalid configuration")?;
    info!(
        url = %config.document_url(),
        authenticated = config.credential().is_some(),
        "starting swagger-mcp"
    );

    let server = McpServer::new(SwaggerTools::new(Dispatcher::new(config)));
    server
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
        .context("serving over stdio")?;

    info!("Bye!");
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug)]
struct AppArgs {
    swagger_url: Option<String>,
    auth_key: Option<String>,
}

impl AppArgs {
    /// Flags take precedence over the environment.
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let swagger_url: Option<String> = pargs
            .opt_value_from_str(["-u", "--swagger-url"])
            .context("parsing swagger url argument")?;

        let auth_key: Option<String> = pargs
            .opt_value_from_str(["-k", "--auth-key"])
            .context("parsing auth key argument")?;

        let result = Self {
            swagger_url: swagger_url.or_else(|| env_var(SWAGGER_URL_VAR)),
            auth_key: auth_key.or_else(|| env_var(AUTH_KEY_VAR)),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(result)
    }
}

#[allow(clippy::print_stderr)]
fn report_missing_url() {
    eprintln!("Error: {SWAGGER_URL_VAR} environment variable is required");
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
