//! Edge bridge.
//!
//! Runs one edge function behind a local HTTP listener so a development
//! stack sees the same answers the CDN would give.
//!
//! ```text
//!     browser / reverse proxy
//!            │
//!            ▼
//!     ┌──────────────┐   envelope    ┌──────────────────────────┐
//!     │  edge-bridge │ ────────────▶ │ edge function            │
//!     │  (axum)      │ ◀──────────── │ in process, or a Lambda  │
//!     └──────────────┘    result     │ emulator's invoke API    │
//!            │                       └──────────────────────────┘
//!            ▼
//!     response, or 204 + X-Edge-Passthrough for the proxy to act on
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::bridge::{invoker_from_config, BridgeServer};
use edge_gateway::config::{resolve_config, validate_config, ConfigError, InvokeMode};
use edge_gateway::functions::FunctionKind;
use edge_gateway::lifecycle::Shutdown;
use edge_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "edge-bridge")]
#[command(about = "Serve an edge function over local HTTP", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:3344.
    #[arg(short, long)]
    bind: Option<String>,

    /// Edge function to run (edge, auth, cors, health, root).
    #[arg(short, long)]
    function: Option<FunctionKind>,

    /// Forward events to a Lambda-compatible endpoint instead of running in process.
    #[arg(long)]
    lambda_endpoint: Option<String>,

    /// Function name at the Lambda endpoint. Defaults to the function's own name.
    #[arg(long, requires = "lambda_endpoint")]
    lambda_function_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(function) = cli.function {
        config.bridge.function = function;
    }
    if let Some(endpoint) = cli.lambda_endpoint {
        let function_name = cli
            .lambda_function_name
            .unwrap_or_else(|| config.bridge.function.default_lambda_name().to_string());
        config.bridge.invoke = InvokeMode::Lambda {
            endpoint,
            function_name,
        };
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        function = %config.bridge.function,
        bind_address = %config.listener.bind_address,
        "edge-bridge starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let invoker = invoker_from_config(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = BridgeServer::new(&config, invoker);
    let rx = shutdown.subscribe();
    shutdown.trigger_on_signal();

    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
