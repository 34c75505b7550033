use std::io::Read;
use std::path::PathBuf;
use clap::Parser;
use serde_json::Value;

use edge_gateway::config::resolve_config;
use edge_gateway::functions::{EdgeFunction, FunctionKind};
use edge_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "edge-invoke")]
#[command(about = "Run one edge event through an edge function and print the result", long_about = None)]
struct Cli {
    /// Edge function to run (edge, auth, cors, health, root).
    function: FunctionKind,

    /// Event JSON file. Reads stdin when omitted or "-".
    event: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print compact JSON instead of pretty JSON.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;
    logging::init_stderr(&config.observability.log_level);

    let raw = match cli.event.as_deref() {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: Value = serde_json::from_str(&raw)?;

    let function = EdgeFunction::from_config(cli.function, &config)?;
    let result = function.invoke(event).await?;

    let output = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);

    Ok(())
}
