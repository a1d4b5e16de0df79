//! Indicator expression server executable.
//!
//! Serves the expression engine over HTTP against a metadata snapshot
//! loaded at startup. See the server module documentation for endpoints
//! and configuration.

use atrius_indicator_expr::server::{ServerArgs, ServerConfig, run_server};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServerArgs::parse();
    run_server(ServerConfig::from(args)).await?;
    Ok(())
}
