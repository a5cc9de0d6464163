//! Web server command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "ADGRAPH_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "ADGRAPH_HOST")]
    pub host: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: AppConfig) -> Result<()> {
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);

    let client = super::connect(&config.neo4j).await?;
    info!(uri = %config.neo4j.uri, "Connected to Neo4j");

    println!();
    println!("  {} {}", "ADGraph".cyan().bold(), "Graph Server".bold());
    println!();
    println!("  {}      {}", "Neo4j".green(), config.neo4j.uri);
    println!("  {}      http://{}:{}/graph", "Graph".green(), host, port);
    println!("  {}     http://{}:{}/graph/legend", "Legend".green(), host, port);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    adgraph_web::run_server(Arc::new(client), &host, port).await?;

    Ok(())
}
