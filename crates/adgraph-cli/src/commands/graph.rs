//! Knowledge Graph CLI commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use adgraph_graph::{schema, GraphStore};

use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Show graph status
    Status,

    /// Create lookup indexes used by the presets
    InitSchema,
}

pub async fn execute(cmd: GraphCommands, config: &AppConfig) -> Result<()> {
    let client = super::connect(&config.neo4j).await?;

    match cmd {
        GraphCommands::Status => cmd_status(&client, &config.neo4j.uri).await,
        GraphCommands::InitSchema => {
            let statements = schema::initialize_schema(&client).await?;
            println!("{} {} index statements applied", "✓".green(), statements);
            Ok(())
        }
    }
}

async fn cmd_status(store: &dyn GraphStore, uri: &str) -> Result<()> {
    println!("{}", "Knowledge Graph Status".bold());
    println!("{}", "─".repeat(40));

    let counts = store.counts().await?;
    println!("  Server:        {}", uri.dimmed());
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());

    println!("{}", "─".repeat(40));

    Ok(())
}
