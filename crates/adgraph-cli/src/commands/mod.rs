//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use adgraph_graph::{GraphClient, GraphConfig};

use crate::config::AppConfig;

pub mod explore;
pub mod graph;
pub mod serve;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// ADGraph - magazine archive and document corpus knowledge graph
#[derive(Parser)]
#[command(name = "adgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "ADGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Neo4j connection overrides.
#[derive(Args, Debug, Clone)]
pub struct Neo4jArgs {
    /// Bolt URI
    #[arg(long, global = true, env = "NEO4J_URI")]
    pub neo4j_uri: Option<String>,

    #[arg(long, global = true, env = "NEO4J_USER")]
    pub neo4j_user: Option<String>,

    #[arg(long, global = true, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub neo4j_password: Option<String>,

    #[arg(long, global = true, env = "NEO4J_DATABASE")]
    pub neo4j_database: Option<String>,
}

impl Neo4jArgs {
    pub fn apply(&self, config: &mut GraphConfig) {
        if let Some(uri) = &self.neo4j_uri {
            config.uri = uri.clone();
        }
        if let Some(user) = &self.neo4j_user {
            config.user = user.clone();
        }
        if let Some(password) = &self.neo4j_password {
            config.password = password.clone();
        }
        if let Some(database) = &self.neo4j_database {
            config.database = database.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),

    /// Run a preset and print its JSON output
    Explore(explore::ExploreArgs),

    /// Knowledge Graph maintenance commands
    #[command(subcommand)]
    Graph(graph::GraphCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        self.neo4j.apply(&mut config.neo4j);

        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Explore(args) => explore::execute(args, &config).await,
            Commands::Graph(cmd) => graph::execute(cmd, &config).await,
        }
    }
}

/// Connect to Neo4j, failing fast when it is unreachable.
pub async fn connect(config: &GraphConfig) -> Result<GraphClient> {
    tokio::time::timeout(CONNECT_TIMEOUT, GraphClient::connect(config))
        .await
        .with_context(|| format!("Timed out connecting to Neo4j at {}", config.uri))?
}
