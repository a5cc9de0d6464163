//! Run a preset from the command line.

use anyhow::Result;
use clap::Args;

use adgraph_graph::{run_preset, Preset, PresetParams};

use crate::config::AppConfig;

#[derive(Args)]
pub struct ExploreArgs {
    /// Preset name (ego, shortest-path, shared-designers, hubs,
    /// epstein-subgraph, full-graph, confirmed, search)
    pub preset: String,

    /// Subject name (ego)
    #[arg(long)]
    pub name: Option<String>,

    /// Traversal depth, 1-3 (ego)
    #[arg(long)]
    pub depth: Option<String>,

    /// Start subject (shortest-path)
    #[arg(long)]
    pub from: Option<String>,

    /// End subject (shortest-path)
    #[arg(long)]
    pub to: Option<String>,

    /// Number of hubs (hubs)
    #[arg(long)]
    pub limit: Option<String>,

    /// Search text (search)
    #[arg(short, long)]
    pub q: Option<String>,
}

impl ExploreArgs {
    fn params(self) -> PresetParams {
        PresetParams {
            preset: Some(self.preset),
            name: self.name,
            depth: self.depth,
            from: self.from,
            to: self.to,
            limit: self.limit,
            q: self.q,
        }
    }
}

pub async fn execute(args: ExploreArgs, config: &AppConfig) -> Result<()> {
    // Validate before connecting.
    let preset = Preset::from_params(&args.params())?;

    let client = super::connect(&config.neo4j).await?;
    let output = run_preset(&client, &preset).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
