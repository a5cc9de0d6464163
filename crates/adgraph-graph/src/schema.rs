//! Neo4j lookup indexes used by the presets.

use anyhow::Result;
use neo4rs::Query;
use tracing::info;

use crate::GraphClient;

/// Presets look entities up by `name` and filter on `verdict`.
const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE INDEX person_name IF NOT EXISTS FOR (p:Person) ON (p.name)",
    "CREATE INDEX designer_name IF NOT EXISTS FOR (d:Designer) ON (d.name)",
    "CREATE INDEX location_name IF NOT EXISTS FOR (l:Location) ON (l.name)",
    "CREATE INDEX style_name IF NOT EXISTS FOR (s:Style) ON (s.name)",
    "CREATE INDEX author_name IF NOT EXISTS FOR (a:Author) ON (a.name)",
    "CREATE INDEX issue_key IF NOT EXISTS FOR (i:Issue) ON (i.key)",
    "CREATE INDEX source_name IF NOT EXISTS FOR (s:EpsteinSource) ON (s.name)",
    "CREATE INDEX person_verdict IF NOT EXISTS FOR (p:Person) ON (p.verdict)",
];

/// Create lookup indexes.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(client: &GraphClient) -> Result<usize> {
    info!("Initializing Neo4j indexes...");

    for statement in SCHEMA_STATEMENTS {
        client.execute(Query::new(statement.to_string())).await?;
    }

    info!("Neo4j indexes initialized ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(SCHEMA_STATEMENTS.len())
}
