//! Cypher projections that tag graph values for the decode step.

fn node_fields(var: &str) -> String {
    format!("identity: elementId({var}), labels: labels({var}), properties: properties({var})")
}

fn rel_fields(var: &str) -> String {
    format!(
        "identity: elementId({var}), start: elementId(startNode({var})), end: elementId(endNode({var})), \
         type: type({var}), properties: properties({var})"
    )
}

/// Project a node variable as `{kind: 'node', ...}`; null stays null.
pub fn node_map(var: &str) -> String {
    format!(
        "CASE WHEN {var} IS NULL THEN null ELSE {{kind: 'node', {fields}}} END",
        fields = node_fields(var)
    )
}

/// Project a path variable as `{kind: 'path', nodes, relationships}`;
/// null stays null.
pub fn path_map(var: &str) -> String {
    format!(
        "CASE WHEN {var} IS NULL THEN null ELSE {{kind: 'path', \
         nodes: [x IN nodes({var}) | {{{nodes}}}], \
         relationships: [r IN relationships({var}) | {{{rels}}}]}} END",
        nodes = node_fields("x"),
        rels = rel_fields("r")
    )
}
