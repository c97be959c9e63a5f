use super::Graph;
use ahash::AHashMap;

/// Rewrites every node id into the `[A-Za-z0-9_]` character set so ids
/// survive round-tripping through the external format, updating all edge
/// references through a substitution map built in one pass.
///
/// Edges whose source or target does not resolve to a surviving node are
/// dropped rather than rejected; partially-malformed graphs are common after
/// manual JSON edits. Must run before any other stage; re-applying it is a
/// no-op for already-sanitized graphs.
pub fn normalize_ids(graph: Graph) -> Graph {
    let mut rename: AHashMap<String, String> = AHashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        rename.insert(node.id.clone(), sanitize_id(&node.id));
    }

    let nodes: Vec<_> = graph
        .nodes
        .into_iter()
        .filter_map(|mut node| {
            let id = rename.get(&node.id)?.clone();
            if id.is_empty() {
                return None;
            }
            node.id = id;
            Some(node)
        })
        .collect();

    let edges: Vec<_> = graph
        .edges
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut edge)| {
            let source = rename.get(&edge.source)?.clone();
            let target = rename.get(&edge.target)?.clone();
            if source.is_empty() || target.is_empty() {
                return None;
            }
            edge.id = sanitize_id(&edge.id);
            if edge.id.is_empty() {
                // Position-derived so re-normalizing stays a no-op.
                edge.id = format!("edge_{}", index);
            }
            edge.source = source;
            edge.target = target;
            // Handles are only rewritten when they reference a node id;
            // option-<i> / true / false markers pass through untouched.
            if let Some(handle) = &edge.source_handle {
                if let Some(renamed) = rename.get(handle) {
                    edge.source_handle = Some(renamed.clone());
                }
            }
            Some(edge)
        })
        .collect();

    Graph { nodes, edges }
}

/// Replaces every character outside `[A-Za-z0-9_]` with an underscore.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// True when the id already satisfies `^[A-Za-z0-9_]+$`.
pub fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
