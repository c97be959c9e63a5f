use crate::graph::{
    Comparison, CompareOp, Condition, Graph, GraphEdge, NodeData, edge::FALSE_HANDLE,
    edge::TRUE_HANDLE,
};
use crate::idgen::IdGenerator;
use ahash::AHashSet;

/// Parses a textual branching rule of the form
/// `if ( VAR OP VAL ) { True } else { False }`.
///
/// `VAR` must match `[A-Za-z0-9_]+`; `OP` is one of the six comparison
/// operators. Returns `None` on any deviation so the caller can leave the
/// node untouched and let the validator report it.
pub fn parse_condition(text: &str) -> Option<Comparison> {
    let rest = text.trim().strip_prefix("if")?.trim_start();
    let rest = rest.strip_prefix('(')?;
    let close = rest.find(')')?;
    let inner = rest[..close].trim();
    let after = &rest[close + 1..];
    if !after.contains('{') {
        return None;
    }

    // Two-character operators first so `<=` is not split as `<`.
    for token in ["<=", ">=", "==", "!=", "<", ">"] {
        let Some(pos) = inner.find(token) else {
            continue;
        };
        let variable = inner[..pos].trim();
        let value = inner[pos + token.len()..].trim();
        if variable.is_empty() || value.is_empty() {
            return None;
        }
        if !variable
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }
        return Some(Comparison {
            variable: variable.to_string(),
            op: CompareOp::parse(token)?,
            value: value.trim_matches(|c| c == '"' || c == '\'').to_string(),
        });
    }
    None
}

/// Removes every conditional node with a parseable rule, rewriting its
/// incoming and outgoing edges into direct labeled edges between each
/// predecessor and each successor (cross-product).
///
/// The true branch gets the label `<VAR><OP><VAL>`, the false branch the
/// negated form. Outgoing edges carrying neither a `true` nor a `false`
/// handle are preserved as direct edges with a `<VAR> <handle>` label rather
/// than dropped. A conditional with no predecessors is removed along with
/// its outgoing edges; there is nothing to connect from. Conditionals whose
/// rule fails to parse stay in the graph for the validator to report.
pub fn eliminate_conditionals(graph: Graph, ids: &mut IdGenerator) -> Graph {
    let mut graph = graph;
    let mut skipped: AHashSet<String> = AHashSet::new();

    // One conditional at a time against the evolving graph, so chained
    // conditionals rewire through each other correctly.
    loop {
        let Some((node_id, comparison)) = next_eliminable(&graph, &skipped) else {
            return graph;
        };
        let Some(comparison) = comparison else {
            skipped.insert(node_id);
            continue;
        };
        graph = eliminate_one(graph, &node_id, &comparison, ids);
    }
}

fn next_eliminable(
    graph: &Graph,
    skipped: &AHashSet<String>,
) -> Option<(String, Option<Comparison>)> {
    for node in &graph.nodes {
        if skipped.contains(&node.id) {
            continue;
        }
        let NodeData::Conditional { condition, .. } = &node.data else {
            continue;
        };
        let comparison = match condition {
            Condition::Parsed(c) => Some(c.clone()),
            Condition::Raw(text) => parse_condition(text),
        };
        return Some((node.id.clone(), comparison));
    }
    None
}

fn eliminate_one(
    graph: Graph,
    node_id: &str,
    comparison: &Comparison,
    ids: &mut IdGenerator,
) -> Graph {
    let incoming: Vec<GraphEdge> = graph.incoming(node_id).cloned().collect();
    let outgoing: Vec<GraphEdge> = graph.outgoing(node_id).cloned().collect();

    let mut replacements = Vec::new();
    if !incoming.is_empty() {
        let true_label = comparison.label();
        let false_label = comparison.negated_label();
        for inc in &incoming {
            for out in &outgoing {
                let label = match out.source_handle.as_deref() {
                    Some(TRUE_HANDLE) => true_label.clone(),
                    Some(FALSE_HANDLE) | None => false_label.clone(),
                    Some(other) => format!("{} {}", comparison.variable, other),
                };
                let id = ids.next_unused("edge", |candidate| {
                    graph.edges.iter().any(|e| e.id == candidate)
                });
                replacements
                    .push(GraphEdge::new(id, inc.source.clone(), out.target.clone()).with_label(label));
            }
        }
    }

    let nodes = graph.nodes.into_iter().filter(|n| n.id != node_id).collect();
    let edges = graph
        .edges
        .into_iter()
        .filter(|e| e.source != node_id && e.target != node_id)
        .chain(replacements)
        .collect();
    Graph { nodes, edges }
}
