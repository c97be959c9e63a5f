use crate::graph::{
    Condition, Graph, GraphEdge, NodeData, NodeKind,
    edge::{FALSE_HANDLE, TRUE_HANDLE},
};
use crate::idgen::IdGenerator;
use ahash::AHashSet;
use std::collections::VecDeque;

use super::conditionals::parse_condition;

/// The outcome of a structural validation pass.
///
/// `ok == false` never blocks compilation; callers proceed with `repaired`
/// and surface `issues` to the user as warnings before they confirm a
/// deployment.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub ok: bool,
    pub issues: Vec<String>,
    pub repaired: Graph,
}

/// Checks the graph for structural soundness and produces a best-effort
/// repaired copy alongside human-readable issue strings.
///
/// Checks: a single start node, terminal existence, start-to-terminal
/// reachability, conditional branch completeness, orphan detection, and
/// non-empty display text. Repairs are limited to start-flag fixup, one
/// synthesized reachability edge, and kind-specific fallback text; nothing
/// here ever fails.
pub fn validate(graph: &Graph) -> ValidationReport {
    let mut issues = Vec::new();
    let mut repaired = graph.clone();

    check_start(&mut repaired, &mut issues);
    let has_terminal = repaired.first_terminal().is_some();
    if !has_terminal {
        issues.push("No End Call node found; the conversation has no way to finish".to_string());
    }
    check_reachability(&mut repaired, has_terminal, &mut issues);
    check_conditionals(&repaired, &mut issues);
    check_orphans(&repaired, &mut issues);
    repair_missing_text(&mut repaired, &mut issues);

    ValidationReport {
        ok: issues.is_empty(),
        issues,
        repaired,
    }
}

/// Kind-specific fallback display text for nodes authored without any.
pub fn fallback_text(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Greeting => "Hello! How can I help you today?",
        NodeKind::Question => "Could you tell me a bit more?",
        NodeKind::Response => "Okay.",
        NodeKind::CustomerResponse => "How would you like to proceed?",
        NodeKind::Conditional => "",
        NodeKind::Transfer => "Please hold while I transfer you.",
        NodeKind::Webhook => "One moment please.",
        NodeKind::EndCall => super::branches::GOODBYE_TEXT,
    }
}

fn check_start(repaired: &mut Graph, issues: &mut Vec<String>) {
    let start_indices: Vec<usize> = repaired
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_start || n.kind() == NodeKind::Greeting)
        .map(|(i, _)| i)
        .collect();

    match start_indices.len() {
        0 => {
            issues.push(
                "No start node found; the first node will be treated as the entry point"
                    .to_string(),
            );
            if let Some(first) = repaired.nodes.first_mut() {
                first.is_start = true;
            }
        }
        1 => {}
        n => {
            issues.push(format!(
                "Found {} start candidates; only the first will be kept",
                n
            ));
            for &index in &start_indices[1..] {
                repaired.nodes[index].is_start = false;
            }
            repaired.nodes[start_indices[0]].is_start = true;
        }
    }
}

fn check_reachability(repaired: &mut Graph, has_terminal: bool, issues: &mut Vec<String>) {
    let Some(start_id) = repaired.start_node().map(|n| n.id.clone()) else {
        return;
    };

    let reachable = reachable_from(repaired, &start_id);
    let reaches_terminal = reachable
        .iter()
        .any(|id| repaired.node(id).is_some_and(|n| n.kind().is_terminal()));
    if reaches_terminal || !has_terminal {
        return;
    }

    issues.push(format!(
        "No End Call node is reachable from start node '{}'",
        start_id
    ));
    // Bridge from a reachable dead end (or the start itself) to the first
    // terminal so the repaired graph always completes.
    let from = reachable
        .iter()
        .rev()
        .find(|id| repaired.outgoing(id.as_str()).next().is_none())
        .cloned()
        .unwrap_or(start_id);
    if let Some(terminal_id) = repaired.first_terminal().map(|n| n.id.clone()) {
        let mut ids = IdGenerator::with_prefix("repair");
        let edge_id = ids.next_unused("edge", |candidate| {
            repaired.edges.iter().any(|e| e.id == candidate)
        });
        repaired
            .edges
            .push(GraphEdge::new(edge_id, from, terminal_id).with_label("Default"));
    }
}

fn check_conditionals(graph: &Graph, issues: &mut Vec<String>) {
    for node in &graph.nodes {
        let NodeData::Conditional { condition, .. } = &node.data else {
            continue;
        };
        if let Condition::Raw(text) = condition {
            if parse_condition(text).is_none() {
                issues.push(format!(
                    "Conditional node '{}' has an expression that could not be parsed",
                    node.id
                ));
            }
        }
        let has_true = graph
            .outgoing(&node.id)
            .any(|e| e.source_handle.as_deref() == Some(TRUE_HANDLE));
        let has_false = graph
            .outgoing(&node.id)
            .any(|e| e.source_handle.as_deref() == Some(FALSE_HANDLE));
        if !has_true {
            issues.push(format!(
                "Conditional node '{}' is missing its true branch",
                node.id
            ));
        }
        if !has_false {
            issues.push(format!(
                "Conditional node '{}' is missing its false branch",
                node.id
            ));
        }
    }
}

fn check_orphans(graph: &Graph, issues: &mut Vec<String>) {
    let start_id = graph.start_node().map(|n| n.id.clone());
    for node in &graph.nodes {
        let is_start = start_id.as_deref() == Some(node.id.as_str());
        if !is_start && graph.incoming(&node.id).next().is_none() {
            issues.push(format!(
                "Orphaned node '{}' ({}): no incoming edges",
                node.id,
                node.kind()
            ));
        }
        if !node.kind().is_terminal() && graph.outgoing(&node.id).next().is_none() {
            issues.push(format!(
                "Orphaned node '{}' ({}): no outgoing edges",
                node.id,
                node.kind()
            ));
        }
    }
}

fn repair_missing_text(repaired: &mut Graph, issues: &mut Vec<String>) {
    for node in &mut repaired.nodes {
        let missing = node
            .data
            .text()
            .is_some_and(|text| text.trim().is_empty());
        if missing {
            issues.push(format!(
                "Node '{}' has no display text; a default will be used",
                node.id
            ));
            node.data.set_text(fallback_text(node.kind()).to_string());
        }
    }
}

/// Breadth-first reachability over the edge list.
fn reachable_from(graph: &Graph, start_id: &str) -> Vec<String> {
    let mut visited: AHashSet<String> = AHashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    visited.insert(start_id.to_string());
    queue.push_back(start_id.to_string());
    while let Some(current) = queue.pop_front() {
        order.push(current.clone());
        for edge in graph.outgoing(&current) {
            if visited.insert(edge.target.clone()) {
                queue.push_back(edge.target.clone());
            }
        }
    }
    order
}
