use crate::graph::NodeKind;
use ahash::AHashSet;

/// A minimal view of a node used for role inference. `kind` is `None` for
/// the ambiguous nodes classification exists to resolve (the external
/// format's generic `Default` kind, or unset kinds in programmatic
/// authoring).
#[derive(Debug, Clone, Copy)]
pub struct RoleNode<'a> {
    pub id: &'a str,
    pub is_start: bool,
    pub kind: Option<NodeKind>,
}

/// A minimal view of an edge used for role inference.
#[derive(Debug, Clone, Copy)]
pub struct RoleEdge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub label: Option<&'a str>,
}

/// Infers a node's role from local graph topology.
///
/// Pure function of the graph shape; never mutates anything. Decision order,
/// first match wins:
///
/// 1. Explicitly flagged start node: greeting.
/// 2. More than one outgoing edge with non-identical labels: the node is a
///    branch point, so a customer response.
/// 3. No incoming edges: greeting.
/// 4. Any predecessor is (or resolves to) a customer response: this node
///    speaks after the caller answered, so a response.
/// 5. Any successor is (or resolves to) a customer response: this node sets
///    up the answer, so a question.
/// 6. Fallback: response.
pub fn classify(node_id: &str, nodes: &[RoleNode<'_>], edges: &[RoleEdge<'_>]) -> NodeKind {
    let Some(node) = nodes.iter().find(|n| n.id == node_id) else {
        return NodeKind::Response;
    };

    if node.is_start {
        return NodeKind::Greeting;
    }

    if has_branching_fanout(node_id, edges) {
        return NodeKind::CustomerResponse;
    }

    if !edges.iter().any(|e| e.target == node_id) {
        return NodeKind::Greeting;
    }

    let resolves_to_customer_response = |id: &str| {
        let neighbor = nodes.iter().find(|n| n.id == id);
        match neighbor.and_then(|n| n.kind) {
            Some(kind) => kind == NodeKind::CustomerResponse,
            // Unresolved neighbors get a shallow pass of rules 1-3 only,
            // which keeps the resolution from recursing.
            None => match neighbor {
                Some(n) if n.is_start => false,
                Some(n) => has_branching_fanout(n.id, edges),
                None => false,
            },
        }
    };

    if edges
        .iter()
        .filter(|e| e.target == node_id)
        .any(|e| resolves_to_customer_response(e.source))
    {
        return NodeKind::Response;
    }

    if edges
        .iter()
        .filter(|e| e.source == node_id)
        .any(|e| resolves_to_customer_response(e.target))
    {
        return NodeKind::Question;
    }

    NodeKind::Response
}

/// More than one outgoing edge, and the labels are not all identical.
fn has_branching_fanout(node_id: &str, edges: &[RoleEdge<'_>]) -> bool {
    let mut labels: AHashSet<&str> = AHashSet::new();
    let mut count = 0;
    for edge in edges.iter().filter(|e| e.source == node_id) {
        count += 1;
        labels.insert(edge.label.unwrap_or(""));
    }
    count > 1 && labels.len() > 1
}
