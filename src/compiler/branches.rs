use crate::graph::{
    Graph, GraphEdge, GraphNode, NodeData,
    edge::{option_handle, option_index},
};
use crate::idgen::IdGenerator;
use ahash::AHashSet;
use itertools::Itertools;

/// Text spoken by a terminal node the compiler had to invent.
pub const GOODBYE_TEXT: &str = "Thank you for calling. Goodbye!";

/// The derived-label convention for an option covered by a generated edge.
pub fn user_responded_label(option: &str) -> String {
    format!("User responded {}", option)
}

/// True when an edge label accounts for the given option, either verbatim or
/// via the derived `User responded <option>` form. Case-sensitive.
pub fn label_covers_option(label: &str, option: &str) -> bool {
    label == option || label == user_responded_label(option)
}

/// Guarantees that every customer-response node has one outgoing labeled
/// edge per declared option.
///
/// Options already covered by an edge label are left alone. A node with no
/// outgoing edges at all is wired to the structurally-next node in node
/// order, which keeps decompiled or partially-authored graphs connectable.
/// Remaining uncovered options get a branch to a terminal node: the last
/// unresolved option reuses an existing terminal when one exists, every
/// other one gets a freshly created terminal with default goodbye text. A
/// negative option therefore never dead-ends.
///
/// Running this stage on its own output is a no-op; covered options are
/// never duplicated.
pub fn synthesize_branches(graph: Graph, ids: &mut IdGenerator) -> Graph {
    let mut graph = graph;
    let response_ids: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| matches!(n.data, NodeData::CustomerResponse { .. }))
        .map(|n| n.id.clone())
        .collect();

    for node_id in response_ids {
        let Some((position, node)) = graph.nodes.iter().find_position(|n| n.id == node_id) else {
            continue;
        };
        let NodeData::CustomerResponse { options, .. } = &node.data else {
            continue;
        };
        let options = options.clone();
        if options.is_empty() {
            continue;
        }

        // Dangling branch point: wire every option to the node that follows
        // it in node order, when there is one.
        if graph.outgoing(&node_id).next().is_none() {
            if let Some(next_id) = graph.nodes.get(position + 1).map(|n| n.id.clone()) {
                for (index, option) in options.iter().enumerate() {
                    let id = new_edge_id(&graph, ids);
                    graph.edges.push(
                        GraphEdge::new(id, node_id.clone(), next_id.clone())
                            .with_handle(option_handle(index))
                            .with_label(option.clone()),
                    );
                }
                continue;
            }
        }

        // Edges wired by handle but never labeled take the option text, so
        // the emitted document carries a label for every branch.
        for edge in graph.edges.iter_mut().filter(|e| e.source == node_id) {
            if edge.label.is_none() {
                if let Some(option) = edge
                    .source_handle
                    .as_deref()
                    .and_then(option_index)
                    .and_then(|i| options.get(i))
                {
                    edge.label = Some(option.clone());
                }
            }
        }

        let covered: AHashSet<usize> = graph
            .outgoing(&node_id)
            .filter_map(|edge| {
                let label = edge.label.as_deref()?;
                options
                    .iter()
                    .position(|option| label_covers_option(label, option))
            })
            .collect();

        let uncovered: Vec<(usize, String)> = options
            .iter()
            .enumerate()
            .filter(|(index, _)| !covered.contains(index))
            .map(|(index, option)| (index, option.clone()))
            .collect();

        for (remaining, (index, option)) in uncovered.iter().enumerate() {
            let is_last_unresolved = remaining == uncovered.len() - 1;
            let target = if is_last_unresolved {
                graph.first_terminal().map(|n| n.id.clone())
            } else {
                None
            };
            let target = match target {
                Some(existing) => existing,
                None => {
                    let id = ids.next_unused("end_call", |candidate| graph.contains(candidate));
                    graph.nodes.push(GraphNode::new(
                        id.clone(),
                        NodeData::EndCall {
                            text: GOODBYE_TEXT.to_string(),
                        },
                    ));
                    id
                }
            };
            let edge_id = new_edge_id(&graph, ids);
            graph.edges.push(
                GraphEdge::new(edge_id, node_id.clone(), target)
                    .with_handle(option_handle(*index))
                    .with_label(option.clone()),
            );
        }
    }
    graph
}

fn new_edge_id(graph: &Graph, ids: &mut IdGenerator) -> String {
    ids.next_unused("edge", |candidate| {
        graph.edges.iter().any(|e| e.id == candidate)
    })
}
