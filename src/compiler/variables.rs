use super::conditionals::parse_condition;
use crate::graph::{Condition, Graph, NodeData};
use itertools::Itertools;

/// Variable name assumed when the start node declares none.
pub const DEFAULT_VARIABLE: &str = "user_response";

/// Collects every extraction variable declared anywhere in the graph into a
/// single ordered, deduplicated list.
///
/// The list seeds from the start node's own declarations (or
/// [`DEFAULT_VARIABLE`] if it declares none), then walks the nodes in array
/// order. Ordering is stable so compiled output is reproducible; comparison
/// is exact string equality, no case folding.
pub fn collect_variables(graph: &Graph) -> Vec<String> {
    let seed: Vec<String> = match graph.start_node() {
        Some(start) => {
            let declared = declared_variables(&start.data);
            if declared.is_empty() {
                vec![DEFAULT_VARIABLE.to_string()]
            } else {
                declared
            }
        }
        None => vec![],
    };

    let body = graph.nodes.iter().flat_map(|node| match &node.data {
        NodeData::CustomerResponse { variable_name, .. } => vec![variable_name.clone()],
        NodeData::Response {
            extracted_variables,
            ..
        } => extracted_variables.clone(),
        NodeData::Conditional { condition, .. } => match condition {
            Condition::Parsed(c) => vec![c.variable.clone()],
            Condition::Raw(text) => parse_condition(text)
                .map(|c| vec![c.variable])
                .unwrap_or_default(),
        },
        _ => vec![],
    });

    seed.into_iter()
        .chain(body)
        .filter(|name| !name.is_empty())
        .unique()
        .collect()
}

fn declared_variables(data: &NodeData) -> Vec<String> {
    match data {
        NodeData::Greeting {
            extracted_variables,
            ..
        }
        | NodeData::Question {
            extracted_variables,
            ..
        }
        | NodeData::Response {
            extracted_variables,
            ..
        } => extracted_variables.clone(),
        NodeData::CustomerResponse { variable_name, .. } if !variable_name.is_empty() => {
            vec![variable_name.clone()]
        }
        _ => vec![],
    }
}
