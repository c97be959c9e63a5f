//! Tests for the compile pipeline and its structural guarantees.
mod common;
use common::*;
use keiro::prelude::*;

fn is_well_formed(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[test]
fn test_compile_synthesizes_missing_negative_branch() {
    let compiled = Compiler::builder(create_linear_flow())
        .build()
        .compile()
        .expect("Failed to compile");
    let document = &compiled.document;

    // The unwired "No" option must now lead to a synthesized End Call node.
    let no_edge = document
        .edges
        .iter()
        .find(|e| e.source == "confirm" && e.label == "No")
        .expect("No branch was not synthesized");
    let target = document
        .node(&no_edge.target)
        .expect("No branch points at a missing node");
    assert_eq!(target.kind, DocNodeKind::EndCall);

    // The terminal did not exist in the authored graph.
    assert!(!["greet", "ask", "confirm", "handoff"].contains(&no_edge.target.as_str()));
}

#[test]
fn test_compile_eliminates_conditionals() {
    let compiled = Compiler::builder(create_conditional_flow())
        .build()
        .compile()
        .expect("Failed to compile");
    let document = &compiled.document;

    assert!(document.node("cond").is_none(), "Conditional node survived");
    assert!(
        document
            .edges
            .iter()
            .any(|e| e.source == "intro" && e.target == "senior_path" && e.label == "Age<=65")
    );
    assert!(
        document
            .edges
            .iter()
            .any(|e| e.source == "intro" && e.target == "general_path" && e.label == "Age>65")
    );
}

#[test]
fn test_compile_has_exactly_one_start() {
    for graph in [
        create_linear_flow(),
        create_conditional_flow(),
        create_disconnected_graph(),
        create_full_flow(),
    ] {
        let compiled = Compiler::builder(graph).build().compile().expect("compile");
        let starts = compiled
            .document
            .nodes
            .iter()
            .filter(|n| n.is_start())
            .count();
        assert_eq!(starts, 1, "expected exactly one start node");
    }
}

#[test]
fn test_compile_normalizes_messy_ids() {
    let mut graph = create_linear_flow();
    graph.nodes[0].id = "greet node #1".to_string();
    graph.edges[0].source = "greet node #1".to_string();

    let compiled = Compiler::builder(graph).build().compile().expect("compile");
    for node in &compiled.document.nodes {
        assert!(is_well_formed(&node.id), "bad node id: {}", node.id);
    }
    for edge in &compiled.document.edges {
        assert!(is_well_formed(&edge.id), "bad edge id: {}", edge.id);
        assert!(is_well_formed(&edge.source));
        assert!(is_well_formed(&edge.target));
    }
    assert!(compiled.document.node("greet_node__1").is_some());
}

#[test]
fn test_compile_attaches_variables_in_first_seen_order() {
    let compiled = Compiler::builder(create_full_flow())
        .build()
        .compile()
        .expect("compile");
    let start = compiled
        .document
        .start_node()
        .expect("document has no start node");
    let names: Vec<&str> = start
        .data
        .extract_vars
        .as_ref()
        .expect("start node has no extractVars")
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["caller_name", "Age", "confirmation_code"]);

    // The customer-response declaration carries its authored type through.
    let age = start
        .data
        .extract_vars
        .as_ref()
        .and_then(|vars| vars.iter().find(|v| v.name == "Age"))
        .expect("Age variable missing");
    assert_eq!(age.var_type, "number");
}

#[test]
fn test_compile_reaches_terminal_from_start() {
    let compiled = Compiler::builder(create_full_flow())
        .build()
        .compile()
        .expect("compile");
    let document = &compiled.document;
    let start = document.start_node().expect("no start");

    let mut frontier = vec![start.id.clone()];
    let mut seen = std::collections::HashSet::new();
    let mut reached_terminal = false;
    while let Some(current) = frontier.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        if document
            .node(&current)
            .is_some_and(|n| n.kind == DocNodeKind::EndCall)
        {
            reached_terminal = true;
            break;
        }
        for edge in document.outgoing(&current) {
            frontier.push(edge.target.clone());
        }
    }
    assert!(reached_terminal, "start cannot reach any End Call node");
}

#[test]
fn test_compile_degenerate_graph_still_produces_valid_document() {
    let compiled = Compiler::builder(create_disconnected_graph())
        .build()
        .compile()
        .expect("compile");
    let document = &compiled.document;

    assert!(!compiled.issues.is_empty());
    assert!(
        document
            .nodes
            .iter()
            .any(|n| n.kind == DocNodeKind::Default)
    );
    assert!(
        document
            .nodes
            .iter()
            .any(|n| n.kind == DocNodeKind::EndCall)
    );
    // Documents are never emitted edge-less when there is anything to wire.
    assert!(!document.edges.is_empty());
}

#[test]
fn test_compile_empty_graph_synthesizes_both_required_nodes() {
    let compiled = Compiler::builder(Graph::default())
        .build()
        .compile()
        .expect("compile");
    let document = &compiled.document;
    assert!(
        document
            .nodes
            .iter()
            .any(|n| n.kind == DocNodeKind::Default)
    );
    assert!(
        document
            .nodes
            .iter()
            .any(|n| n.kind == DocNodeKind::EndCall)
    );
    assert_eq!(document.edges.len(), 1);
    assert_eq!(document.edges[0].label, "Default");
}

#[test]
fn test_compile_output_is_deterministic() {
    let first = Compiler::builder(create_linear_flow())
        .build()
        .compile()
        .expect("compile");
    let second = Compiler::builder(create_linear_flow())
        .build()
        .compile()
        .expect("compile");
    let a = serde_json::to_string(&first.document).expect("serialize");
    let b = serde_json::to_string(&second.document).expect("serialize");
    assert_eq!(a, b);
}

#[test]
fn test_document_json_ends_with_global_config() {
    let compiled = Compiler::builder(create_linear_flow())
        .with_name("Sales Flow")
        .with_description("Outbound qualification")
        .build()
        .compile()
        .expect("compile");

    let value = serde_json::to_value(&compiled.document).expect("serialize");
    assert_eq!(value["name"], "Sales Flow");
    let nodes = value["nodes"].as_array().expect("nodes array");
    let last = nodes.last().expect("nodes array is empty");
    assert!(
        last.get("globalConfig").is_some(),
        "globalConfig entry must be the last node"
    );
    // And only the last entry carries it.
    assert_eq!(
        nodes
            .iter()
            .filter(|n| n.get("globalConfig").is_some())
            .count(),
        1
    );
}

#[test]
fn test_compile_keeps_unparseable_conditional_and_reports_it() {
    let mut graph = create_conditional_flow();
    if let keiro::graph::NodeData::Conditional { condition, .. } = &mut graph.nodes[1].data {
        *condition = keiro::graph::Condition::Raw("if Age is over 65 then stop".to_string());
    }
    let compiled = Compiler::builder(graph).build().compile().expect("compile");

    assert!(
        compiled
            .issues
            .iter()
            .any(|i| i.contains("could not be parsed")),
        "unparseable conditional was not reported: {:?}",
        compiled.issues
    );
    // The node is kept (as a Default) rather than silently dropped.
    assert!(compiled.document.node("cond").is_some());
}
