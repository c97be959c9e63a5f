//! End-to-end tests: editor JSON in, pathway document JSON out, and back.
mod common;
use common::*;
use keiro::error::GraphConversionError;
use keiro::prelude::*;

const EDITOR_FLOW_JSON: &str = r#"{
  "nodes": [
    {
      "id": "greet-1",
      "type": "greeting",
      "data": { "text": "Hi, this is Sam from Acme.", "isStart": true }
    },
    {
      "id": "ask-plan",
      "type": "customerResponse",
      "data": {
        "text": "Are you interested in our plan?",
        "options": ["Yes", "No"],
        "variableName": "interested",
        "variableType": "boolean"
      }
    },
    {
      "id": "wrap-up",
      "type": "endCall",
      "data": { "text": "Thanks, goodbye!" }
    },
    {
      "id": 42,
      "type": "response",
      "data": { "text": "This node has a numeric id and is dropped." }
    }
  ],
  "edges": [
    { "id": "edge-a", "source": "greet-1", "target": "ask-plan" },
    {
      "id": "edge-b",
      "source": "ask-plan",
      "target": "wrap-up",
      "sourceHandle": "option-0",
      "label": "Yes"
    },
    { "id": "edge-c", "source": 42, "target": "wrap-up" }
  ]
}"#;

#[test]
fn test_editor_json_compiles_end_to_end() {
    let graph = EditorGraph::from_json(EDITOR_FLOW_JSON)
        .expect("parse editor JSON")
        .into_graph()
        .expect("convert editor graph");

    // The malformed node and its edge are dropped, not fatal.
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);

    let compiled = Compiler::builder(graph)
        .with_name("Acme Outbound")
        .build()
        .compile()
        .expect("compile");

    let document = &compiled.document;
    assert_eq!(document.name, "Acme Outbound");
    // Sanitized ids survive into the document.
    assert!(document.node("greet_1").is_some());
    assert!(document.node("ask_plan").is_some());
    // The unwired "No" branch now exists and terminates the call.
    let no_edge = document
        .edges
        .iter()
        .find(|e| e.source == "ask_plan" && e.label == "No")
        .expect("No branch missing");
    assert_eq!(
        document.node(&no_edge.target).map(|n| n.kind),
        Some(DocNodeKind::EndCall)
    );
    // Variables: the default seed plus the declared one, in order.
    let start = document.start_node().expect("start node");
    let names: Vec<&str> = start
        .data
        .extract_vars
        .as_ref()
        .expect("extractVars")
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["user_response", "interested"]);
}

#[test]
fn test_editor_json_without_nodes_is_fatal() {
    let result = EditorGraph::from_json(r#"{ "edges": [] }"#);
    assert!(matches!(
        result,
        Err(GraphConversionError::MissingCollection("nodes"))
    ));

    let result = EditorGraph::from_json(r#"{ "nodes": 5 }"#);
    assert!(matches!(
        result,
        Err(GraphConversionError::MissingCollection("nodes"))
    ));
}

#[test]
fn test_editor_json_with_unset_kinds_is_classified() {
    // No "type" on any node: roles come from topology alone.
    let json = r#"{
      "nodes": [
        { "id": "a", "data": { "text": "Hello there." } },
        { "id": "b", "data": { "text": "Want to proceed?" } },
        { "id": "c", "data": { "text": "Great." } },
        { "id": "d", "data": { "text": "Understood." } }
      ],
      "edges": [
        { "id": "e1", "source": "a", "target": "b" },
        { "id": "e2", "source": "b", "target": "c", "label": "Yes" },
        { "id": "e3", "source": "b", "target": "d", "label": "No" }
      ]
    }"#;
    let graph = EditorGraph::from_json(json)
        .expect("parse")
        .into_graph()
        .expect("convert");

    use keiro::graph::NodeKind;
    let kind_of = |id: &str| graph.node(id).map(|n| n.kind());
    assert_eq!(kind_of("a"), Some(NodeKind::Greeting));
    assert_eq!(kind_of("b"), Some(NodeKind::CustomerResponse));
    assert_eq!(kind_of("c"), Some(NodeKind::Response));
    assert_eq!(kind_of("d"), Some(NodeKind::Response));
}

#[test]
fn test_compiler_from_json_shortcut() {
    let compiled = Compiler::from_json(EDITOR_FLOW_JSON)
        .expect("build compiler")
        .compile()
        .expect("compile");
    assert!(
        compiled
            .document
            .nodes
            .iter()
            .any(|n| n.kind == DocNodeKind::EndCall)
    );
}

#[test]
fn test_document_json_round_trips() {
    let compiled = Compiler::builder(create_full_flow())
        .with_name("Full Flow")
        .build()
        .compile()
        .expect("compile");

    let json = serde_json::to_string_pretty(&compiled.document).expect("serialize");
    let reparsed = Document::from_json(&json).expect("reparse");
    assert_eq!(reparsed, compiled.document);
}

#[test]
fn test_compiled_document_decompiles_into_editable_graph() {
    let compiled = Compiler::builder(create_full_flow())
        .build()
        .compile()
        .expect("compile");
    let graph = Decompiler::new(compiled.document)
        .decompile()
        .expect("decompile");

    // Node count survives (the global config entry is not a node).
    assert_eq!(graph.nodes.len(), 6);
    assert!(graph.node("greet").is_some_and(|n| n.is_start));
    // The branch point keeps its authored options and regains handles.
    let handles: Vec<Option<&str>> = graph
        .outgoing("age_q")
        .map(|e| e.source_handle.as_deref())
        .collect();
    assert!(handles.contains(&Some("option-0")));
    assert!(handles.contains(&Some("option-1")));
}
