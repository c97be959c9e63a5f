//! Common test utilities for building conversation graphs.
use keiro::graph::{
    CompareOp, Comparison, Condition, Graph, GraphEdge, GraphNode, NodeData, TransferKind,
};

/// Creates a simple linear flow with one uncovered negative branch.
///
/// `greet -> ask -> confirm {Yes, No}`, where only the "Yes" option is wired
/// (to a transfer). The "No" branch is left for the compiler to synthesize.
#[allow(dead_code)]
pub fn create_linear_flow() -> Graph {
    Graph::new(
        vec![
            GraphNode::start(
                "greet",
                NodeData::Greeting {
                    text: "Hi, this is Alex from Acme.".to_string(),
                    extracted_variables: vec![],
                },
            ),
            GraphNode::new(
                "ask",
                NodeData::Question {
                    text: "Would you like to hear about our plans?".to_string(),
                    extracted_variables: vec![],
                },
            ),
            GraphNode::new(
                "confirm",
                NodeData::CustomerResponse {
                    text: "Are you interested?".to_string(),
                    options: vec!["Yes".to_string(), "No".to_string()],
                    variable_name: "interested".to_string(),
                    variable_type: "boolean".to_string(),
                    is_open_ended: false,
                },
            ),
            GraphNode::new(
                "handoff",
                NodeData::Transfer {
                    text: "Great, connecting you now.".to_string(),
                    transfer_number: "15550100".to_string(),
                    transfer_kind: TransferKind::Warm,
                },
            ),
        ],
        vec![
            GraphEdge::new("e1", "greet", "ask"),
            GraphEdge::new("e2", "ask", "confirm"),
            GraphEdge::new("e3", "confirm", "handoff")
                .with_handle("option-0")
                .with_label("Yes"),
        ],
    )
}

/// Creates a flow with a conditional branch on a captured variable.
///
/// `intro -> cond(Age <= 65) -> senior_path / general_path`
#[allow(dead_code)]
pub fn create_conditional_flow() -> Graph {
    Graph::new(
        vec![
            GraphNode::new(
                "intro",
                NodeData::Response {
                    text: "Let me check what you qualify for.".to_string(),
                    extracted_variables: vec![],
                },
            ),
            GraphNode::new(
                "cond",
                NodeData::Conditional {
                    condition: Condition::Parsed(Comparison {
                        variable: "Age".to_string(),
                        op: CompareOp::Le,
                        value: "65".to_string(),
                    }),
                    true_label: None,
                    false_label: None,
                },
            ),
            GraphNode::new(
                "senior_path",
                NodeData::Response {
                    text: "You qualify for the standard plan.".to_string(),
                    extracted_variables: vec![],
                },
            ),
            GraphNode::new(
                "general_path",
                NodeData::Response {
                    text: "You qualify for the senior plan.".to_string(),
                    extracted_variables: vec![],
                },
            ),
        ],
        vec![
            GraphEdge::new("e1", "intro", "cond"),
            GraphEdge::new("e2", "cond", "senior_path").with_handle("true"),
            GraphEdge::new("e3", "cond", "general_path").with_handle("false"),
        ],
    )
}

/// Two nodes, no edges at all.
#[allow(dead_code)]
pub fn create_disconnected_graph() -> Graph {
    Graph::new(
        vec![
            GraphNode::new(
                "first",
                NodeData::Response {
                    text: "Hello.".to_string(),
                    extracted_variables: vec![],
                },
            ),
            GraphNode::new(
                "second",
                NodeData::Response {
                    text: "Goodbye.".to_string(),
                    extracted_variables: vec![],
                },
            ),
        ],
        vec![],
    )
}

/// A richer flow exercising every node kind and several variables.
#[allow(dead_code)]
pub fn create_full_flow() -> Graph {
    Graph::new(
        vec![
            GraphNode::start(
                "greet",
                NodeData::Greeting {
                    text: "Hello, thanks for calling.".to_string(),
                    extracted_variables: vec!["caller_name".to_string()],
                },
            ),
            GraphNode::new(
                "age_q",
                NodeData::CustomerResponse {
                    text: "How old are you?".to_string(),
                    options: vec!["Under 65".to_string(), "65 or over".to_string()],
                    variable_name: "Age".to_string(),
                    variable_type: "number".to_string(),
                    is_open_ended: false,
                },
            ),
            GraphNode::new(
                "checkpoint",
                NodeData::Response {
                    text: "Thanks, let me check your eligibility.".to_string(),
                    extracted_variables: vec![],
                },
            ),
            GraphNode::new(
                "cond",
                NodeData::Conditional {
                    condition: Condition::Raw(
                        "if (Age <= 65) { True } else { False }".to_string(),
                    ),
                    true_label: None,
                    false_label: None,
                },
            ),
            GraphNode::new(
                "lookup",
                NodeData::Webhook {
                    text: "One moment while I look that up.".to_string(),
                    url: "https://api.example.com/eligibility".to_string(),
                    method: "POST".to_string(),
                    body_template: "{\"age\": \"{{Age}}\"}".to_string(),
                    extract_vars: vec![keiro::graph::WebhookVar {
                        name: "plan_tier".to_string(),
                        var_type: "string".to_string(),
                        description: "Eligible plan tier".to_string(),
                    }],
                },
            ),
            GraphNode::new(
                "confirm",
                NodeData::Response {
                    text: "You are all set.".to_string(),
                    extracted_variables: vec!["confirmation_code".to_string()],
                },
            ),
            GraphNode::new(
                "bye",
                NodeData::EndCall {
                    text: "Thanks for your time. Goodbye!".to_string(),
                },
            ),
        ],
        vec![
            GraphEdge::new("e1", "greet", "age_q"),
            GraphEdge::new("e2", "age_q", "checkpoint")
                .with_handle("option-0")
                .with_label("Under 65"),
            GraphEdge::new("e3", "age_q", "checkpoint")
                .with_handle("option-1")
                .with_label("65 or over"),
            GraphEdge::new("e4", "checkpoint", "cond"),
            GraphEdge::new("e5", "cond", "lookup").with_handle("true"),
            GraphEdge::new("e6", "cond", "bye").with_handle("false"),
            GraphEdge::new("e7", "lookup", "confirm"),
            GraphEdge::new("e8", "confirm", "bye"),
        ],
    )
}
