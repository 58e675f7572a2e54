use crate::survey::{Branching, Destination, Question, Survey};
use serde::Serialize;

pub const END_NODE_ID: &str = "end";

/// A node in the derived flow graph. One per survey question, plus exactly
/// one end node regardless of whether anything targets it.
#[derive(Debug, Clone, Serialize)]
pub struct FlowNode {
    pub id: String,
    pub kind: NodeKind,
    /// Outgoing connection points, in the order edges should visually
    /// leave the node top to bottom.
    pub source_handles: Vec<SourceHandle>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Question { index: usize, prompt: String },
    End { has_thank_you: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceHandle {
    pub id: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

pub fn question_node_id(index: usize) -> String {
    format!("question-{index}")
}

fn next_handle_id(index: usize) -> String {
    format!("q{index}-next")
}

fn response_handle_id(index: usize, bucket_key: &str) -> String {
    format!("q{index}-response-{bucket_key}")
}

/// Translate a survey's branching configuration into a flow graph.
///
/// This never fails: out-of-range jump destinations are passed through as
/// dangling edge targets rather than rejected, since no survey-wide
/// validation pass exists at this level. The layout engine degrades
/// gracefully when it meets one.
pub fn build_flow_graph(survey: &Survey) -> FlowGraph {
    let count = survey.questions.len();
    let mut nodes = Vec::with_capacity(count + 1);
    let mut edges = Vec::new();

    for (index, question) in survey.questions.iter().enumerate() {
        let node_id = question_node_id(index);
        let mut source_handles = Vec::new();

        let response_values = match &question.branching {
            Some(Branching::ResponseBased { response_values })
                if question.supports_response_branching() =>
            {
                Some(response_values)
            }
            _ => None,
        };

        if let Some(response_values) = response_values {
            for bucket in question.response_buckets() {
                let handle_id = response_handle_id(index, &bucket.key);
                let destination = response_values
                    .get(&bucket.key)
                    .copied()
                    .unwrap_or(Destination::NextQuestion);
                edges.push(FlowEdge {
                    id: format!("e-{handle_id}"),
                    source: node_id.clone(),
                    source_handle: handle_id.clone(),
                    target: resolve_destination(destination, index, count),
                    label: Some(bucket.label.clone()),
                });
                source_handles.push(SourceHandle {
                    id: handle_id,
                    label: Some(bucket.label),
                });
            }
        } else {
            let handle_id = next_handle_id(index);
            edges.push(FlowEdge {
                id: format!("e-{handle_id}"),
                source: node_id.clone(),
                source_handle: handle_id.clone(),
                target: single_handle_target(question, index, count),
                label: None,
            });
            source_handles.push(SourceHandle {
                id: handle_id,
                label: None,
            });
        }

        nodes.push(FlowNode {
            id: node_id,
            kind: NodeKind::Question {
                index,
                prompt: question.prompt.clone(),
            },
            source_handles,
        });
    }

    nodes.push(FlowNode {
        id: END_NODE_ID.to_string(),
        kind: NodeKind::End {
            has_thank_you: survey.thank_you.is_some(),
        },
        source_handles: Vec::new(),
    });

    FlowGraph { nodes, edges }
}

fn default_target(index: usize, count: usize) -> String {
    if index + 1 < count {
        question_node_id(index + 1)
    } else {
        END_NODE_ID.to_string()
    }
}

fn resolve_destination(destination: Destination, index: usize, count: usize) -> String {
    match destination {
        Destination::NextQuestion => default_target(index, count),
        Destination::End => END_NODE_ID.to_string(),
        Destination::Question(target) => question_node_id(target),
    }
}

fn single_handle_target(question: &Question, index: usize, count: usize) -> String {
    match &question.branching {
        None | Some(Branching::NextQuestion) => default_target(index, count),
        Some(Branching::End) => END_NODE_ID.to_string(),
        Some(Branching::SpecificQuestion { index: target }) => question_node_id(*target),
        // Response-based config on a question type that does not offer it
        // is ignored and the default applies.
        Some(Branching::ResponseBased { .. }) => default_target(index, count),
    }
}
