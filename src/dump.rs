use crate::graph::{FlowEdge, NodeKind};
use crate::layout::PositionedNode;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The positioned graph in the shape the external diagram renderer
/// consumes: nodes with position and box, edges by port reference.
#[derive(Debug, Serialize)]
pub struct FlowDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub source_handles: Vec<HandleDump>,
}

#[derive(Debug, Serialize)]
pub struct HandleDump {
    pub id: String,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub label: Option<String>,
}

impl FlowDump {
    pub fn from_layout(nodes: &[PositionedNode], edges: &[FlowEdge]) -> Self {
        let nodes = nodes
            .iter()
            .map(|positioned| NodeDump {
                id: positioned.node.id.clone(),
                kind: match positioned.node.kind {
                    NodeKind::Question { .. } => "question".to_string(),
                    NodeKind::End { .. } => "end".to_string(),
                },
                x: positioned.position.x,
                y: positioned.position.y,
                width: positioned.dimensions.width,
                height: positioned.dimensions.height,
                source_handles: positioned
                    .node
                    .source_handles
                    .iter()
                    .map(|handle| HandleDump {
                        id: handle.id.clone(),
                        label: handle.label.clone(),
                    })
                    .collect(),
            })
            .collect();

        let edges = edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                source_handle: edge.source_handle.clone(),
                target: edge.target.clone(),
                label: edge.label.clone(),
            })
            .collect();

        FlowDump { nodes, edges }
    }
}

/// Write the dump as pretty JSON, to a file or stdout.
pub fn write_flow_dump(
    path: Option<&Path>,
    nodes: &[PositionedNode],
    edges: &[FlowEdge],
) -> anyhow::Result<()> {
    let dump = FlowDump::from_layout(nodes, edges);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &dump)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
