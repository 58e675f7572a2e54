use crate::config::LayoutConfig;
use crate::graph::{FlowEdge, FlowNode, NodeKind};
use crate::solver::{
    LayeredSolver, PortSide, SolverEdge, SolverGraph, SolverLabel, SolverNode, SolverPort,
};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

/// A flow node annotated with its final top-left position and the box it
/// was laid out at. Node identity and order match the input.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: FlowNode,
    pub position: Position,
    pub dimensions: Dimensions,
}

/// The synthetic incoming port every node exposes on its left edge. Edges
/// attach here rather than to the node itself.
pub fn target_port_id(node_id: &str) -> String {
    format!("{node_id}_target")
}

pub struct LayoutEngine<S> {
    config: LayoutConfig,
    solver: S,
}

impl<S: LayeredSolver> LayoutEngine<S> {
    pub fn new(config: LayoutConfig, solver: S) -> Self {
        Self { config, solver }
    }

    /// Assign a position to every node. Single-shot and side-effect free;
    /// callers racing rapid rebuilds discard stale results themselves.
    ///
    /// Never fails: a solver error is logged and masked by placing every
    /// node at the origin, so the caller still has something to render.
    pub async fn layout(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<PositionedNode> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let graph = self.solver_graph(nodes, edges);
        match self.solver.solve(&graph) {
            Ok(positions) => nodes
                .iter()
                .map(|node| PositionedNode {
                    position: positions
                        .get(&node.id)
                        .map(|&(x, y)| Position { x, y })
                        .unwrap_or(ORIGIN),
                    dimensions: self.dimensions(node),
                    node: node.clone(),
                })
                .collect(),
            Err(err) => {
                log::warn!("flow layout failed, falling back to default positions: {err}");
                nodes
                    .iter()
                    .map(|node| PositionedNode {
                        position: ORIGIN,
                        dimensions: self.dimensions(node),
                        node: node.clone(),
                    })
                    .collect()
            }
        }
    }

    pub fn dimensions(&self, node: &FlowNode) -> Dimensions {
        match node.kind {
            NodeKind::Question { .. } => Dimensions {
                width: self.config.question_node_width,
                height: self.config.question_node_height,
            },
            NodeKind::End {
                has_thank_you: true,
            } => Dimensions {
                width: self.config.end_node_width,
                height: self.config.end_node_height,
            },
            NodeKind::End {
                has_thank_you: false,
            } => Dimensions {
                width: self.config.end_plain_width,
                height: self.config.end_plain_height,
            },
        }
    }

    fn solver_graph(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> SolverGraph {
        let solver_nodes = nodes
            .iter()
            .map(|node| {
                let Dimensions { width, height } = self.dimensions(node);
                let mut ports: Vec<SolverPort> = node
                    .source_handles
                    .iter()
                    .enumerate()
                    .map(|(index, handle)| SolverPort {
                        id: handle.id.clone(),
                        side: PortSide::Right,
                        index,
                    })
                    .collect();
                ports.push(SolverPort {
                    id: target_port_id(&node.id),
                    side: PortSide::Left,
                    index: 0,
                });
                SolverNode {
                    id: node.id.clone(),
                    width,
                    height,
                    ports,
                }
            })
            .collect();

        let solver_edges = edges
            .iter()
            .map(|edge| SolverEdge {
                id: edge.id.clone(),
                source_port: edge.source_handle.clone(),
                target_port: target_port_id(&edge.target),
                label: edge.label.as_ref().map(|label| self.label_box(label)),
            })
            .collect();

        SolverGraph {
            nodes: solver_nodes,
            edges: solver_edges,
        }
    }

    fn label_box(&self, label: &str) -> SolverLabel {
        SolverLabel {
            width: label.chars().count() as f32 * self.config.label_char_width
                + self.config.label_padding,
            height: self.config.label_height,
        }
    }
}

impl LayoutEngine<crate::solver::DagreSolver> {
    /// Engine wired to the production dagre solver.
    pub fn with_default_solver(config: LayoutConfig) -> Self {
        let solver = crate::solver::DagreSolver::from_config(&config);
        Self::new(config, solver)
    }
}
