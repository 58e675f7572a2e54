use crate::config::LayoutConfig;
use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Which node edge a port sits on. Source handles go on the right, the
/// synthetic target port on the left, so edges flow left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    Left,
    Right,
}

/// A fixed connection point on a node. Side and index are inputs to the
/// solver, never reassigned by it.
#[derive(Debug, Clone)]
pub struct SolverPort {
    pub id: String,
    pub side: PortSide,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct SolverNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub ports: Vec<SolverPort>,
}

/// Reserved box for an edge label, pre-sized by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SolverLabel {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct SolverEdge {
    pub id: String,
    pub source_port: String,
    pub target_port: String,
    pub label: Option<SolverLabel>,
}

#[derive(Debug, Clone, Default)]
pub struct SolverGraph {
    pub nodes: Vec<SolverNode>,
    pub edges: Vec<SolverEdge>,
}

/// Top-left node positions keyed by node id.
pub type NodePositions = HashMap<String, (f32, f32)>;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("edge `{edge}` references unknown port `{port}`")]
    UnknownEndpoint { edge: String, port: String },
    #[error("no position produced for node `{node}`")]
    MissingPosition { node: String },
}

/// The layered-layout algorithm behind a narrow seam, so it can be swapped
/// or stubbed without touching the graph builder or the engine.
pub trait LayeredSolver {
    fn solve(&self, graph: &SolverGraph) -> Result<NodePositions, SolveError>;
}

/// Production solver: left-to-right layered layout via dagre.
#[derive(Debug, Clone)]
pub struct DagreSolver {
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for DagreSolver {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl DagreSolver {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            node_spacing: config.node_spacing,
            rank_spacing: config.rank_spacing,
            margin_x: config.margin_x,
            margin_y: config.margin_y,
        }
    }
}

impl LayeredSolver for DagreSolver {
    fn solve(&self, graph: &SolverGraph) -> Result<NodePositions, SolveError> {
        let mut port_owner: HashMap<&str, &str> = HashMap::new();
        for node in &graph.nodes {
            for port in &node.ports {
                port_owner.insert(port.id.as_str(), node.id.as_str());
            }
        }

        let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
            DagreGraph::new(Some(GraphOption {
                directed: Some(true),
                multigraph: Some(false),
                compound: Some(false),
            }));

        // Dagre ranks at node granularity. Port order is honored by the
        // declaration order carried through to the output; label boxes are
        // reserved by widening the rank gap to the widest label.
        let widest_label = graph
            .edges
            .iter()
            .filter_map(|edge| edge.label.map(|label| label.width))
            .fold(0.0_f32, f32::max);

        let mut graph_config = DagreConfig::default();
        graph_config.rankdir = Some("lr".to_string());
        graph_config.nodesep = Some(self.node_spacing);
        graph_config.ranksep = Some(self.rank_spacing + widest_label);
        graph_config.marginx = Some(self.margin_x);
        graph_config.marginy = Some(self.margin_y);
        dagre_graph.set_graph(graph_config);

        for (index, node) in graph.nodes.iter().enumerate() {
            let mut dagre_node = DagreNode::default();
            dagre_node.width = node.width;
            dagre_node.height = node.height;
            dagre_node.order = Some(index);
            dagre_graph.set_node(node.id.clone(), Some(dagre_node));
        }

        let mut edge_set: HashSet<(String, String)> = HashSet::new();
        for edge in &graph.edges {
            let from = *port_owner.get(edge.source_port.as_str()).ok_or_else(|| {
                SolveError::UnknownEndpoint {
                    edge: edge.id.clone(),
                    port: edge.source_port.clone(),
                }
            })?;
            let to = *port_owner.get(edge.target_port.as_str()).ok_or_else(|| {
                SolveError::UnknownEndpoint {
                    edge: edge.id.clone(),
                    port: edge.target_port.clone(),
                }
            })?;
            // Self loops do not affect layering.
            if from == to {
                continue;
            }
            let from = from.to_string();
            let to = to.to_string();
            if !edge_set.insert((from.clone(), to.clone())) {
                continue;
            }
            let edge_label = DagreEdge::default();
            let _ = dagre_graph.set_edge(&from, &to, Some(edge_label), None);
        }

        dagre_layout::run_layout(&mut dagre_graph);

        let mut positions = NodePositions::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            let Some(dagre_node) = dagre_graph.node(&node.id) else {
                return Err(SolveError::MissingPosition {
                    node: node.id.clone(),
                });
            };
            // dagre reports centers; callers work with top-left corners.
            positions.insert(
                node.id.clone(),
                (
                    dagre_node.x - node.width / 2.0,
                    dagre_node.y - node.height / 2.0,
                ),
            );
        }

        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, ports: Vec<SolverPort>) -> SolverNode {
        SolverNode {
            id: id.to_string(),
            width: 100.0,
            height: 50.0,
            ports,
        }
    }

    fn source_port(id: &str) -> SolverPort {
        SolverPort {
            id: id.to_string(),
            side: PortSide::Right,
            index: 0,
        }
    }

    fn target_port(id: &str) -> SolverPort {
        SolverPort {
            id: id.to_string(),
            side: PortSide::Left,
            index: 0,
        }
    }

    fn chain_graph() -> SolverGraph {
        SolverGraph {
            nodes: vec![
                node("a", vec![source_port("a-out"), target_port("a_target")]),
                node("b", vec![source_port("b-out"), target_port("b_target")]),
            ],
            edges: vec![SolverEdge {
                id: "e-a-out".to_string(),
                source_port: "a-out".to_string(),
                target_port: "b_target".to_string(),
                label: None,
            }],
        }
    }

    #[test]
    fn connected_nodes_advance_left_to_right() {
        let positions = DagreSolver::default()
            .solve(&chain_graph())
            .expect("chain should solve");
        let (ax, _) = positions["a"];
        let (bx, _) = positions["b"];
        assert!(bx > ax, "target layer must sit right of source layer");
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let mut graph = chain_graph();
        graph.edges[0].target_port = "missing_target".to_string();
        let err = DagreSolver::default()
            .solve(&graph)
            .expect_err("dangling endpoint must fail");
        assert!(matches!(err, SolveError::UnknownEndpoint { .. }));
    }

    #[test]
    fn self_loop_is_tolerated() {
        let mut graph = chain_graph();
        graph.edges[0].target_port = "a_target".to_string();
        let positions = DagreSolver::default()
            .solve(&graph)
            .expect("self loop should not fail");
        assert_eq!(positions.len(), 2);
    }
}
