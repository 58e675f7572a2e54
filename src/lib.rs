#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dump;
pub mod graph;
pub mod layout;
pub mod solver;
pub mod survey;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, load_config};
pub use graph::{FlowEdge, FlowGraph, FlowNode, build_flow_graph};
pub use layout::{LayoutEngine, PositionedNode};
pub use solver::{DagreSolver, LayeredSolver};
pub use survey::{Branching, Destination, Question, QuestionType, Survey};
