pub mod cancellation;
pub mod graph;
pub mod highlight;
pub mod solver;
pub mod style;

pub use cancellation::{RevealSignal, RevealState};
pub use graph::{
    ConnectionEdge, EdgeVisual, GraphSnapshot, GraphStore, parse_distance, validate_distance,
};
pub use highlight::{
    DEFAULT_STEP_DURATION, HighlightController, RevealEvent, RevealHandle, RevealSequence,
    traversed_edges,
};
pub use solver::{Hop, PathSolver, RoutePlan, solve};
pub use style::{
    BUS_PROFILE, DEFAULT_EDGE_WIDTH, HIGHLIGHT_EDGE_WIDTH, PATH_PROFILE, PLANE_PROFILE,
    StyleConfig,
};
