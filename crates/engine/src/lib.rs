//! `engine` crate — graph model, structural validation, simulation, and the editor session.

pub mod error;
pub mod models;
pub mod session;
pub mod simulator;
pub mod validator;

mod index;

pub use error::EngineError;
pub use models::{Connection, Edge, Graph, Node, NodeData, Position};
pub use session::{EditorSession, NodeIdGenerator};
pub use simulator::{simulate, SimulationReport, SimulationStep};
pub use validator::{
    validate_graph, ValidationDetails, ValidationError, ValidationErrorKind, ValidationResult,
};
