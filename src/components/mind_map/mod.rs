mod component;
pub mod graph;
mod label_editor;
pub mod layout;
mod render;
pub mod state;
mod style_panel;
mod toolbar;
mod types;

pub use component::MindMap;
pub use graph::{Deleted, Graph};
pub use state::{Action, EditorState};
pub use types::{AttributePatch, Edge, EdgeId, Node, NodeAttributes, NodeId, Position, Shape, Size};
