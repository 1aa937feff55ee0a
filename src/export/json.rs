//! `{ "nodes": [...], "edges": [...] }` documents.

use serde::{Deserialize, Serialize};

use crate::components::mind_map::{Edge, Graph, Node};
use crate::error::ExportError;

#[derive(Serialize)]
struct DocumentRef<'a> {
	nodes: &'a [Node],
	edges: &'a [Edge],
}

#[derive(Deserialize)]
struct Document {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

/// Pretty-printed (2-space indent) dump of both collections in insertion order.
pub fn to_json(graph: &Graph) -> Result<String, ExportError> {
	let doc = DocumentRef {
		nodes: graph.nodes(),
		edges: graph.edges(),
	};
	Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a document written by [`to_json`] back into a checked graph.
pub fn from_json(text: &str) -> Result<Graph, ExportError> {
	let doc: Document = serde_json::from_str(text)?;
	Ok(Graph::from_parts(doc.nodes, doc.edges)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::{NodeAttributes, Position};

	#[test]
	fn layout_matches_internal_shape() {
		let mut g = Graph::new();
		let a = g.add_node(NodeAttributes::with_label("Main Topic"), Position::new(250.0, 250.0));
		let b = g.add_node(NodeAttributes::with_label("New Topic"), Position::new(500.0, 250.0));
		g.add_edge(&a, &b).unwrap();

		let text = to_json(&g).unwrap();
		assert!(text.starts_with("{\n  \"nodes\": [\n    {"));

		let value: serde_json::Value = serde_json::from_str(&text).unwrap();
		assert_eq!(value["nodes"][0]["id"], "1");
		assert_eq!(value["nodes"][0]["position"]["x"], 250.0);
		assert_eq!(value["nodes"][0]["data"]["label"], "Main Topic");
		assert_eq!(value["nodes"][1]["data"]["backgroundColor"], "white");
		assert_eq!(value["edges"][0]["id"], "e1-2");
		assert_eq!(value["edges"][0]["source"], "1");
		assert_eq!(value["edges"][0]["target"], "2");
	}

	#[test]
	fn dangling_edges_are_refused_on_import() {
		let text = r#"{"nodes":[],"edges":[{"id":"e1-2","source":"1","target":"2"}]}"#;
		assert!(matches!(from_json(text), Err(ExportError::Graph(_))));
	}

	#[test]
	fn missing_optional_attributes_take_defaults() {
		let text = r#"{"nodes":[{"id":"7","position":{"x":0,"y":0},"data":{"label":"x"}}],"edges":[]}"#;
		let g = from_json(text).unwrap();
		let node = g.node("7").unwrap();
		assert_eq!(node.data.background_color, "white");
		assert_eq!(node.data.image, None);
	}
}
