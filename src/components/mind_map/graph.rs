use std::collections::HashSet;

use super::types::{AttributePatch, Edge, EdgeId, Node, NodeAttributes, NodeId, Position};
use crate::error::GraphError;

/// How much a [`Graph::delete_nodes`] call removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deleted {
	/// Nodes removed.
	pub nodes: usize,
	/// Edges removed along with them.
	pub edges: usize,
}

/// Flat node/edge collections in insertion order.
///
/// Every edge endpoint names a node in `nodes`; all mutations keep that true.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	next_id: u64,
}

impl Graph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Rebuild a graph from already-built collections, checking ids and endpoints.
	pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
		let mut seen = HashSet::new();
		for node in &nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
		}
		let mut edge_ids = HashSet::new();
		for edge in &edges {
			for end in [&edge.source, &edge.target] {
				if !seen.contains(end.as_str()) {
					return Err(GraphError::UnknownNode(end.clone()));
				}
			}
			if !edge_ids.insert(edge.id.as_str()) {
				return Err(GraphError::DuplicateEdge(edge.id.clone()));
			}
		}
		Ok(Self {
			nodes,
			edges,
			next_id: 0,
		})
	}

	/// All nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Whether a node with `id` exists.
	pub fn contains(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn fresh_id(&mut self) -> NodeId {
		loop {
			self.next_id += 1;
			let id = self.next_id.to_string();
			if !self.contains(&id) {
				return id;
			}
		}
	}

	/// Append a node under a fresh id.
	pub fn add_node(&mut self, data: NodeAttributes, position: Position) -> NodeId {
		let id = self.fresh_id();
		self.nodes.push(Node {
			id: id.clone(),
			position,
			data,
		});
		id
	}

	/// Insert a node under a caller-chosen id.
	pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
		if self.contains(&node.id) {
			return Err(GraphError::DuplicateNode(node.id));
		}
		self.nodes.push(node);
		Ok(())
	}

	/// Connect `source` to `target`. Leaves the graph untouched on error.
	pub fn add_edge(&mut self, source: &str, target: &str) -> Result<EdgeId, GraphError> {
		for end in [source, target] {
			if !self.contains(end) {
				return Err(GraphError::UnknownNode(end.to_string()));
			}
		}
		let id = Edge::id_for(source, target);
		if self
			.edges
			.iter()
			.any(|e| e.id == id || (e.source == source && e.target == target))
		{
			return Err(GraphError::DuplicateEdge(id));
		}
		self.edges.push(Edge {
			id: id.clone(),
			source: source.to_string(),
			target: target.to_string(),
		});
		Ok(id)
	}

	/// Remove the given nodes and every edge incident to any of them.
	pub fn delete_nodes(&mut self, ids: &HashSet<NodeId>) -> Deleted {
		if ids.is_empty() {
			return Deleted::default();
		}
		let (nodes_before, edges_before) = (self.nodes.len(), self.edges.len());
		self.nodes.retain(|n| !ids.contains(&n.id));
		self.edges
			.retain(|e| !ids.contains(&e.source) && !ids.contains(&e.target));
		Deleted {
			nodes: nodes_before - self.nodes.len(),
			edges: edges_before - self.edges.len(),
		}
	}

	/// Remove the given edges; nodes are never touched. Returns how many went.
	pub fn delete_edges(&mut self, ids: &HashSet<EdgeId>) -> usize {
		let before = self.edges.len();
		self.edges.retain(|e| !ids.contains(&e.id));
		before - self.edges.len()
	}

	/// Merge `patch` into every node named in `ids`; returns how many matched.
	pub fn update_node_attributes(&mut self, ids: &HashSet<NodeId>, patch: &AttributePatch) -> usize {
		let mut touched = 0;
		for node in self.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
			node.data = node.data.merged(patch);
			touched += 1;
		}
		touched
	}

	/// Replace one node's label; false when the node is gone.
	pub fn set_label(&mut self, id: &str, label: &str) -> bool {
		let ids = HashSet::from([id.to_string()]);
		self.update_node_attributes(&ids, &AttributePatch::label(label)) > 0
	}

	/// Move one node; false when the node is gone.
	pub fn move_node(&mut self, id: &str, position: Position) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.position = position;
				true
			}
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::types::Shape;

	fn ids(list: &[&str]) -> HashSet<NodeId> {
		list.iter().map(|s| s.to_string()).collect()
	}

	fn triangle() -> (Graph, NodeId, NodeId, NodeId) {
		let mut g = Graph::new();
		let a = g.add_node(NodeAttributes::with_label("a"), Position::default());
		let b = g.add_node(NodeAttributes::with_label("b"), Position::new(250.0, 0.0));
		let c = g.add_node(NodeAttributes::with_label("c"), Position::new(500.0, 0.0));
		g.add_edge(&a, &b).unwrap();
		g.add_edge(&b, &c).unwrap();
		g.add_edge(&a, &c).unwrap();
		(g, a, b, c)
	}

	#[test]
	fn fresh_ids_skip_existing() {
		let mut g = Graph::new();
		g.insert_node(Node {
			id: "1".into(),
			position: Position::default(),
			data: NodeAttributes::default(),
		})
		.unwrap();
		let id = g.add_node(NodeAttributes::default(), Position::default());
		assert_eq!(id, "2");
		assert_eq!(g.len(), 2);
	}

	#[test]
	fn edge_ids_follow_convention() {
		let (g, a, b, _) = triangle();
		assert_eq!(g.edges()[0].id, format!("e{a}-{b}"));
	}

	#[test]
	fn edge_to_missing_node_is_rejected() {
		let (mut g, a, _, _) = triangle();
		let before = g.clone();
		assert_eq!(
			g.add_edge(&a, "nope"),
			Err(GraphError::UnknownNode("nope".into()))
		);
		assert_eq!(g, before);
	}

	#[test]
	fn duplicate_edge_is_rejected() {
		let (mut g, a, b, _) = triangle();
		assert!(matches!(g.add_edge(&a, &b), Err(GraphError::DuplicateEdge(_))));
		assert_eq!(g.edges().len(), 3);
	}

	#[test]
	fn delete_cascades_to_incident_edges_only() {
		let (mut g, a, b, c) = triangle();
		let removed = g.delete_nodes(&ids(&[&b]));
		assert_eq!(removed, Deleted { nodes: 1, edges: 2 });
		assert_eq!(g.edges().len(), 1);
		assert_eq!(g.edges()[0].source, a);
		assert_eq!(g.edges()[0].target, c);
	}

	#[test]
	fn deleting_an_edge_keeps_its_endpoints() {
		let (mut g, a, b, c) = triangle();
		let id = Edge::id_for(&a, &b);
		assert_eq!(g.delete_edges(&ids(&[&id, "e-ghost"])), 1);
		assert_eq!(g.len(), 3);
		assert!(g.contains(&a) && g.contains(&b) && g.contains(&c));
		assert!(g.edges().iter().all(|e| e.id != id));
		assert_eq!(g.edges().len(), 2);
		g.add_edge(&a, &b).unwrap();
	}

	#[test]
	fn update_skips_unmatched_nodes() {
		let (mut g, a, b, _) = triangle();
		let n = g.update_node_attributes(&ids(&[&a, "ghost"]), &AttributePatch::shape(Shape::Circle));
		assert_eq!(n, 1);
		assert_eq!(g.node(&a).unwrap().data.shape, Shape::Circle);
		assert_eq!(g.node(&b).unwrap().data.shape, Shape::Rectangle);
	}

	#[test]
	fn from_parts_rejects_dangling_edges() {
		let (g, ..) = triangle();
		let mut edges = g.edges().to_vec();
		edges[0].target = "ghost".into();
		assert_eq!(
			Graph::from_parts(g.nodes().to_vec(), edges),
			Err(GraphError::UnknownNode("ghost".into()))
		);
	}
}
