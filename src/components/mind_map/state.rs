use std::collections::HashSet;

use log::{debug, warn};

use super::graph::Graph;
use super::layout::{self, Rect};
use super::types::{AttributePatch, EdgeId, Node, NodeAttributes, NodeId, Position};
use crate::config::EditorConfig;
use crate::error::GraphError;

pub const ROOT_ID: &str = "1";
pub const ROOT_LABEL: &str = "Main Topic";
pub const CHILD_LABEL: &str = "New Topic";

/// Graph-to-screen transform: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scale by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, config: &EditorConfig) {
		let new_k = config.clamp_zoom(self.k * factor);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Transform that centers `bounds` in a `width` x `height` canvas.
	pub fn fit(bounds: Rect, width: f64, height: f64, config: &EditorConfig) -> Self {
		let pad = 1.0 + 2.0 * config.fit_padding;
		let k = (width / (bounds.w * pad))
			.min(height / (bounds.h * pad))
			.max(f64::MIN_POSITIVE);
		let k = config.clamp_zoom(k);
		let (cx, cy) = bounds.center();
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

/// One editor transition. Everything that changes [`EditorState`] goes
/// through [`EditorState::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	/// Replace the selection with the full list from the canvas.
	Select(Vec<NodeId>),
	/// Shift-click: add or remove one node from the selection.
	ToggleSelected(NodeId),
	/// Select edges alone; node selection is dropped.
	SelectEdges(Vec<EdgeId>),
	/// Add a topic to the right of the first selected node, or of the first node.
	AddChild,
	/// Remove the selected nodes and their edges.
	DeleteSelected,
	/// Remove the selected edges and keep their nodes.
	DeleteSelectedEdges,
	/// Open or close the style panel; needs a selection.
	ToggleStylePanel,
	/// Patch every selected node.
	UpdateSelected(AttributePatch),
	/// Patch nodes captured earlier, e.g. when an async image read finishes.
	UpdateNodes {
		/// Nodes to patch; missing ones are skipped.
		ids: Vec<NodeId>,
		/// Fields to overwrite.
		patch: AttributePatch,
	},
	/// Store the text typed into the inline editor.
	CommitLabel {
		/// Edited node.
		id: NodeId,
		/// New label.
		label: String,
	},
	/// Drop a dragged node at its new place.
	MoveNode {
		/// Dragged node.
		id: NodeId,
		/// New top-left corner.
		position: Position,
	},
	/// Link two nodes dragged together on the canvas.
	Connect {
		/// Node the edge leaves from.
		source: NodeId,
		/// Node the edge points at.
		target: NodeId,
	},
	/// Toolbar zoom in around the canvas center.
	ZoomIn,
	/// Toolbar zoom out around the canvas center.
	ZoomOut,
	/// Wheel zoom around a screen point.
	ZoomAt {
		/// Screen x of the anchor.
		x: f64,
		/// Screen y of the anchor.
		y: f64,
		/// Scale multiplier.
		factor: f64,
	},
	/// Set the pan offset.
	PanTo {
		/// Screen x of the graph origin.
		x: f64,
		/// Screen y of the graph origin.
		y: f64,
	},
	/// Scale and center the view around every node.
	FitView,
	/// The canvas changed size.
	Resize {
		/// Canvas width in pixels.
		width: f64,
		/// Canvas height in pixels.
		height: f64,
	},
}

impl Action {
	/// Short name for logs.
	pub fn name(&self) -> &'static str {
		match self {
			Action::Select(_) => "select",
			Action::ToggleSelected(_) => "toggle-selected",
			Action::SelectEdges(_) => "select-edges",
			Action::AddChild => "add-child",
			Action::DeleteSelected => "delete-selected",
			Action::DeleteSelectedEdges => "delete-selected-edges",
			Action::ToggleStylePanel => "toggle-style-panel",
			Action::UpdateSelected(_) => "update-selected",
			Action::UpdateNodes { .. } => "update-nodes",
			Action::CommitLabel { .. } => "commit-label",
			Action::MoveNode { .. } => "move-node",
			Action::Connect { .. } => "connect",
			Action::ZoomIn => "zoom-in",
			Action::ZoomOut => "zoom-out",
			Action::ZoomAt { .. } => "zoom-at",
			Action::PanTo { .. } => "pan",
			Action::FitView => "fit-view",
			Action::Resize { .. } => "resize",
		}
	}
}

/// The editor surface's single source of truth.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
	/// The document.
	pub graph: Graph,
	/// Selected nodes in selection order.
	pub selection: Vec<NodeId>,
	/// Selected edges; empty whenever nodes are selected by a plain click.
	pub selected_edges: Vec<EdgeId>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Tunables the editor was created with.
	pub config: EditorConfig,
	style_panel_open: bool,
}

impl EditorState {
	/// A fresh document holding only the root topic.
	pub fn new(config: EditorConfig) -> Self {
		let mut graph = Graph::new();
		let root = Node {
			id: ROOT_ID.into(),
			position: config.origin,
			data: NodeAttributes::with_label(ROOT_LABEL),
		};
		if let Err(err) = graph.insert_node(root) {
			warn!("root node rejected: {err}");
		}
		Self::with_graph(graph, config)
	}

	/// Editor over an existing graph, nothing selected.
	pub fn with_graph(graph: Graph, config: EditorConfig) -> Self {
		Self {
			graph,
			selection: Vec::new(),
			selected_edges: Vec::new(),
			transform: ViewTransform::default(),
			width: 800.0,
			height: 600.0,
			config,
			style_panel_open: false,
		}
	}

	/// The panel only shows while something is selected.
	pub fn style_panel_open(&self) -> bool {
		self.style_panel_open && !self.selection.is_empty()
	}

	/// True when at least one node is selected.
	pub fn has_selection(&self) -> bool {
		!self.selection.is_empty()
	}

	/// Whether node `id` is selected.
	pub fn is_selected(&self, id: &str) -> bool {
		self.selection.iter().any(|s| s == id)
	}

	/// Whether edge `id` is selected.
	pub fn is_edge_selected(&self, id: &str) -> bool {
		self.selected_edges.iter().any(|s| s == id)
	}

	/// The node the style panel shows.
	pub fn first_selected(&self) -> Option<&Node> {
		self.selection.first().and_then(|id| self.graph.node(id))
	}

	fn selection_set(&self) -> HashSet<NodeId> {
		self.selection.iter().cloned().collect()
	}

	fn set_selection(&mut self, ids: Vec<NodeId>) {
		let mut seen = HashSet::new();
		self.selection = ids
			.into_iter()
			.filter(|id| self.graph.contains(id) && seen.insert(id.clone()))
			.collect();
		if self.selection.is_empty() {
			self.style_panel_open = false;
		}
	}

	fn set_edge_selection(&mut self, ids: Vec<EdgeId>) {
		let mut seen = HashSet::new();
		self.selected_edges = ids
			.into_iter()
			.filter(|id| self.graph.edges().iter().any(|e| e.id == *id) && seen.insert(id.clone()))
			.collect();
	}

	/// Parent for a new child: first selected node, else the first node.
	fn reference_node(&self) -> Option<&Node> {
		self.first_selected().or_else(|| self.graph.nodes().first())
	}

	fn add_child(&mut self) -> Result<NodeId, GraphError> {
		let (dx, dy) = self.config.child_offset;
		let parent = self
			.reference_node()
			.map(|n| (n.id.clone(), n.position.offset(dx, dy)));
		let data = NodeAttributes::with_label(CHILD_LABEL);
		match parent {
			Some((parent_id, position)) => {
				let id = self.graph.add_node(data, position);
				self.graph.add_edge(&parent_id, &id)?;
				Ok(id)
			}
			None => Ok(self.graph.add_node(data, self.config.origin)),
		}
	}

	fn delete_selected(&mut self) {
		if self.selection.is_empty() {
			return;
		}
		let removed = self.graph.delete_nodes(&self.selection_set());
		debug!(
			"deleted {} node(s) and {} edge(s)",
			removed.nodes, removed.edges
		);
		self.selection.clear();
		self.style_panel_open = false;
		let remaining = std::mem::take(&mut self.selected_edges);
		self.set_edge_selection(remaining);
	}

	fn delete_selected_edges(&mut self) {
		if self.selected_edges.is_empty() {
			return;
		}
		let ids: HashSet<EdgeId> = self.selected_edges.drain(..).collect();
		let removed = self.graph.delete_edges(&ids);
		debug!("deleted {removed} edge(s)");
	}

	/// Apply one transition. Errors leave the state untouched.
	pub fn apply(&mut self, action: Action) -> Result<(), GraphError> {
		if !matches!(action, Action::MoveNode { .. } | Action::PanTo { .. }) {
			debug!("apply {}", action.name());
		}
		match action {
			Action::Select(ids) => {
				self.selected_edges.clear();
				self.set_selection(ids);
			}
			Action::SelectEdges(ids) => {
				self.set_selection(Vec::new());
				self.set_edge_selection(ids);
			}
			Action::ToggleSelected(id) => {
				let mut ids = self.selection.clone();
				if let Some(pos) = ids.iter().position(|s| *s == id) {
					ids.remove(pos);
				} else {
					ids.push(id);
				}
				self.set_selection(ids);
			}
			Action::AddChild => {
				self.add_child()?;
			}
			Action::DeleteSelected => self.delete_selected(),
			Action::DeleteSelectedEdges => self.delete_selected_edges(),
			Action::ToggleStylePanel => {
				if self.has_selection() {
					self.style_panel_open = !self.style_panel_open;
				}
			}
			Action::UpdateSelected(patch) => {
				let ids = self.selection_set();
				self.graph.update_node_attributes(&ids, &patch);
			}
			Action::UpdateNodes { ids, patch } => {
				let ids = ids.into_iter().collect();
				self.graph.update_node_attributes(&ids, &patch);
			}
			Action::CommitLabel { id, label } => {
				self.graph.set_label(&id, &label);
			}
			Action::MoveNode { id, position } => {
				self.graph.move_node(&id, position);
			}
			Action::Connect { source, target } => {
				self.graph.add_edge(&source, &target)?;
			}
			Action::ZoomIn => self.zoom_centered(self.config.zoom_step),
			Action::ZoomOut => self.zoom_centered(1.0 / self.config.zoom_step),
			Action::ZoomAt { x, y, factor } => self.transform.zoom_at(x, y, factor, &self.config),
			Action::PanTo { x, y } => {
				self.transform.x = x;
				self.transform.y = y;
			}
			Action::FitView => self.fit_view(),
			Action::Resize { width, height } => {
				self.width = width;
				self.height = height;
			}
		}
		Ok(())
	}

	fn zoom_centered(&mut self, factor: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.transform.zoom_at(cx, cy, factor, &self.config);
	}

	fn fit_view(&mut self) {
		if let Some(bounds) = layout::graph_bounds(&self.graph) {
			self.transform = ViewTransform::fit(bounds, self.width, self.height, &self.config);
		}
	}
}

impl Default for EditorState {
	fn default() -> Self {
		Self::new(EditorConfig::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::types::Shape;

	#[test]
	fn starts_with_root_topic() {
		let s = EditorState::default();
		assert_eq!(s.graph.len(), 1);
		let root = s.graph.node(ROOT_ID).unwrap();
		assert_eq!(root.data.label, ROOT_LABEL);
		assert_eq!(root.position, Position::new(250.0, 250.0));
	}

	#[test]
	fn child_is_offset_from_selected_parent() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		let child = s.graph.nodes()[1].id.clone();
		s.apply(Action::Select(vec![child.clone()])).unwrap();
		s.apply(Action::AddChild).unwrap();
		let grandchild = &s.graph.nodes()[2];
		assert_eq!(grandchild.position, Position::new(750.0, 250.0));
		assert_eq!(grandchild.data.label, CHILD_LABEL);
		assert_eq!(s.graph.edges()[1].source, child);
	}

	#[test]
	fn add_child_to_empty_graph_uses_origin() {
		let mut s = EditorState::with_graph(Graph::new(), EditorConfig::default());
		s.apply(Action::AddChild).unwrap();
		assert_eq!(s.graph.len(), 1);
		assert!(s.graph.edges().is_empty());
	}

	#[test]
	fn toggle_panel_needs_selection() {
		let mut s = EditorState::default();
		s.apply(Action::ToggleStylePanel).unwrap();
		assert!(!s.style_panel_open());
		s.apply(Action::Select(vec![ROOT_ID.into()])).unwrap();
		s.apply(Action::ToggleStylePanel).unwrap();
		assert!(s.style_panel_open());
		s.apply(Action::Select(vec![])).unwrap();
		assert!(!s.style_panel_open());
		s.apply(Action::Select(vec![ROOT_ID.into()])).unwrap();
		assert!(!s.style_panel_open());
	}

	#[test]
	fn selection_drops_unknown_and_duplicate_ids() {
		let mut s = EditorState::default();
		s.apply(Action::Select(vec!["1".into(), "ghost".into(), "1".into()]))
			.unwrap();
		assert_eq!(s.selection, vec!["1".to_string()]);
	}

	#[test]
	fn shift_click_toggles_membership() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		let child = s.graph.nodes()[1].id.clone();
		s.apply(Action::ToggleSelected(ROOT_ID.into())).unwrap();
		s.apply(Action::ToggleSelected(child.clone())).unwrap();
		assert_eq!(s.selection.len(), 2);
		s.apply(Action::ToggleSelected(ROOT_ID.into())).unwrap();
		assert_eq!(s.selection, vec![child]);
	}

	#[test]
	fn delete_clears_selection_and_panel() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		s.apply(Action::Select(vec![ROOT_ID.into()])).unwrap();
		s.apply(Action::ToggleStylePanel).unwrap();
		s.apply(Action::DeleteSelected).unwrap();
		assert!(s.selection.is_empty());
		assert!(!s.style_panel_open());
		assert_eq!(s.graph.len(), 1);
		assert!(s.graph.edges().is_empty());
	}

	#[test]
	fn selected_edge_is_removed_without_its_nodes() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		let edge = s.graph.edges()[0].id.clone();
		s.apply(Action::Select(vec![ROOT_ID.into()])).unwrap();
		s.apply(Action::SelectEdges(vec![edge.clone(), "e-ghost".into()]))
			.unwrap();
		assert!(s.selection.is_empty());
		assert_eq!(s.selected_edges, vec![edge]);

		s.apply(Action::DeleteSelected).unwrap();
		assert_eq!(s.graph.edges().len(), 1);
		s.apply(Action::DeleteSelectedEdges).unwrap();
		assert!(s.graph.edges().is_empty());
		assert_eq!(s.graph.len(), 2);
		assert!(s.selected_edges.is_empty());
	}

	#[test]
	fn node_selection_replaces_edge_selection() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		let edge = s.graph.edges()[0].id.clone();
		s.apply(Action::SelectEdges(vec![edge])).unwrap();
		s.apply(Action::Select(vec![ROOT_ID.into()])).unwrap();
		assert!(s.selected_edges.is_empty());
	}

	#[test]
	fn deleting_a_node_forgets_its_selected_edges() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		let edge = s.graph.edges()[0].id.clone();
		s.apply(Action::SelectEdges(vec![edge])).unwrap();
		s.apply(Action::ToggleSelected(ROOT_ID.into())).unwrap();
		s.apply(Action::DeleteSelected).unwrap();
		assert!(s.selected_edges.is_empty());
	}

	#[test]
	fn delete_with_empty_selection_is_noop() {
		let mut s = EditorState::default();
		let before = s.clone();
		s.apply(Action::DeleteSelected).unwrap();
		assert_eq!(s, before);
	}

	#[test]
	fn late_update_for_deleted_node_is_ignored() {
		let mut s = EditorState::default();
		s.apply(Action::UpdateNodes {
			ids: vec!["gone".into()],
			patch: AttributePatch::shape(Shape::Circle),
		})
		.unwrap();
		assert_eq!(s.graph.node(ROOT_ID).unwrap().data.shape, Shape::Rectangle);
	}

	#[test]
	fn rejected_connect_leaves_state_untouched() {
		let mut s = EditorState::default();
		let before = s.clone();
		let err = s.apply(Action::Connect {
			source: ROOT_ID.into(),
			target: "ghost".into(),
		});
		assert!(err.is_err());
		assert_eq!(s, before);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut s = EditorState::default();
		for _ in 0..20 {
			s.apply(Action::ZoomIn).unwrap();
		}
		assert_eq!(s.transform.k, s.config.max_zoom);
		for _ in 0..40 {
			s.apply(Action::ZoomOut).unwrap();
		}
		assert_eq!(s.transform.k, s.config.min_zoom);
	}

	#[test]
	fn zoom_keeps_anchor_point_fixed() {
		let mut s = EditorState::default();
		let before = s.transform.screen_to_graph(300.0, 200.0);
		s.apply(Action::ZoomAt {
			x: 300.0,
			y: 200.0,
			factor: 1.1,
		})
		.unwrap();
		let after = s.transform.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn fit_view_centers_bounds() {
		let mut s = EditorState::default();
		s.apply(Action::Resize {
			width: 1000.0,
			height: 800.0,
		})
		.unwrap();
		s.apply(Action::FitView).unwrap();
		let bounds = layout::graph_bounds(&s.graph).unwrap();
		let (cx, cy) = bounds.center();
		let (sx, sy) = s.transform.graph_to_screen(cx, cy);
		assert!((sx - 500.0).abs() < 1e-9);
		assert!((sy - 400.0).abs() < 1e-9);
		assert!(s.transform.k <= s.config.max_zoom);
	}
}
