//! Pure geometry for nodes and edges, shared by the canvas painter, the SVG
//! writer and hit testing. Everything here is in graph coordinates.

use std::f64::consts::SQRT_2;

use super::graph::Graph;
use super::types::{EdgeId, Node, NodeId, Shape, Size};

pub const FONT_SIZE: f64 = 14.0;
pub const LINE_HEIGHT: f64 = 20.0;
pub const PADDING_X: f64 = 16.0;
pub const PADDING_Y: f64 = 8.0;
pub const IMAGE_SIZE: f64 = 80.0;
pub const IMAGE_GAP: f64 = 8.0;
pub const CORNER_RADIUS: f64 = 8.0;
pub const BORDER_WIDTH: f64 = 2.0;
pub const HANDLE_RADIUS: f64 = 6.0;
/// Extra slack around handles so they are easy to grab.
pub const HANDLE_SLOP: f64 = 4.0;
/// How far from its route a click still selects an edge.
pub const EDGE_SLOP: f64 = 6.0;

pub const BORDER_COLOR: &str = "#e5e7eb";
pub const SELECTED_BORDER_COLOR: &str = "#3b82f6";
pub const HANDLE_COLOR: &str = "#3b82f6";
pub const EDGE_COLOR: &str = "#b1b1b7";
pub const BACKGROUND_COLOR: &str = "#ffffff";
pub const GRID_COLOR: &str = "#d4d4d8";

/// A background/text color pair offered by the style panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
	pub label: &'static str,
	pub background: &'static str,
	pub text: &'static str,
}

pub const PALETTE: [Swatch; 6] = [
	Swatch { label: "White", background: "white", text: "black" },
	Swatch { label: "Blue", background: "#93c5fd", text: "black" },
	Swatch { label: "Green", background: "#86efac", text: "black" },
	Swatch { label: "Yellow", background: "#fde047", text: "black" },
	Swatch { label: "Red", background: "#fca5a5", text: "black" },
	Swatch { label: "Purple", background: "#d8b4fe", text: "black" },
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
		Self { x, y, w, h }
	}

	pub fn right(&self) -> f64 {
		self.x + self.w
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.h
	}

	pub fn center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
	}

	pub fn union(&self, other: &Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		Rect::new(
			x,
			y,
			self.right().max(other.right()) - x,
			self.bottom().max(other.bottom()) - y,
		)
	}
}

/// Minimum box for a size class.
pub fn min_box(size: Size) -> (f64, f64) {
	match size {
		Size::Small => (100.0, 40.0),
		Size::Medium => (150.0, 60.0),
		Size::Large => (200.0, 80.0),
	}
}

/// Rough label width for a sans-serif font at [`FONT_SIZE`].
///
/// The canvas could measure exactly, but the SVG writer and hit testing have
/// no context to measure with, and all three must agree.
pub fn estimate_text_width(text: &str) -> f64 {
	text.chars().count() as f64 * FONT_SIZE * 0.55
}

/// Width and height of the content stack (image above label) plus padding.
fn content_size(node: &Node) -> (f64, f64) {
	let text_w = estimate_text_width(&node.data.label);
	let (mut w, mut h) = (text_w, LINE_HEIGHT);
	if node.data.image.is_some() {
		w = w.max(IMAGE_SIZE);
		h += IMAGE_SIZE + IMAGE_GAP;
	}
	(w + 2.0 * PADDING_X, h + 2.0 * PADDING_Y)
}

/// Bounding box of a node, anchored at its position.
pub fn node_rect(node: &Node) -> Rect {
	let (cw, ch) = content_size(node);
	let (min_w, min_h) = min_box(node.data.size);
	let (w, h) = (cw.max(min_w), ch.max(min_h));
	let (w, h) = match node.data.shape {
		Shape::Rectangle => (w, h),
		Shape::Circle => {
			let side = w.max(h);
			(side, side)
		}
		Shape::Diamond => {
			let side = w.max(h) * SQRT_2;
			(side, side)
		}
		Shape::Hexagon => (w * 1.25, h),
	};
	Rect::new(node.position.x, node.position.y, w, h)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outline {
	RoundedRect { rect: Rect, radius: f64 },
	Ellipse { rect: Rect },
	Polygon(Vec<(f64, f64)>),
}

pub fn outline(shape: Shape, rect: Rect) -> Outline {
	let (cx, cy) = rect.center();
	match shape {
		Shape::Rectangle => Outline::RoundedRect {
			rect,
			radius: CORNER_RADIUS,
		},
		Shape::Circle => Outline::Ellipse { rect },
		Shape::Diamond => Outline::Polygon(vec![
			(cx, rect.y),
			(rect.right(), cy),
			(cx, rect.bottom()),
			(rect.x, cy),
		]),
		Shape::Hexagon => {
			let inset = rect.w * 0.25;
			Outline::Polygon(vec![
				(rect.x + inset, rect.y),
				(rect.right() - inset, rect.y),
				(rect.right(), cy),
				(rect.right() - inset, rect.bottom()),
				(rect.x + inset, rect.bottom()),
				(rect.x, cy),
			])
		}
	}
}

/// Where the image thumbnail and the label go inside a node box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Content {
	pub image: Option<Rect>,
	/// Center of the label line.
	pub label: (f64, f64),
}

pub fn content(node: &Node, rect: Rect) -> Content {
	let (cx, cy) = rect.center();
	if node.data.image.is_none() {
		return Content {
			image: None,
			label: (cx, cy),
		};
	}
	let stack = IMAGE_SIZE + IMAGE_GAP + LINE_HEIGHT;
	let top = cy - stack / 2.0;
	Content {
		image: Some(Rect::new(cx - IMAGE_SIZE / 2.0, top, IMAGE_SIZE, IMAGE_SIZE)),
		label: (cx, top + IMAGE_SIZE + IMAGE_GAP + LINE_HEIGHT / 2.0),
	}
}

/// Incoming connections attach on the left edge.
pub fn target_handle(rect: Rect) -> (f64, f64) {
	(rect.x, rect.y + rect.h / 2.0)
}

/// Outgoing connections leave from the right edge.
pub fn source_handle(rect: Rect) -> (f64, f64) {
	(rect.right(), rect.y + rect.h / 2.0)
}

/// Orthogonal "smooth step" route between two handles.
pub fn edge_route(from: (f64, f64), to: (f64, f64)) -> Vec<(f64, f64)> {
	const STUB: f64 = 20.0;
	let ((sx, sy), (tx, ty)) = (from, to);
	if tx >= sx + 2.0 * STUB {
		let mid = (sx + tx) / 2.0;
		vec![(sx, sy), (mid, sy), (mid, ty), (tx, ty)]
	} else {
		let mid = (sy + ty) / 2.0;
		vec![
			(sx, sy),
			(sx + STUB, sy),
			(sx + STUB, mid),
			(tx - STUB, mid),
			(tx - STUB, ty),
			(tx, ty),
		]
	}
}

/// Route for an edge between two laid-out nodes.
pub fn edge_points(source: &Node, target: &Node) -> Vec<(f64, f64)> {
	edge_route(
		source_handle(node_rect(source)),
		target_handle(node_rect(target)),
	)
}

/// What sits under a point on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	SourceHandle(NodeId),
	TargetHandle(NodeId),
	Node(NodeId),
}

impl Hit {
	pub fn node_id(&self) -> &NodeId {
		match self {
			Hit::SourceHandle(id) | Hit::TargetHandle(id) | Hit::Node(id) => id,
		}
	}
}

fn near(p: (f64, f64), x: f64, y: f64, r: f64) -> bool {
	let (dx, dy) = (p.0 - x, p.1 - y);
	dx * dx + dy * dy <= r * r
}

/// Topmost hit at `(x, y)`; nodes painted later win.
pub fn hit_test(graph: &Graph, x: f64, y: f64) -> Option<Hit> {
	let reach = HANDLE_RADIUS + HANDLE_SLOP;
	graph.nodes().iter().rev().find_map(|node| {
		let rect = node_rect(node);
		if near(source_handle(rect), x, y, reach) {
			Some(Hit::SourceHandle(node.id.clone()))
		} else if near(target_handle(rect), x, y, reach) {
			Some(Hit::TargetHandle(node.id.clone()))
		} else if rect.contains(x, y) {
			Some(Hit::Node(node.id.clone()))
		} else {
			None
		}
	})
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 == 0.0 {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Topmost edge whose route passes within [`EDGE_SLOP`] of `(x, y)`.
///
/// Nodes sit above edges, so callers try [`hit_test`] first.
pub fn edge_hit(graph: &Graph, x: f64, y: f64) -> Option<EdgeId> {
	graph.edges().iter().rev().find_map(|edge| {
		let source = graph.node(&edge.source)?;
		let target = graph.node(&edge.target)?;
		edge_points(source, target)
			.windows(2)
			.any(|seg| segment_distance((x, y), seg[0], seg[1]) <= EDGE_SLOP)
			.then(|| edge.id.clone())
	})
}

/// Union of all node boxes.
pub fn graph_bounds(graph: &Graph) -> Option<Rect> {
	graph
		.nodes()
		.iter()
		.map(node_rect)
		.reduce(|acc, r| acc.union(&r))
}
