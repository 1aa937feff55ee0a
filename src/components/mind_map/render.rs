use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::layout::{self, Outline, Rect};
use super::state::EditorState;
use super::types::Node;

/// Decoded node images keyed by data URI.
///
/// Elements start loading on first use; `on_load` fires once they can be
/// drawn so the caller can schedule another frame.
#[derive(Default)]
pub struct ImageCache {
	images: RefCell<HashMap<String, HtmlImageElement>>,
}

impl ImageCache {
	fn get(&self, uri: &str, on_load: Option<&js_sys::Function>) -> Option<HtmlImageElement> {
		let mut images = self.images.borrow_mut();
		if let Some(img) = images.get(uri) {
			return img.complete().then(|| img.clone());
		}
		let img = HtmlImageElement::new().ok()?;
		img.set_onload(on_load);
		img.set_src(uri);
		images.insert(uri.to_string(), img.clone());
		img.complete().then_some(img)
	}

	fn retain_used(&self, used: &HashSet<&str>) {
		self.images
			.borrow_mut()
			.retain(|uri, _| used.contains(uri.as_str()));
	}
}

/// Transient pointer state that is painted but never stored in the graph.
#[derive(Clone, Debug, Default)]
pub struct Overlay {
	/// Rubber band from a source handle to the cursor, in graph coordinates.
	pub connection: Option<((f64, f64), (f64, f64))>,
	/// Node whose label is covered by the inline editor.
	pub editing: Option<String>,
}

pub fn render(
	state: &EditorState,
	overlay: &Overlay,
	images: &ImageCache,
	on_image_load: Option<&js_sys::Function>,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(layout::BACKGROUND_COLOR);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	for node in state.graph.nodes() {
		let editing = overlay.editing.as_deref() == Some(node.id.as_str());
		draw_node(
			node,
			state.is_selected(&node.id),
			editing,
			images,
			on_image_load,
			ctx,
		);
	}
	if let Some((from, to)) = overlay.connection {
		draw_connection_line(from, to, state.transform.k, ctx);
	}
	ctx.restore();

	let used: HashSet<&str> = state
		.graph
		.nodes()
		.iter()
		.filter_map(|n| n.data.image.as_deref())
		.collect();
	images.retain_used(&used);
}

fn draw_grid(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	let t = &state.transform;
	let gap = state.config.grid_gap * t.k;
	if gap < 4.0 {
		return;
	}
	let (start_x, start_y) = (t.x.rem_euclid(gap), t.y.rem_euclid(gap));
	let r = (t.k * 0.5).max(0.5);
	ctx.set_fill_style_str(layout::GRID_COLOR);
	let mut y = start_y;
	while y < state.height {
		let mut x = start_x;
		while x < state.width {
			ctx.fill_rect(x - r, y - r, 2.0 * r, 2.0 * r);
			x += gap;
		}
		y += gap;
	}
}

fn draw_edges(state: &EditorState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for edge in state.graph.edges() {
		let (Some(source), Some(target)) =
			(state.graph.node(&edge.source), state.graph.node(&edge.target))
		else {
			continue;
		};
		let (color, width) = if state.is_edge_selected(&edge.id) {
			(layout::SELECTED_BORDER_COLOR, 2.5)
		} else {
			(layout::EDGE_COLOR, 1.5)
		};
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(width);
		let points = layout::edge_points(source, target);
		trace_polyline(&points, ctx);
		ctx.stroke();
		if let [.., before, tip] = points.as_slice() {
			draw_arrow(*before, *tip, 8.0 / k.max(0.5), ctx);
		}
	}
}

fn draw_connection_line(
	from: (f64, f64),
	to: (f64, f64),
	k: f64,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_stroke_style_str(layout::HANDLE_COLOR);
	ctx.set_line_width(1.5 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&(5.0 / k).into(),
		&(5.0 / k).into(),
	));
	ctx.begin_path();
	ctx.move_to(from.0, from.1);
	ctx.line_to(to.0, to.1);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn trace_polyline(points: &[(f64, f64)], ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	if let Some((first, rest)) = points.split_first() {
		ctx.move_to(first.0, first.1);
		for p in rest {
			ctx.line_to(p.0, p.1);
		}
	}
}

fn draw_arrow(from: (f64, f64), tip: (f64, f64), size: f64, ctx: &CanvasRenderingContext2d) {
	let (dx, dy) = (tip.0 - from.0, tip.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (back_x, back_y) = (tip.0 - ux * size, tip.1 - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn trace_outline(outline: &Outline, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	match outline {
		Outline::RoundedRect { rect, radius } => {
			let r = radius.min(rect.w / 2.0).min(rect.h / 2.0);
			ctx.move_to(rect.x + r, rect.y);
			let _ = ctx.arc_to(rect.right(), rect.y, rect.right(), rect.bottom(), r);
			let _ = ctx.arc_to(rect.right(), rect.bottom(), rect.x, rect.bottom(), r);
			let _ = ctx.arc_to(rect.x, rect.bottom(), rect.x, rect.y, r);
			let _ = ctx.arc_to(rect.x, rect.y, rect.right(), rect.y, r);
		}
		Outline::Ellipse { rect } => {
			let (cx, cy) = rect.center();
			let _ = ctx.ellipse(cx, cy, rect.w / 2.0, rect.h / 2.0, 0.0, 0.0, 2.0 * PI);
		}
		Outline::Polygon(points) => {
			if let Some((first, rest)) = points.split_first() {
				ctx.move_to(first.0, first.1);
				for p in rest {
					ctx.line_to(p.0, p.1);
				}
			}
		}
	}
	ctx.close_path();
}

fn draw_node(
	node: &Node,
	selected: bool,
	editing: bool,
	images: &ImageCache,
	on_image_load: Option<&js_sys::Function>,
	ctx: &CanvasRenderingContext2d,
) {
	let rect = layout::node_rect(node);
	let outline = layout::outline(node.data.shape, rect);

	ctx.save();
	ctx.set_shadow_color("rgba(0, 0, 0, 0.15)");
	ctx.set_shadow_blur(12.0);
	ctx.set_shadow_offset_y(4.0);
	trace_outline(&outline, ctx);
	ctx.set_fill_style_str(&node.data.background_color);
	ctx.fill();
	ctx.restore();

	ctx.set_line_width(layout::BORDER_WIDTH);
	ctx.set_stroke_style_str(if selected {
		layout::SELECTED_BORDER_COLOR
	} else {
		layout::BORDER_COLOR
	});
	trace_outline(&outline, ctx);
	ctx.stroke();

	let content = layout::content(node, rect);
	if let (Some(uri), Some(target)) = (node.data.image.as_deref(), content.image) {
		if let Some(img) = images.get(uri, on_image_load) {
			draw_cover_image(&img, target, ctx);
		}
	}

	if !editing {
		ctx.set_fill_style_str(&node.data.text_color);
		ctx.set_font(&format!("500 {}px sans-serif", layout::FONT_SIZE));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&node.data.label, content.label.0, content.label.1);
	}

	ctx.set_fill_style_str(layout::HANDLE_COLOR);
	for (hx, hy) in [layout::target_handle(rect), layout::source_handle(rect)] {
		ctx.begin_path();
		let _ = ctx.arc(hx, hy, layout::HANDLE_RADIUS, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

/// Draw `img` center-cropped to fill `target`, with rounded corners.
fn draw_cover_image(img: &HtmlImageElement, target: Rect, ctx: &CanvasRenderingContext2d) {
	let (nw, nh) = (img.natural_width() as f64, img.natural_height() as f64);
	if nw <= 0.0 || nh <= 0.0 {
		return;
	}
	let side = nw.min(nh);
	let (sx, sy) = ((nw - side) / 2.0, (nh - side) / 2.0);
	ctx.save();
	trace_outline(
		&Outline::RoundedRect {
			rect: target,
			radius: 4.0,
		},
		ctx,
	);
	ctx.clip();
	let _ = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
		img, sx, sy, side, side, target.x, target.y, target.w, target.h,
	);
	ctx.restore();
}
