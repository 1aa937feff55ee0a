//! SVG snapshot of the visible viewport.

use std::fmt::Write as _;

use crate::components::mind_map::layout::{self, Outline};
use crate::components::mind_map::{EditorState, Node};

/// Render the current view as a standalone SVG document the size of the canvas.
pub fn render_svg(state: &EditorState) -> String {
	let (w, h) = (state.width.max(1.0), state.height.max(1.0));
	let t = &state.transform;
	let mut out = String::new();
	let _ = write!(
		out,
		r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
	);
	let _ = write!(
		out,
		r#"<rect width="{w}" height="{h}" fill="{}"/>"#,
		layout::BACKGROUND_COLOR
	);
	let _ = write!(
		out,
		r#"<g transform="translate({} {}) scale({})">"#,
		t.x, t.y, t.k
	);

	for edge in state.graph.edges() {
		let (Some(source), Some(target)) =
			(state.graph.node(&edge.source), state.graph.node(&edge.target))
		else {
			continue;
		};
		let points = layout::edge_points(source, target);
		let _ = write!(
			out,
			r#"<path class="edge" data-id="{}" d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
			escape_xml(&edge.id),
			path_data(&points, false),
			layout::EDGE_COLOR
		);
	}

	for node in state.graph.nodes() {
		write_node(&mut out, node, state.is_selected(&node.id));
	}

	out.push_str("</g></svg>");
	out
}

fn write_node(out: &mut String, node: &Node, selected: bool) {
	let rect = layout::node_rect(node);
	let stroke = if selected {
		layout::SELECTED_BORDER_COLOR
	} else {
		layout::BORDER_COLOR
	};
	let paint = format!(
		r#"fill="{}" stroke="{}" stroke-width="{}""#,
		escape_xml(&node.data.background_color),
		stroke,
		layout::BORDER_WIDTH
	);

	let _ = write!(out, r#"<g class="node" data-id="{}">"#, escape_xml(&node.id));
	match layout::outline(node.data.shape, rect) {
		Outline::RoundedRect { rect, radius } => {
			let _ = write!(
				out,
				r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" {paint}/>"#,
				rect.x, rect.y, rect.w, rect.h
			);
		}
		Outline::Ellipse { rect } => {
			let (cx, cy) = rect.center();
			let _ = write!(
				out,
				r#"<ellipse cx="{cx}" cy="{cy}" rx="{}" ry="{}" {paint}/>"#,
				rect.w / 2.0,
				rect.h / 2.0
			);
		}
		Outline::Polygon(points) => {
			let _ = write!(out, r#"<path d="{}" {paint}/>"#, path_data(&points, true));
		}
	}

	let content = layout::content(node, rect);
	if let (Some(uri), Some(img)) = (node.data.image.as_deref(), content.image) {
		let _ = write!(
			out,
			r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" xlink:href="{}"/>"#,
			img.x,
			img.y,
			img.w,
			img.h,
			escape_xml(uri)
		);
	}
	let _ = write!(
		out,
		r#"<text x="{}" y="{}" fill="{}" font-family="sans-serif" font-size="{}" font-weight="500" text-anchor="middle" dominant-baseline="central">{}</text>"#,
		content.label.0,
		content.label.1,
		escape_xml(&node.data.text_color),
		layout::FONT_SIZE,
		escape_xml(&node.data.label)
	);
	out.push_str("</g>");
}

fn path_data(points: &[(f64, f64)], close: bool) -> String {
	let mut d = String::new();
	for (i, (x, y)) in points.iter().enumerate() {
		let _ = write!(d, "{}{x} {y}", if i == 0 { "M" } else { " L" });
	}
	if close {
		d.push_str(" Z");
	}
	d
}

fn escape_xml(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for ch in s.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::{Action, AttributePatch, Shape};

	#[test]
	fn one_path_per_edge_and_group_per_node() {
		let mut s = EditorState::default();
		s.apply(Action::AddChild).unwrap();
		s.apply(Action::AddChild).unwrap();
		let svg = render_svg(&s);
		assert_eq!(svg.matches(r#"class="edge""#).count(), 2);
		assert_eq!(svg.matches(r#"class="node""#).count(), 3);
		assert!(svg.ends_with("</g></svg>"));
	}

	#[test]
	fn labels_are_escaped() {
		let mut s = EditorState::default();
		s.apply(Action::CommitLabel {
			id: "1".into(),
			label: "<b>R&D</b>".into(),
		})
		.unwrap();
		let svg = render_svg(&s);
		assert!(svg.contains("&lt;b&gt;R&amp;D&lt;/b&gt;"));
		assert!(!svg.contains("<b>"));
	}

	#[test]
	fn shapes_map_to_svg_elements() {
		let mut s = EditorState::default();
		s.apply(Action::Select(vec!["1".into()])).unwrap();
		s.apply(Action::UpdateSelected(AttributePatch::shape(Shape::Circle)))
			.unwrap();
		assert!(render_svg(&s).contains("<ellipse"));
		s.apply(Action::UpdateSelected(AttributePatch::shape(Shape::Diamond)))
			.unwrap();
		let svg = render_svg(&s);
		assert!(svg.contains(r#"<path d="M"#));
		assert!(svg.contains(layout::SELECTED_BORDER_COLOR));
	}

	#[test]
	fn viewport_transform_is_carried() {
		let mut s = EditorState::default();
		s.apply(Action::PanTo { x: 12.0, y: -4.0 }).unwrap();
		assert!(render_svg(&s).contains(r#"<g transform="translate(12 -4) scale(1)">"#));
	}
}
