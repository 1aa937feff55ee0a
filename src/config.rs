//! Editor tunables.

use crate::components::mind_map::Position;

/// Knobs for the editor surface. Everything has a sensible default; the
/// `MindMap` component accepts an override as a prop.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// Where a new child lands relative to its parent.
	pub child_offset: (f64, f64),
	/// Position used for a node added to an empty graph.
	pub origin: Position,
	/// Factor applied per toolbar zoom click.
	pub zoom_step: f64,
	/// Smallest scale the view can reach.
	pub min_zoom: f64,
	/// Largest scale the view can reach.
	pub max_zoom: f64,
	/// Fraction of the canvas left free around the nodes by fit view.
	pub fit_padding: f64,
	/// Background dot spacing in graph units.
	pub grid_gap: f64,
	/// Download file name without extension.
	pub file_stem: String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			child_offset: (250.0, 0.0),
			origin: Position::new(250.0, 250.0),
			zoom_step: 1.2,
			min_zoom: 0.5,
			max_zoom: 2.0,
			fit_padding: 0.1,
			grid_gap: 20.0,
			file_stem: "mindmap".into(),
		}
	}
}

impl EditorConfig {
	/// Download name for a file with `extension`.
	pub fn file_name(&self, extension: &str) -> String {
		format!("{}.{}", self.file_stem, extension)
	}

	/// `k` limited to `min_zoom..=max_zoom`.
	pub fn clamp_zoom(&self, k: f64) -> f64 {
		k.clamp(self.min_zoom, self.max_zoom)
	}
}
