use serde::{Deserialize, Serialize};

/// Node identifier, unique within a graph.
pub type NodeId = String;
/// Edge identifier, `e{source}-{target}`.
pub type EdgeId = String;

/// Top-left corner of a node in graph coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
}

impl Position {
	/// Position at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// This position moved by `(dx, dy)`.
	pub fn offset(self, dx: f64, dy: f64) -> Self {
		Self::new(self.x + dx, self.y + dy)
	}
}

/// Node outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
	/// Rounded rectangle.
	#[default]
	Rectangle,
	/// Circle sized to fit the content.
	Circle,
	/// Square rotated by 45 degrees.
	Diamond,
	/// Flat-topped hexagon.
	Hexagon,
}

impl Shape {
	/// Every shape, in the order the style panel lists them.
	pub const ALL: [Shape; 4] = [Shape::Rectangle, Shape::Circle, Shape::Diamond, Shape::Hexagon];

	/// Human-readable name.
	pub fn label(self) -> &'static str {
		match self {
			Shape::Rectangle => "Rectangle",
			Shape::Circle => "Circle",
			Shape::Diamond => "Diamond",
			Shape::Hexagon => "Hexagon",
		}
	}
}

/// Size class; each sets a minimum box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
	/// 100 x 40 minimum.
	Small,
	/// 150 x 60 minimum.
	#[default]
	Medium,
	/// 200 x 80 minimum.
	Large,
}

impl Size {
	/// Every size, smallest first.
	pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

	/// Human-readable name.
	pub fn label(self) -> &'static str {
		match self {
			Size::Small => "Small",
			Size::Medium => "Medium",
			Size::Large => "Large",
		}
	}
}

/// Everything that decides how a node looks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
	/// Text shown in the node.
	pub label: String,
	/// Outline drawn around the content.
	#[serde(default)]
	pub shape: Shape,
	/// Minimum box class.
	#[serde(default)]
	pub size: Size,
	/// Any CSS color.
	#[serde(default = "default_background")]
	pub background_color: String,
	/// Any CSS color.
	#[serde(default = "default_text")]
	pub text_color: String,
	/// `data:<mime>;base64,...` only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

fn default_background() -> String {
	"white".into()
}

fn default_text() -> String {
	"black".into()
}

impl NodeAttributes {
	/// Default attributes carrying `label`.
	pub fn with_label(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			..Self::default()
		}
	}

	/// Shallow merge: named fields are overwritten, the rest is copied over.
	pub fn merged(&self, patch: &AttributePatch) -> Self {
		Self {
			label: patch.label.clone().unwrap_or_else(|| self.label.clone()),
			shape: patch.shape.unwrap_or(self.shape),
			size: patch.size.unwrap_or(self.size),
			background_color: patch
				.background_color
				.clone()
				.unwrap_or_else(|| self.background_color.clone()),
			text_color: patch
				.text_color
				.clone()
				.unwrap_or_else(|| self.text_color.clone()),
			image: match &patch.image {
				Some(image) => image.clone(),
				None => self.image.clone(),
			},
		}
	}
}

impl Default for NodeAttributes {
	fn default() -> Self {
		Self {
			label: String::new(),
			shape: Shape::default(),
			size: Size::default(),
			background_color: default_background(),
			text_color: default_text(),
			image: None,
		}
	}
}

/// Partial [`NodeAttributes`]; `None` leaves a field alone.
///
/// `image` is tri-state: `None` keeps it, `Some(None)` clears it and
/// `Some(Some(uri))` replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributePatch {
	/// New label.
	pub label: Option<String>,
	/// New shape.
	pub shape: Option<Shape>,
	/// New size class.
	pub size: Option<Size>,
	/// New background color.
	pub background_color: Option<String>,
	/// New text color.
	pub text_color: Option<String>,
	/// Image change, see above.
	pub image: Option<Option<String>>,
}

impl AttributePatch {
	/// Only the label.
	pub fn label(label: impl Into<String>) -> Self {
		Self {
			label: Some(label.into()),
			..Self::default()
		}
	}

	/// Only the shape.
	pub fn shape(shape: Shape) -> Self {
		Self {
			shape: Some(shape),
			..Self::default()
		}
	}

	/// Only the size class.
	pub fn size(size: Size) -> Self {
		Self {
			size: Some(size),
			..Self::default()
		}
	}

	/// Background and text color together, as the palette sets them.
	pub fn colors(background: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			background_color: Some(background.into()),
			text_color: Some(text.into()),
			..Self::default()
		}
	}

	/// Replace the image with a data URI.
	pub fn image(uri: impl Into<String>) -> Self {
		Self {
			image: Some(Some(uri.into())),
			..Self::default()
		}
	}

	/// Remove the image.
	pub fn clear_image() -> Self {
		Self {
			image: Some(None),
			..Self::default()
		}
	}
}

/// A topic on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique id.
	pub id: NodeId,
	/// Top-left corner.
	pub position: Position,
	/// Visual attributes.
	pub data: NodeAttributes,
}

/// A directed link from `source` to `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// Unique id, see [`Edge::id_for`].
	pub id: EdgeId,
	/// Node the edge leaves from.
	pub source: NodeId,
	/// Node the edge points at.
	pub target: NodeId,
}

impl Edge {
	/// Id for the edge connecting `source` to `target`.
	pub fn id_for(source: &str, target: &str) -> EdgeId {
		format!("e{source}-{target}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_only_touches_named_fields() {
		let base = NodeAttributes {
			label: "Main Topic".into(),
			image: Some("data:image/png;base64,AAAA".into()),
			..NodeAttributes::default()
		};
		let merged = base.merged(&AttributePatch::shape(Shape::Hexagon));
		assert_eq!(merged.shape, Shape::Hexagon);
		assert_eq!(merged.label, "Main Topic");
		assert_eq!(merged.image, base.image);
		assert_eq!(merged.background_color, "white");
	}

	#[test]
	fn clearing_image_is_distinct_from_leaving_it() {
		let base = NodeAttributes {
			image: Some("data:image/png;base64,AAAA".into()),
			..NodeAttributes::default()
		};
		assert!(base.merged(&AttributePatch::default()).image.is_some());
		assert!(base.merged(&AttributePatch::clear_image()).image.is_none());
	}

	#[test]
	fn attributes_serialize_camel_case_without_missing_image() {
		let json = serde_json::to_value(NodeAttributes::with_label("x")).unwrap();
		assert_eq!(json["backgroundColor"], "white");
		assert_eq!(json["textColor"], "black");
		assert_eq!(json["shape"], "rectangle");
		assert_eq!(json["size"], "medium");
		assert!(json.get("image").is_none());
	}
}
