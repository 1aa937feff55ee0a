//! Error types for graph edits and exports.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::components::mind_map::{EdgeId, NodeId};

/// A graph edit that would break one of the model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
	/// An edge endpoint names a node that is not in the graph.
	#[error("unknown node `{0}`")]
	UnknownNode(NodeId),
	/// The `(source, target)` pair is already connected.
	#[error("edge `{0}` already exists")]
	DuplicateEdge(EdgeId),
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(NodeId),
}

/// Failure while producing an export or decoding a file.
#[derive(Debug, Error)]
pub enum ExportError {
	/// Serializing or parsing a JSON document failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	/// The intermediate SVG could not be parsed.
	#[error("failed to build SVG: {0}")]
	Svg(String),
	/// The PDF writer rejected the input.
	#[error("failed to convert to PDF: {0}")]
	Pdf(String),
	/// A browser API threw or returned nothing.
	#[error("browser error: {0}")]
	Js(String),
	/// Text that should be a base64 `data:` URI is not one.
	#[error("not a base64 data URI")]
	InvalidDataUri,
	/// An imported document breaks a graph invariant.
	#[error(transparent)]
	Graph(#[from] GraphError),
}

impl From<JsValue> for ExportError {
	fn from(value: JsValue) -> Self {
		let msg = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &JsValue::from_str("message"))
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{value:?}"));
		Self::Js(msg)
	}
}
