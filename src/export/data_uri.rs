//! `data:<mime>;base64,<payload>` helpers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ExportError;

pub fn encode(mime: &str, bytes: &[u8]) -> String {
	format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and decoded bytes.
pub fn decode(uri: &str) -> Result<(String, Vec<u8>), ExportError> {
	let rest = uri.strip_prefix("data:").ok_or(ExportError::InvalidDataUri)?;
	let (meta, payload) = rest.split_once(',').ok_or(ExportError::InvalidDataUri)?;
	let mime = meta
		.strip_suffix(";base64")
		.ok_or(ExportError::InvalidDataUri)?;
	let bytes = STANDARD
		.decode(payload.trim())
		.map_err(|_| ExportError::InvalidDataUri)?;
	Ok((mime.to_string(), bytes))
}

/// A well-formed base64 data URI carrying an image.
pub fn is_image(uri: &str) -> bool {
	decode(uri).is_ok_and(|(mime, _)| mime.starts_with("image/"))
}
