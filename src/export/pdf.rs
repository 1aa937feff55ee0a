//! Single-page PDF wrapping a PNG raster.

use svg2pdf::usvg;

use super::data_uri;
use crate::error::ExportError;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Pixel size from the PNG `IHDR` chunk.
pub fn png_dimensions(png: &[u8]) -> Option<(u32, u32)> {
	if png.len() < 24 || png[..8] != PNG_SIGNATURE || &png[12..16] != b"IHDR" {
		return None;
	}
	let width = u32::from_be_bytes(png[16..20].try_into().ok()?);
	let height = u32::from_be_bytes(png[20..24].try_into().ok()?);
	(width > 0 && height > 0).then_some((width, height))
}

/// Embed `png` in a PDF whose single page has the raster's aspect ratio.
pub fn png_to_pdf(png: &[u8]) -> Result<Vec<u8>, ExportError> {
	let (w, h) = png_dimensions(png).ok_or_else(|| ExportError::Pdf("not a PNG image".into()))?;
	let svg = format!(
		r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><image width="{w}" height="{h}" xlink:href="{}"/></svg>"#,
		data_uri::encode("image/png", png)
	);

	let opt = usvg::Options::default();
	let tree = usvg::Tree::from_str(&svg, &opt).map_err(|e| ExportError::Svg(format!("{e:?}")))?;
	svg2pdf::to_pdf(
		&tree,
		svg2pdf::ConversionOptions::default(),
		svg2pdf::PageOptions::default(),
	)
	.map_err(|e| ExportError::Pdf(format!("{e:?}")))
}
