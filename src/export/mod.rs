//! Turning the diagram into downloadable files.

pub mod browser;
pub mod data_uri;
pub mod json;
pub mod pdf;
pub mod svg;

/// Export formats offered by the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
	Png,
	Svg,
	Pdf,
	Json,
}

impl Format {
	pub fn extension(self) -> &'static str {
		match self {
			Format::Png => "png",
			Format::Svg => "svg",
			Format::Pdf => "pdf",
			Format::Json => "json",
		}
	}

	pub fn mime(self) -> &'static str {
		match self {
			Format::Png => "image/png",
			Format::Svg => "image/svg+xml",
			Format::Pdf => "application/pdf",
			Format::Json => "application/json",
		}
	}
}
