//! Browser plumbing: canvas rasterization, blob reads and download links.

use js_sys::{Array, Promise, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	Blob, BlobPropertyBag, ClipboardEvent, File, FileReader, HtmlAnchorElement, HtmlCanvasElement,
	Url,
};

use crate::error::ExportError;

/// Rasterize the canvas to PNG bytes without blocking the event loop.
pub async fn canvas_png(canvas: &HtmlCanvasElement) -> Result<Vec<u8>, ExportError> {
	let promise = Promise::new(&mut |resolve, reject| {
		if let Err(err) = canvas.to_blob(&resolve) {
			let _ = reject.call1(&JsValue::NULL, &err);
		}
	});
	let blob = JsFuture::from(promise).await?;
	if blob.is_null() {
		return Err(ExportError::Js("canvas produced no image".into()));
	}
	let blob: Blob = blob.dyn_into()?;
	blob_bytes(&blob).await
}

pub async fn blob_bytes(blob: &Blob) -> Result<Vec<u8>, ExportError> {
	let buffer = JsFuture::from(blob.array_buffer()).await?;
	Ok(Uint8Array::new(&buffer).to_vec())
}

/// Read a file or blob into a `data:` URI.
pub async fn read_data_url(blob: &Blob) -> Result<String, ExportError> {
	let reader = FileReader::new()?;
	let promise = Promise::new(&mut |resolve, reject| {
		reader.set_onload(Some(&resolve));
		reader.set_onerror(Some(&reject));
	});
	reader.read_as_data_url(blob)?;
	JsFuture::from(promise).await?;
	reader
		.result()?
		.as_string()
		.ok_or(ExportError::InvalidDataUri)
}

/// First image file on the clipboard, if any.
pub fn clipboard_image(ev: &ClipboardEvent) -> Option<File> {
	let items = ev.clipboard_data()?.items();
	(0..items.length())
		.filter_map(|i| items.get(i))
		.filter(|item| item.type_().starts_with("image/"))
		.find_map(|item| item.get_as_file().ok().flatten())
}

/// Trigger a download of an already-encoded URL.
pub fn download_url(url: &str, file_name: &str) -> Result<(), ExportError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| ExportError::Js("no document".into()))?;
	let link = document
		.create_element("a")?
		.dyn_into::<HtmlAnchorElement>()
		.map_err(JsValue::from)?;
	link.set_href(url);
	link.set_download(file_name);
	link.click();
	Ok(())
}

/// Download `bytes` through a temporary object URL.
pub fn download_bytes(bytes: &[u8], mime: &str, file_name: &str) -> Result<(), ExportError> {
	let parts = Array::of1(&Uint8Array::from(bytes));
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let result = download_url(&url, file_name);
	Url::revoke_object_url(&url)?;
	result
}
