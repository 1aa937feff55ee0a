use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use web_sys::HtmlCanvasElement;

use super::component::dispatch;
use super::state::{Action, EditorState};
use crate::error::ExportError;
use crate::export::{Format, browser, json, pdf, svg};

async fn export(
	editor: RwSignal<EditorState>,
	canvas: Option<HtmlCanvasElement>,
	format: Format,
) -> Result<(), ExportError> {
	let Some(file_name) = editor.try_with_untracked(|s| s.config.file_name(format.extension()))
	else {
		return Ok(());
	};
	let bytes = match (format, canvas) {
		(Format::Png, Some(canvas)) => browser::canvas_png(&canvas).await?,
		(Format::Pdf, Some(canvas)) => pdf::png_to_pdf(&browser::canvas_png(&canvas).await?)?,
		(Format::Png | Format::Pdf, None) => return Ok(()),
		(Format::Svg, _) => editor.with_untracked(svg::render_svg).into_bytes(),
		(Format::Json, _) => editor.with_untracked(|s| json::to_json(&s.graph))?.into_bytes(),
	};
	browser::download_bytes(&bytes, format.mime(), &file_name)?;
	info!("exported {file_name} ({} bytes)", bytes.len());
	Ok(())
}

/// Run an export in the background. Image formats need the canvas in the
/// document and quietly do nothing without it.
fn start_export(
	editor: RwSignal<EditorState>,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	format: Format,
) {
	let canvas: Option<HtmlCanvasElement> = canvas_ref.get_untracked().map(Into::into);
	if canvas.is_none() && format != Format::Json {
		return;
	}
	spawn_local(async move {
		if let Err(err) = export(editor, canvas, format).await {
			error!("error exporting {}: {err}", format.extension());
		}
	});
}

#[component]
pub fn Toolbar(
	editor: RwSignal<EditorState>,
	canvas_ref: NodeRef<leptos::html::Canvas>,
) -> impl IntoView {
	let no_selection = move || editor.with(|s| !s.has_selection());
	let export_button = move |format: Format, title: &'static str, glyph: &'static str| {
		view! {
			<button
				class="tool"
				title=title
				on:click=move |_| start_export(editor, canvas_ref, format)
			>
				{glyph}
			</button>
		}
	};

	view! {
		<div class="toolbar">
			<button
				class="tool"
				title="Add Node"
				on:click=move |_| dispatch(editor, Action::AddChild)
			>
				"+"
			</button>
			<button
				class="tool"
				title="Delete Selected"
				prop:disabled=no_selection
				on:click=move |_| dispatch(editor, Action::DeleteSelected)
			>
				"\u{1f5d1}"
			</button>
			<button
				class="tool"
				class:active=move || editor.with(|s| s.style_panel_open())
				title="Node Settings"
				prop:disabled=no_selection
				on:click=move |_| dispatch(editor, Action::ToggleStylePanel)
			>
				"\u{1f3a8}"
			</button>

			<div class="divider" />

			{export_button(Format::Png, "Export as PNG", "PNG")}
			{export_button(Format::Svg, "Export as SVG", "SVG")}
			{export_button(Format::Pdf, "Export as PDF", "PDF")}
			{export_button(Format::Json, "Export as JSON", "JSON")}

			<div class="divider" />

			<button class="tool" title="Zoom In" on:click=move |_| dispatch(editor, Action::ZoomIn)>
				"+\u{1f50d}"
			</button>
			<button class="tool" title="Zoom Out" on:click=move |_| dispatch(editor, Action::ZoomOut)>
				"-\u{1f50d}"
			</button>
			<button class="tool" title="Fit View" on:click=move |_| dispatch(editor, Action::FitView)>
				"\u{26f6}"
			</button>
		</div>
	}
}
