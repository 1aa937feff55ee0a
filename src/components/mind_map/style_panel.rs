use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use super::component::{dispatch, load_image};
use super::layout::PALETTE;
use super::state::{Action, EditorState};
use super::types::{AttributePatch, NodeAttributes, Shape, Size};

/// Controls for the selection. Shows the first selected node's values but
/// every change applies to the whole selection.
#[component]
pub fn StylePanel(editor: RwSignal<EditorState>) -> impl IntoView {
	let first = Memo::new(move |_| {
		editor.with(|s| s.first_selected().map(|n| n.data.clone()))
	});
	let current = move |f: fn(&NodeAttributes) -> bool| {
		first.with(|a| a.as_ref().is_some_and(f))
	};
	let update = move |patch: AttributePatch| dispatch(editor, Action::UpdateSelected(patch));

	let on_upload = move |ev: Event| {
		let Some(input) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		let ids = editor.with_untracked(|s| s.selection.clone());
		load_image(editor, ids, file.into());
		// Allow picking the same file again.
		input.set_value("");
	};

	let shapes = Shape::ALL
		.into_iter()
		.map(|shape| {
			let selected = move || first.with(|a| a.as_ref().map(|a| a.shape) == Some(shape));
			view! {
				<button
					class="option"
					class:current=selected
					on:click=move |_| update(AttributePatch::shape(shape))
				>
					{shape.label()}
				</button>
			}
		})
		.collect_view();

	let sizes = Size::ALL
		.into_iter()
		.map(|size| {
			let selected = move || first.with(|a| a.as_ref().map(|a| a.size) == Some(size));
			view! {
				<button
					class="option"
					class:current=selected
					on:click=move |_| update(AttributePatch::size(size))
				>
					{size.label()}
				</button>
			}
		})
		.collect_view();

	let colors = PALETTE
		.into_iter()
		.map(|swatch| {
			let selected = move || {
				first.with(|a| {
					a.as_ref()
						.is_some_and(|a| a.background_color == swatch.background)
				})
			};
			view! {
				<button
					class="swatch"
					class:current=selected
					title=swatch.label
					style=format!("background-color: {}", swatch.background)
					on:click=move |_| update(AttributePatch::colors(swatch.background, swatch.text))
				/>
			}
		})
		.collect_view();

	view! {
		<div class="style-panel">
			<section>
				<label class="heading">"Image"</label>
				<div class="row">
					<label class="upload">
						<span>"Upload Image"</span>
						<input type="file" accept="image/*" class="hidden" on:change=on_upload />
					</label>
					<Show when=move || current(|a| a.image.is_some())>
						<button
							class="remove"
							on:click=move |_| update(AttributePatch::clear_image())
						>
							"Remove"
						</button>
					</Show>
				</div>
			</section>
			<section>
				<label class="heading">"Shape"</label>
				<div class="grid grid-2">{shapes}</div>
			</section>
			<section>
				<label class="heading">"Size"</label>
				<div class="grid grid-3">{sizes}</div>
			</section>
			<section>
				<label class="heading">"Color"</label>
				<div class="grid grid-3">{colors}</div>
			</section>
		</div>
	}
}
