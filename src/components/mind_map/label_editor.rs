use leptos::prelude::*;
use web_sys::KeyboardEvent;

use super::component::dispatch;
use super::layout;
use super::state::{Action, EditorState};
use super::types::NodeId;

/// Screen-space placement for the inline editor over node `id`.
fn editor_style(state: &EditorState, id: &str) -> Option<String> {
	let node = state.graph.node(id)?;
	let rect = layout::node_rect(node);
	let content = layout::content(node, rect);
	let t = &state.transform;
	let width = (rect.w - 2.0 * layout::PADDING_X).max(40.0) * t.k;
	let height = layout::LINE_HEIGHT * t.k;
	let (cx, cy) = t.graph_to_screen(content.label.0, content.label.1);
	Some(format!(
		"position: absolute; left: {}px; top: {}px; width: {width}px; height: {height}px; font-size: {}px;",
		cx - width / 2.0,
		cy - height / 2.0,
		layout::FONT_SIZE * t.k,
	))
}

/// Text input laid over a node while its label is edited.
///
/// Losing focus always commits; Enter commits by blurring.
#[component]
pub fn LabelEditor(
	editor: RwSignal<EditorState>,
	editing: RwSignal<Option<NodeId>>,
	draft: RwSignal<String>,
) -> impl IntoView {
	let input_ref = NodeRef::<leptos::html::Input>::new();

	Effect::new(move |_| {
		if let Some(input) = input_ref.get() {
			let _ = input.focus();
			input.select();
		}
	});

	let commit = move || {
		let Some(id) = editing.get_untracked() else {
			return;
		};
		editing.set(None);
		dispatch(
			editor,
			Action::CommitLabel {
				id,
				label: draft.get_untracked(),
			},
		);
	};

	let style = move || {
		editing
			.get()
			.and_then(|id| editor.with(|s| editor_style(s, &id)))
			.unwrap_or_default()
	};

	view! {
		<Show when=move || editing.with(Option::is_some)>
			<input
				node_ref=input_ref
				type="text"
				class="label-editor"
				style=style
				prop:value=move || draft.get()
				on:input=move |ev| draft.set(event_target_value(&ev))
				on:blur=move |_| commit()
				on:keydown=move |ev: KeyboardEvent| {
					if ev.key() == "Enter" {
						ev.prevent_default();
						if let Some(input) = input_ref.get_untracked() {
							let _ = input.blur();
						}
					}
				}
			/>
		</Show>
	}
}
