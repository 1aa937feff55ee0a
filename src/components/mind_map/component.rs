use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	Blob, CanvasRenderingContext2d, ClipboardEvent, HtmlCanvasElement, HtmlInputElement,
	KeyboardEvent, MouseEvent, WheelEvent,
};

use super::label_editor::LabelEditor;
use super::layout::{self, Hit};
use super::render::{self, ImageCache, Overlay};
use super::state::{Action, EditorState};
use super::style_panel::StylePanel;
use super::toolbar::Toolbar;
use super::types::{AttributePatch, NodeId, Position};
use crate::config::EditorConfig;
use crate::export::{browser, data_uri};

/// Apply `action` and notify every view of the editor. Rejections are logged.
pub fn dispatch(editor: RwSignal<EditorState>, action: Action) {
	let name = action.name();
	match editor.try_update(|s| s.apply(action)) {
		Some(Ok(())) => {}
		Some(Err(err)) => warn!("{name} rejected: {err}"),
		None => debug!("{name} dropped, editor is gone"),
	}
}

/// Decode `file` in the background and set it as the image of `ids`.
pub fn load_image(editor: RwSignal<EditorState>, ids: Vec<NodeId>, file: Blob) {
	spawn_local(async move {
		match browser::read_data_url(&file).await {
			Ok(uri) if data_uri::is_image(&uri) => {
				debug!("image decoded for {} node(s)", ids.len());
				dispatch(
					editor,
					Action::UpdateNodes {
						ids,
						patch: AttributePatch::image(uri),
					},
				);
			}
			Ok(_) => warn!("ignoring a file that is not an image"),
			Err(err) => error!("failed to read image: {err}"),
		}
	});
}

#[derive(Clone, Debug, Default)]
enum Pointer {
	#[default]
	Idle,
	Dragging {
		start: (f64, f64),
		origins: Vec<(NodeId, Position)>,
	},
	Panning {
		start: (f64, f64),
		origin: (f64, f64),
	},
	Connecting {
		source: NodeId,
	},
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn window_size() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn is_delete_key(key: &str) -> bool {
	matches!(key, "Delete" | "Backspace")
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn MindMap(
	#[prop(optional)] config: Option<EditorConfig>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let editor = RwSignal::new(EditorState::new(config.unwrap_or_default()));
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let connection = RwSignal::new(None::<((f64, f64), (f64, f64))>);
	let editing = RwSignal::new(None::<NodeId>);
	let draft = RwSignal::new(String::new());
	let image_tick = RwSignal::new(0u32);
	let pointer: Rc<RefCell<Pointer>> = Rc::new(RefCell::new(Pointer::Idle));

	let images = ImageCache::default();
	let on_image_load: Closure<dyn FnMut()> = Closure::new(move || {
		image_tick.update(|t| *t = t.wrapping_add(1));
	});

	// Size the canvas once it is mounted, then fit the document into it.
	Effect::new(move |mounted: Option<bool>| {
		if mounted == Some(true) {
			return true;
		}
		let Some(canvas) = canvas_ref.get() else {
			return false;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = if fullscreen {
			window_size().unwrap_or((800.0, 600.0))
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		dispatch(editor, Action::Resize { width: w, height: h });
		dispatch(editor, Action::FitView);
		info!("mind map mounted at {w}x{h}");
		true
	});

	// Window listeners outlive the component unless removed explicitly.
	if fullscreen {
		let resize = window_event_listener(ev::resize, move |_| {
			let Some((w, h)) = window_size() else {
				return;
			};
			if let Some(canvas) = canvas_ref.get_untracked() {
				let canvas: HtmlCanvasElement = canvas.into();
				canvas.set_width(w as u32);
				canvas.set_height(h as u32);
			}
			dispatch(editor, Action::Resize { width: w, height: h });
		});
		on_cleanup(move || resize.remove());
	}

	// Every state change repaints; nothing else draws.
	Effect::new(move |_| {
		image_tick.track();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			return;
		};
		let overlay = Overlay {
			connection: connection.get(),
			editing: editing.get(),
		};
		let cb: &Closure<dyn FnMut()> = &on_image_load;
		editor.with(|s| {
			render::render(s, &overlay, &images, Some(cb.as_ref().unchecked_ref()), &ctx)
		});
	});

	let paste = window_event_listener(ev::paste, move |ev: ClipboardEvent| {
		let Some(ids) = editor.try_with_untracked(|s| s.selection.clone()) else {
			return;
		};
		if ids.is_empty() {
			return;
		}
		let Some(file) = browser::clipboard_image(&ev) else {
			return;
		};
		ev.prevent_default();
		load_image(editor, ids, file.into());
	});
	on_cleanup(move || paste.remove());

	let keydown = window_event_listener(ev::keydown, move |ev: KeyboardEvent| {
		if editing.try_get_untracked().is_none_or(|e| e.is_some()) {
			return;
		}
		let in_input = ev
			.target()
			.is_some_and(|t| t.dyn_ref::<HtmlInputElement>().is_some());
		if in_input {
			return;
		}
		if is_delete_key(&ev.key()) {
			ev.prevent_default();
			dispatch(editor, Action::DeleteSelected);
			dispatch(editor, Action::DeleteSelectedEdges);
		}
	});
	on_cleanup(move || keydown.remove());

	let pointer_md = pointer.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let (gx, gy) = editor.with_untracked(|s| s.transform.screen_to_graph(x, y));
		let hit = editor.with_untracked(|s| layout::hit_test(&s.graph, gx, gy));

		let next = match hit {
			Some(Hit::SourceHandle(source)) => {
				let from = editor.with_untracked(|s| {
					s.graph
						.node(&source)
						.map(|n| layout::source_handle(layout::node_rect(n)))
				});
				connection.set(from.map(|from| (from, (gx, gy))));
				Pointer::Connecting { source }
			}
			Some(Hit::Node(id)) | Some(Hit::TargetHandle(id)) => {
				if ev.shift_key() {
					dispatch(editor, Action::ToggleSelected(id));
				} else if !editor.with_untracked(|s| s.is_selected(&id)) {
					dispatch(editor, Action::Select(vec![id]));
				}
				let origins = editor.with_untracked(|s| {
					s.selection
						.iter()
						.filter_map(|id| s.graph.node(id))
						.map(|n| (n.id.clone(), n.position))
						.collect()
				});
				Pointer::Dragging {
					start: (x, y),
					origins,
				}
			}
			None => {
				if let Some(edge) = editor.with_untracked(|s| layout::edge_hit(&s.graph, gx, gy)) {
					dispatch(editor, Action::SelectEdges(vec![edge]));
					*pointer_md.borrow_mut() = Pointer::Idle;
					return;
				}
				if !ev.shift_key() {
					dispatch(editor, Action::Select(Vec::new()));
				}
				let origin = editor.with_untracked(|s| (s.transform.x, s.transform.y));
				Pointer::Panning {
					start: (x, y),
					origin,
				}
			}
		};
		*pointer_md.borrow_mut() = next;
	};

	let pointer_mm = pointer.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		match &*pointer_mm.borrow() {
			Pointer::Idle => {}
			Pointer::Dragging { start, origins } => {
				let k = editor.with_untracked(|s| s.transform.k);
				let (dx, dy) = ((x - start.0) / k, (y - start.1) / k);
				for (id, origin) in origins {
					dispatch(
						editor,
						Action::MoveNode {
							id: id.clone(),
							position: origin.offset(dx, dy),
						},
					);
				}
			}
			Pointer::Panning { start, origin } => dispatch(
				editor,
				Action::PanTo {
					x: origin.0 + (x - start.0),
					y: origin.1 + (y - start.1),
				},
			),
			Pointer::Connecting { .. } => {
				let end = editor.with_untracked(|s| s.transform.screen_to_graph(x, y));
				connection.update(|c| {
					if let Some((_, to)) = c {
						*to = end;
					}
				});
			}
		}
	};

	let pointer_mu = pointer.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let released = std::mem::take(&mut *pointer_mu.borrow_mut());
		let Pointer::Connecting { source } = released else {
			return;
		};
		connection.set(None);
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let target = editor.with_untracked(|s| {
			let (gx, gy) = s.transform.screen_to_graph(x, y);
			layout::hit_test(&s.graph, gx, gy).map(|hit| hit.node_id().clone())
		});
		match target {
			Some(target) if target != source => {
				dispatch(editor, Action::Connect { source, target })
			}
			_ => debug!("connection from {source} dropped"),
		}
	};

	let pointer_ml = pointer.clone();
	let on_mouseleave = move |_: MouseEvent| {
		*pointer_ml.borrow_mut() = Pointer::Idle;
		connection.set(None);
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		dispatch(editor, Action::ZoomAt { x, y, factor });
	};

	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let found = editor.with_untracked(|s| {
			let (gx, gy) = s.transform.screen_to_graph(x, y);
			let hit = layout::hit_test(&s.graph, gx, gy)?;
			let node = s.graph.node(hit.node_id())?;
			Some((node.id.clone(), node.data.label.clone()))
		});
		if let Some((id, label)) = found {
			draft.set(label);
			editing.set(Some(id));
		}
	};

	view! {
		<div class="mind-map">
			<canvas
				node_ref=canvas_ref
				class="mind-map-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style="display: block; cursor: grab;"
			/>
			<LabelEditor editor=editor editing=editing draft=draft />
			<div class="panel panel-top-left">
				<Toolbar editor=editor canvas_ref=canvas_ref />
				<Show when=move || editor.with(|s| s.style_panel_open())>
					<StylePanel editor=editor />
				</Show>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn delete_keys() {
		assert!(is_delete_key("Delete"));
		assert!(is_delete_key("Backspace"));
		assert!(!is_delete_key("Enter"));
		assert!(!is_delete_key("d"));
	}

	#[test]
	fn dispatch_after_unmount_is_dropped() {
		let editor = RwSignal::new(EditorState::default());
		editor.dispose();
		dispatch(editor, Action::AddChild);
		dispatch(editor, Action::DeleteSelected);
		assert!(editor.try_with_untracked(|s| s.graph.len()).is_none());
	}
}
