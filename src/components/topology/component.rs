use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, DragEvent, HtmlCanvasElement, MouseEvent, Window};

use super::backend::Backend;
use super::config::EditorConfig;
use super::console::LogEntry;
use super::editor::Editor;
use super::state::{Button, Effect as EditorEffect, Event, Mode};
use super::transform::ViewMode;
use super::types::{DeviceKind, DeviceRef};

/// `DataTransfer` key carrying the dragged palette device.
pub const DEVICE_DATA_KEY: &str = "device";

/// Shared between the canvas, the toolbar and the console of one page.
/// The editor itself is not reactive; after every change the handle
/// copies what the view shows into signals.
#[derive(Clone)]
pub struct EditorHandle {
	editor: Rc<RefCell<Editor>>,
	backend: Rc<Backend>,
	simulation_id: Option<String>,
	canvas: NodeRef<leptos::html::Canvas>,
	entries: RwSignal<Vec<LogEntry>>,
	mode: RwSignal<Mode>,
	title: RwSignal<Option<String>>,
	halted: RwSignal<bool>,
}

impl EditorHandle {
	/// A fresh editor for the simulation named in the URL, if any.
	pub fn new(view: ViewMode, simulation_id: Option<String>) -> Self {
		let config = EditorConfig::default();
		Self {
			editor: Rc::new(RefCell::new(Editor::new(config.clone(), view))),
			backend: Rc::new(Backend::new(config)),
			simulation_id,
			canvas: NodeRef::new(),
			entries: RwSignal::new(Vec::new()),
			mode: RwSignal::new(Mode::Normal),
			title: RwSignal::new(None),
			halted: RwSignal::new(false),
		}
	}

	/// Console lines.
	pub fn entries(&self) -> ReadSignal<Vec<LogEntry>> {
		self.entries.read_only()
	}

	/// Active toolbar mode.
	pub fn mode(&self) -> ReadSignal<Mode> {
		self.mode.read_only()
	}

	/// Simulation name once loaded.
	pub fn title(&self) -> ReadSignal<Option<String>> {
		self.title.read_only()
	}

	/// Set after a failed load.
	pub fn halted(&self) -> ReadSignal<bool> {
		self.halted.read_only()
	}

	/// Feeds one event to the editor and carries out the resulting effects.
	pub fn dispatch(&self, event: Event) {
		// Moves never log or switch modes.
		let quiet = matches!(event, Event::PointerMove { .. });
		let effects = self.editor.borrow_mut().handle(event);
		for effect in effects {
			match effect {
				EditorEffect::Redraw => self.redraw(),
				EditorEffect::PathQuery(device) => self.query_path(device),
			}
		}
		if !quiet {
			self.sync();
		}
	}

	/// Switches mode, or back to normal when `target` is already active.
	pub fn toggle(&self, target: Mode) {
		self.dispatch(Event::ModeToggle { target });
	}

	/// Empties the console.
	pub fn clear_log(&self) {
		self.editor.borrow_mut().clear_log();
		self.sync();
	}

	fn sync(&self) {
		let editor = self.editor.borrow();
		self.entries.set(editor.log().entries().to_vec());
		self.mode.set(editor.mode());
		self.title.set(editor.title().map(str::to_owned));
		self.halted.set(editor.is_halted());
	}

	/// Repaints the canvas from the current topology.
	pub fn redraw(&self) {
		let Some(canvas) = self.canvas.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(mut ctx) = context_2d(&canvas) else {
			return;
		};
		self.editor.borrow().render(&mut ctx);
	}

	/// Matches the backing store to the parent element and repaints.
	pub fn resize(&self) {
		let Some(canvas) = self.canvas.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.unwrap_or((800.0, 600.0));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		self.editor.borrow_mut().resize(w, h);
		self.redraw();
	}

	/// Loads the simulation in the background.
	pub fn load(&self) {
		let Some(id) = self.simulation_id.clone() else {
			self.editor.borrow_mut().missing_simulation_id();
			self.sync();
			return;
		};
		let handle = self.clone();
		spawn_local(async move {
			let outcome = handle.backend.load(&id).await;
			handle.editor.borrow_mut().apply_load(outcome);
			handle.sync();
			handle.redraw();
		});
	}

	/// Saves the current topology in the background.
	pub fn save(&self) {
		let Some(id) = self.require_id() else {
			return;
		};
		let payload = self.editor.borrow().payload();
		let handle = self.clone();
		spawn_local(async move {
			let result = handle.backend.save(&id, &payload).await;
			handle.editor.borrow_mut().record_save(result);
			handle.sync();
		});
	}

	/// Deletes the simulation after the user confirms.
	pub fn delete(&self) {
		let Some(id) = self.require_id() else {
			return;
		};
		let confirmed = web_sys::window()
			.and_then(|w| {
				w.confirm_with_message("Are you sure you want to delete this simulation?")
					.ok()
			})
			.unwrap_or(false);
		if !confirmed {
			return;
		}
		let handle = self.clone();
		spawn_local(async move {
			let result = handle.backend.delete(&id).await;
			handle.editor.borrow_mut().record_delete(result);
			handle.sync();
		});
	}

	// Queries are not de-duplicated; each answer is logged when it arrives.
	fn query_path(&self, device: DeviceRef) {
		let Some(id) = self.require_id() else {
			return;
		};
		let handle = self.clone();
		spawn_local(async move {
			let result = handle.backend.shortest_path(&id, &device).await;
			handle.editor.borrow_mut().record_path(&device, result);
			handle.sync();
		});
	}

	fn require_id(&self) -> Option<String> {
		if self.simulation_id.is_none() {
			self.editor.borrow_mut().missing_simulation_id_for_action();
			self.sync();
		}
		self.simulation_id.clone()
	}

	fn pointer(&self, ev: &MouseEvent) -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = self.canvas.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// The editing surface. Sizes itself to its parent element.
#[component]
pub fn TopologyCanvas(handle: EditorHandle) -> impl IntoView {
	let canvas_ref = handle.canvas;
	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(Vec::new()));

	let init = handle.clone();
	Effect::new(move |_| {
		if canvas_ref.get().is_none() {
			return;
		}
		init.resize();
		if !listeners.borrow().is_empty() {
			return;
		}
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};
		let on_resize = init.clone();
		let on_release = init.clone();
		// A button released outside the canvas still ends the drag.
		let callbacks = [
			("resize", Closure::<dyn FnMut()>::new(move || on_resize.resize())),
			(
				"mouseup",
				Closure::<dyn FnMut()>::new(move || on_release.dispatch(Event::PointerUp)),
			),
		];
		let mut listeners = listeners.borrow_mut();
		for (name, cb) in callbacks {
			let _ = window.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
			listeners.push(cb);
		}
	});

	let down = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		ev.prevent_default();
		if let Some((x, y)) = down.pointer(&ev) {
			down.dispatch(Event::PointerDown {
				x,
				y,
				button: Button::from_code(ev.button()),
			});
		}
	};

	let moved = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = moved.pointer(&ev) {
			moved.dispatch(Event::PointerMove { x, y });
		}
	};

	let dropped = handle.clone();
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		let kind = ev
			.data_transfer()
			.and_then(|dt| dt.get_data(DEVICE_DATA_KEY).ok())
			.and_then(|t| t.parse::<DeviceKind>().ok());
		let (Some(kind), Some((x, y))) = (kind, dropped.pointer(&ev)) else {
			return;
		};
		dropped.dispatch(Event::Drop { kind, x, y });
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="SimulationArea"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:dragover=|ev: DragEvent| ev.prevent_default()
			on:drop=on_drop
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style="display: block;"
		/>
	}
}
