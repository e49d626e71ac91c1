//! Network topology editor: place devices on a canvas, link them and ask
//! the diagram service for shortest paths.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod pages;

// Top-Level pages
use crate::pages::not_found::NotFound;
use crate::pages::preview::Preview;
use crate::pages::simulation::Simulation;

pub use crate::components::topology::{
	Backend, BackendError, Button, CanvasSize, DEFAULT_DEVICE_SIZE, DEVICE_DATA_KEY, Device,
	DeviceId, DeviceKind, DeviceRef, DragState, Edge, Editor, EditorConfig, EditorHandle, Effect,
	Event, EventLog, Interaction, LinkRejection, LoadOutcome, LogEntry, LogLevel, Mode, RawId,
	Surface, TopologyCanvas, TopologyPayload, TopologyStore, ViewMode, ViewTransform,
	encode_save_body, hit_test, normalize_id, parse_path_result, parse_simulation, render, resolve,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Routes the editor, the read-only preview and 404's.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Network Simulation" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Simulation />
				<Route path=path!("/preview") view=Preview />
			</Routes>
		</Router>
	}
}
