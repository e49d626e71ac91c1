use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::topology::{EditorHandle, TopologyCanvas, ViewMode};

/// Read-only view of a saved simulation, scaled to fit the canvas.
#[component]
pub fn Preview() -> impl IntoView {
	let query = use_query_map();
	let handle = EditorHandle::new(ViewMode::Preview, query.with_untracked(|q| q.get("id")));
	handle.load();
	let title = handle.title();

	view! {
		<div class="preview">
			<h2>{move || title.get().unwrap_or_default()}</h2>
			<div class="canvas-host">
				<TopologyCanvas handle=handle />
			</div>
		</div>
	}
}
