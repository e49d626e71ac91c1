use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use web_sys::DragEvent;

use crate::components::topology::{
	DEVICE_DATA_KEY, DeviceKind, EditorHandle, Mode, TopologyCanvas, ViewMode,
};

/// Editable simulation page: palette, toolbar, canvas and console.
#[component]
pub fn Simulation() -> impl IntoView {
	let query = use_query_map();
	let simulation_id = query.with_untracked(|q| q.get("id"));
	let handle = EditorHandle::new(ViewMode::Edit, simulation_id);
	handle.load();

	let (entries, mode, title, halted) = (
		handle.entries(),
		handle.mode(),
		handle.title(),
		handle.halted(),
	);
	let description = RwSignal::new(String::from("Select a device to see what it does."));

	let palette = DeviceKind::ALL
		.into_iter()
		.map(|kind| {
			view! {
				<div
					class="device"
					draggable="true"
					data-device=kind.as_str()
					on:click=move |_| description.set(kind.description().to_string())
					on:dragstart=move |ev: DragEvent| {
						if let Some(dt) = ev.data_transfer() {
							let _ = dt.set_data(DEVICE_DATA_KEY, kind.as_str());
						}
					}
				>
					{kind.as_str()}
				</div>
			}
		})
		.collect_view();

	let (link, sssp, save, delete, clear) = (
		handle.clone(),
		handle.clone(),
		handle.clone(),
		handle.clone(),
		handle.clone(),
	);

	view! {
		<div class="simulation">
			<header>
				<h1 id="simulationName">{move || title.get().unwrap_or_default()}</h1>
				<nav class="toolbar">
					<button
						id="join"
						class:active=move || mode.get() == Mode::Link
						on:click=move |_| link.toggle(Mode::Link)
					>
						"Link"
					</button>
					<button
						id="sssp"
						class:active=move || mode.get() == Mode::PathQuery
						on:click=move |_| sssp.toggle(Mode::PathQuery)
					>
						"Shortest path"
					</button>
					<button id="saveBtn" on:click=move |_| save.save()>
						"Save"
					</button>
					<button id="deleteBtn" on:click=move |_| delete.delete()>
						"Delete"
					</button>
				</nav>
			</header>

			<aside class="palette">
				{palette}
				<div class="Description">
					<p>{move || description.get()}</p>
				</div>
			</aside>

			<main class="canvas-host">
				{move || {
					halted
						.get()
						.then(|| view! { <p class="session-ended">"Your session ended. Sign in to continue."</p> })
				}}
				<TopologyCanvas handle=handle.clone() />
			</main>

			<section class="console">
				<button id="clearlog" on:click=move |_| clear.clear_log()>
					"Clear"
				</button>
				<div id="logOutput">
					{move || {
						entries
							.get()
							.into_iter()
							.map(|entry| {
								view! {
									<div class=format!("log {}", entry.level.css_class())>
										{format!("> {}", entry.message)}
									</div>
								}
							})
							.collect_view()
					}}
				</div>
			</section>
		</div>
	}
}
