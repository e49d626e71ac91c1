use super::backend::{BackendError, LoadOutcome};
use super::config::EditorConfig;
use super::console::EventLog;
use super::render::{Surface, render};
use super::state::{Effect, Event, Interaction, Mode};
use super::store::TopologyStore;
use super::transform::{CanvasSize, ViewMode};
use super::types::{DeviceRef, TopologyPayload};

/// Owns the topology, the interaction state and the console for one canvas.
#[derive(Clone, Debug)]
pub struct Editor {
	store: TopologyStore,
	interaction: Interaction,
	log: EventLog,
	config: EditorConfig,
	size: CanvasSize,
	view: ViewMode,
	title: Option<String>,
	// Set when loading failed; the page shows nothing and ignores input.
	halted: bool,
}

impl Editor {
	/// An empty editor on a zero-sized canvas.
	pub fn new(config: EditorConfig, view: ViewMode) -> Self {
		Self {
			store: TopologyStore::new(),
			interaction: Interaction::new(),
			log: EventLog::new(),
			config,
			size: CanvasSize::default(),
			view,
			title: None,
			halted: false,
		}
	}

	/// The topology being edited.
	pub fn store(&self) -> &TopologyStore {
		&self.store
	}

	/// Console entries so far.
	pub fn log(&self) -> &EventLog {
		&self.log
	}

	/// Settings in use.
	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	/// Active interaction mode.
	pub fn mode(&self) -> Mode {
		self.interaction.mode()
	}

	/// Edit or preview.
	pub fn view(&self) -> ViewMode {
		self.view
	}

	/// Current canvas size.
	pub fn size(&self) -> CanvasSize {
		self.size
	}

	/// Name of the loaded simulation.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// True after a failed load.
	pub fn is_halted(&self) -> bool {
		self.halted
	}

	/// Routes one input event. The edit view draws with the identity
	/// transform, so canvas pixels are topology coordinates; the preview
	/// view is read-only and drops everything.
	pub fn handle(&mut self, event: Event) -> Vec<Effect> {
		if self.halted || self.view == ViewMode::Preview {
			return Vec::new();
		}
		self.interaction
			.handle(event, &mut self.store, &mut self.log, &self.config)
	}

	/// Records the new canvas size; the next render uses it.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.size = CanvasSize::new(width, height);
	}

	/// Paints the topology, or only clears the canvas once halted.
	pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
		if self.halted {
			surface.clear(self.size);
			return;
		}
		render(
			surface,
			self.size,
			self.store.devices(),
			self.store.edges(),
			self.view,
			&self.config,
		);
	}

	/// The topology in its persisted shape.
	pub fn payload(&self) -> TopologyPayload {
		self.store.payload()
	}

	/// Empties the console.
	pub fn clear_log(&mut self) {
		self.log.clear();
	}

	/// Notes that the page was opened without an id; nothing is loaded.
	pub fn missing_simulation_id(&mut self) {
		self.log.info("No simulation ID provided in URL");
	}

	/// Reports a save, delete or path query attempted without an id.
	pub fn missing_simulation_id_for_action(&mut self) {
		self.log.error("Missing simulation ID");
	}

	/// Applies the result of a load. A failed load adds nothing and halts
	/// the editor.
	pub fn apply_load(&mut self, outcome: Result<LoadOutcome, BackendError>) {
		match outcome {
			Ok(LoadOutcome::Loaded { name, payload }) => {
				self.store.load(payload);
				self.title = name;
				self.log.success("Simulation loaded successfully");
			}
			Ok(LoadOutcome::NotFound) => self.log.error("Simulation not found"),
			Ok(LoadOutcome::Empty) => self.log.info("Simulation has no saved data"),
			Err(err) => {
				self.halted = true;
				self.log.error(format!("Could not load simulation: {err}"));
			}
		}
	}

	/// Logs the result of a save.
	pub fn record_save(&mut self, result: Result<(), BackendError>) {
		match result {
			Ok(()) => self.log.success("Simulation saved successfully"),
			Err(err) => self.log.error(format!("Error saving simulation: {err}")),
		}
	}

	/// Logs the result of a delete.
	pub fn record_delete(&mut self, result: Result<(), BackendError>) {
		match result {
			Ok(()) => self.log.success("Simulation deleted"),
			Err(err) => self.log.error(format!("Error deleting simulation: {err}")),
		}
	}

	/// Logs a shortest-path answer, or why the query for `device` failed.
	pub fn record_path(&mut self, device: &DeviceRef, result: Result<String, BackendError>) {
		match result {
			Ok(path) => self.log.info(path),
			Err(err) => self
				.log
				.error(format!("Path query for {device} failed: {err}")),
		}
	}
}
