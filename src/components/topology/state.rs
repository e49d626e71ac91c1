use super::config::EditorConfig;
use super::console::EventLog;
use super::hit::hit_test;
use super::store::{LinkRejection, TopologyStore};
use super::types::{DeviceKind, DeviceRef};

/// Editing mode selected from the toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
	/// Drag with the primary button, delete with the secondary one.
	#[default]
	Normal,
	/// Two successive device clicks create an edge.
	Link,
	/// A device click asks for shortest paths from it.
	PathQuery,
}

/// Mouse button of a pointer-down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
	/// Usually the left button.
	Primary,
	/// Usually the right button.
	Secondary,
	/// Anything else; ignored.
	Other,
}

impl Button {
	/// Maps `MouseEvent.button` codes.
	pub fn from_code(code: i16) -> Self {
		match code {
			0 => Button::Primary,
			2 => Button::Secondary,
			_ => Button::Other,
		}
	}
}

/// Input delivered to the editor, already in topology coordinates.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Event {
	PointerDown { x: f64, y: f64, button: Button },
	PointerMove { x: f64, y: f64 },
	/// Carries no position, the button may be released anywhere.
	PointerUp,
	/// A palette device dropped onto the canvas at its pointer position.
	Drop { kind: DeviceKind, x: f64, y: f64 },
	/// A toolbar button; pressing the active one returns to normal mode.
	ModeToggle { target: Mode },
}

/// Work the host must do after an event was handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
	/// The topology changed on screen.
	Redraw,
	/// Ask the diagram service for shortest paths from this device.
	PathQuery(DeviceRef),
}

/// The device being dragged and where it was grabbed, relative to its
/// top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	/// The dragged device.
	pub device: DeviceRef,
	/// Horizontal grab offset.
	pub offset_x: f64,
	/// Vertical grab offset.
	pub offset_y: f64,
}

/// Mode, drag and pending-link state of the editor.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	mode: Mode,
	drag: Option<DragState>,
	link_start: Option<DeviceRef>,
}

impl Interaction {
	/// Normal mode, nothing pending.
	pub fn new() -> Self {
		Self::default()
	}

	/// The active mode.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// The drag in progress, if any.
	pub fn drag(&self) -> Option<&DragState> {
		self.drag.as_ref()
	}

	/// The first device of a link being made.
	pub fn link_start(&self) -> Option<&DeviceRef> {
		self.link_start.as_ref()
	}

	/// Applies one event to `store`, logging what happened, and returns the
	/// work left for the host.
	pub fn handle(
		&mut self,
		event: Event,
		store: &mut TopologyStore,
		log: &mut EventLog,
		config: &EditorConfig,
	) -> Vec<Effect> {
		match event {
			Event::ModeToggle { target } => {
				self.toggle(target);
				Vec::new()
			}
			Event::Drop { kind, x, y } => self.drop_device(kind, x, y, store, log, config),
			Event::PointerDown { x, y, button } => {
				let target = hit_test(store.devices(), x, y).map(|d| (d.reference(), d.x, d.y));
				match self.mode {
					Mode::Normal => self.normal_down(target, x, y, button, store, log),
					Mode::Link => self.link_down(target.map(|(r, ..)| r), store, log),
					Mode::PathQuery => target
						.map(|(r, ..)| vec![Effect::PathQuery(r)])
						.unwrap_or_default(),
				}
			}
			Event::PointerMove { x, y } => {
				let Some(drag) = &self.drag else {
					return Vec::new();
				};
				if store.move_device(&drag.device, x - drag.offset_x, y - drag.offset_y) {
					vec![Effect::Redraw]
				} else {
					self.drag = None;
					Vec::new()
				}
			}
			Event::PointerUp => {
				self.drag = None;
				Vec::new()
			}
		}
	}

	fn toggle(&mut self, target: Mode) {
		self.mode = if self.mode == target {
			Mode::Normal
		} else {
			target
		};
		self.link_start = None;
	}

	fn drop_device(
		&mut self,
		kind: DeviceKind,
		x: f64,
		y: f64,
		store: &mut TopologyStore,
		log: &mut EventLog,
		config: &EditorConfig,
	) -> Vec<Effect> {
		if self.mode == Mode::Link {
			return Vec::new();
		}
		let size = config.default_size;
		let device = store.add_device_sized(kind, x - size / 2.0, y - size / 2.0, size, size);
		log.success(format!("{} added", device.reference()));
		vec![Effect::Redraw]
	}

	fn normal_down(
		&mut self,
		target: Option<(DeviceRef, f64, f64)>,
		x: f64,
		y: f64,
		button: Button,
		store: &mut TopologyStore,
		log: &mut EventLog,
	) -> Vec<Effect> {
		let Some((device, dx, dy)) = target else {
			return Vec::new();
		};
		match button {
			Button::Primary => {
				self.drag = Some(DragState {
					device,
					offset_x: x - dx,
					offset_y: y - dy,
				});
				Vec::new()
			}
			Button::Secondary => {
				store.remove_device(&device);
				log.error(format!("{device} deleted"));
				vec![Effect::Redraw]
			}
			Button::Other => Vec::new(),
		}
	}

	fn link_down(
		&mut self,
		target: Option<DeviceRef>,
		store: &mut TopologyStore,
		log: &mut EventLog,
	) -> Vec<Effect> {
		let Some(target) = target else {
			return Vec::new();
		};
		let Some(start) = self.link_start.take() else {
			log.info(format!("Selected {target} as link start"));
			self.link_start = Some(target);
			return Vec::new();
		};

		let linked = format!("Linked {start} → {target}");
		match store.add_edge(start, target) {
			Ok(_) => {
				log.success(linked);
				vec![Effect::Redraw]
			}
			Err(LinkRejection::Duplicate) => {
				log.info("Link already exists");
				Vec::new()
			}
			Err(LinkRejection::SelfLink) => {
				log.error("Cannot link device to itself");
				Vec::new()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::console::LogLevel;
	use super::super::types::DeviceId;
	use super::*;

	struct Fixture {
		interaction: Interaction,
		store: TopologyStore,
		log: EventLog,
		config: EditorConfig,
	}

	impl Fixture {
		fn new() -> Self {
			Self {
				interaction: Interaction::new(),
				store: TopologyStore::new(),
				log: EventLog::new(),
				config: EditorConfig::default(),
			}
		}

		fn send(&mut self, event: Event) -> Vec<Effect> {
			self.interaction
				.handle(event, &mut self.store, &mut self.log, &self.config)
		}

		fn click(&mut self, x: f64, y: f64, button: Button) -> Vec<Effect> {
			self.send(Event::PointerDown { x, y, button })
		}

		fn place(&mut self, kind: DeviceKind, x: f64, y: f64) -> Vec<Effect> {
			self.send(Event::Drop { kind, x, y })
		}
	}

	fn pc(id: u64) -> DeviceRef {
		DeviceRef::new(DeviceKind::Pc, id)
	}

	#[test]
	fn toggling_the_active_mode_returns_to_normal() {
		let mut f = Fixture::new();
		f.send(Event::ModeToggle { target: Mode::Link });
		assert_eq!(f.interaction.mode(), Mode::Link);
		f.send(Event::ModeToggle { target: Mode::PathQuery });
		assert_eq!(f.interaction.mode(), Mode::PathQuery);
		f.send(Event::ModeToggle { target: Mode::PathQuery });
		assert_eq!(f.interaction.mode(), Mode::Normal);
	}

	#[test]
	fn mode_change_clears_pending_link_source() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0);
		f.send(Event::ModeToggle { target: Mode::Link });
		f.click(30.0, 30.0, Button::Primary);
		assert_eq!(f.interaction.link_start(), Some(&pc(1)));

		f.send(Event::ModeToggle { target: Mode::PathQuery });
		assert!(f.interaction.link_start().is_none());
	}

	#[test]
	fn drop_centres_a_default_device_on_the_pointer() {
		let mut f = Fixture::new();
		assert_eq!(f.place(DeviceKind::Router, 100.0, 60.0), vec![Effect::Redraw]);
		let d = &f.store.devices()[0];
		assert_eq!((d.x, d.y, d.width, d.height), (80.0, 40.0, 40.0, 40.0));
		assert_eq!(d.id, DeviceId::Num(1));
		assert_eq!(f.log.last().unwrap().message, "Router 1 added");
		assert_eq!(f.log.last().unwrap().level, LogLevel::Success);
	}

	#[test]
	fn drop_is_ignored_in_link_mode() {
		let mut f = Fixture::new();
		f.send(Event::ModeToggle { target: Mode::Link });
		assert!(f.place(DeviceKind::Pc, 10.0, 10.0).is_empty());
		assert!(f.store.devices().is_empty());
	}

	#[test]
	fn drag_keeps_the_grab_offset() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0); // occupies 10..50
		f.click(15.0, 25.0, Button::Primary);
		assert_eq!(
			f.send(Event::PointerMove { x: 115.0, y: 225.0 }),
			vec![Effect::Redraw]
		);
		let d = &f.store.devices()[0];
		assert_eq!((d.x, d.y), (110.0, 210.0));

		f.send(Event::PointerUp);
		assert!(f.send(Event::PointerMove { x: 0.0, y: 0.0 }).is_empty());
		assert_eq!(f.store.devices()[0].x, 110.0);
	}

	#[test]
	fn release_without_a_position_ends_the_drag() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0);
		f.click(30.0, 30.0, Button::Primary);
		assert!(f.interaction.drag().is_some());

		assert!(f.send(Event::PointerUp).is_empty());
		assert!(f.send(Event::PointerUp).is_empty());
		assert!(f.interaction.drag().is_none());
		assert!(f.send(Event::PointerMove { x: 300.0, y: 300.0 }).is_empty());
		assert_eq!((f.store.devices()[0].x, f.store.devices()[0].y), (10.0, 10.0));
	}

	#[test]
	fn primary_on_empty_space_starts_nothing() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0);
		assert!(f.click(300.0, 300.0, Button::Primary).is_empty());
		assert!(f.interaction.drag().is_none());
	}

	#[test]
	fn secondary_deletes_with_cascade() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0);
		f.place(DeviceKind::Switch, 130.0, 30.0);
		f.store.add_edge(pc(1), DeviceRef::new(DeviceKind::Switch, 1)).unwrap();

		assert!(f.click(300.0, 300.0, Button::Secondary).is_empty());
		assert_eq!(f.click(30.0, 30.0, Button::Secondary), vec![Effect::Redraw]);
		assert!(f.store.edges().is_empty());
		assert_eq!(f.log.last().unwrap().message, "PC 1 deleted");
		assert_eq!(f.log.last().unwrap().level, LogLevel::Error);
	}

	#[test]
	fn second_click_on_source_is_a_rejected_self_link() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0);
		f.send(Event::ModeToggle { target: Mode::Link });
		f.click(30.0, 30.0, Button::Primary);
		f.click(35.0, 35.0, Button::Primary);
		assert!(f.store.edges().is_empty());
		assert!(f.interaction.link_start().is_none());
		assert_eq!(f.log.last().unwrap().message, "Cannot link device to itself");
	}

	#[test]
	fn link_clicks_on_empty_space_keep_the_source() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Pc, 30.0, 30.0);
		f.send(Event::ModeToggle { target: Mode::Link });
		f.click(30.0, 30.0, Button::Primary);
		f.click(400.0, 400.0, Button::Primary);
		assert_eq!(f.interaction.link_start(), Some(&pc(1)));
	}

	#[test]
	fn path_query_emits_a_request_only_for_devices() {
		let mut f = Fixture::new();
		f.place(DeviceKind::Server, 30.0, 30.0);
		f.send(Event::ModeToggle { target: Mode::PathQuery });
		assert!(f.click(300.0, 300.0, Button::Primary).is_empty());
		assert_eq!(
			f.click(30.0, 30.0, Button::Primary),
			vec![Effect::PathQuery(DeviceRef::new(DeviceKind::Server, 1))]
		);
		assert_eq!(f.store.devices().len(), 1);
	}
}
