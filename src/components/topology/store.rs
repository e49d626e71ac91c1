use std::collections::HashMap;

use super::types::{
	DEFAULT_DEVICE_SIZE, Device, DeviceId, DeviceKind, DeviceRef, Edge, TopologyPayload,
	resolve_ref,
};

/// Why [`TopologyStore::add_edge`] refused a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkRejection {
	/// Both ends are the same device.
	SelfLink,
	/// The pair is already linked, in either direction.
	Duplicate,
}

/// Sole owner of the device and edge lists.
#[derive(Clone, Debug, Default)]
pub struct TopologyStore {
	devices: Vec<Device>,
	edges: Vec<Edge>,
	// Highest id ever issued per kind. Never lowered by deletes.
	issued: HashMap<DeviceKind, u64>,
}

impl TopologyStore {
	/// An empty topology.
	pub fn new() -> Self {
		Self::default()
	}

	/// Devices in insertion order, which is also paint and hit order.
	pub fn devices(&self) -> &[Device] {
		&self.devices
	}

	/// Edges in creation order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Looks up a device by identity.
	pub fn device(&self, device: &DeviceRef) -> Option<&Device> {
		resolve_ref(&self.devices, device)
	}

	pub(crate) fn device_mut(&mut self, device: &DeviceRef) -> Option<&mut Device> {
		self.devices
			.iter_mut()
			.find(|d| d.is(device.kind, &device.id))
	}

	/// Adds a default-sized device with the next free id of its kind.
	pub fn add_device(&mut self, kind: DeviceKind, x: f64, y: f64) -> &Device {
		self.add_device_sized(kind, x, y, DEFAULT_DEVICE_SIZE, DEFAULT_DEVICE_SIZE)
	}

	/// Like [`add_device`](Self::add_device) with an explicit size.
	pub fn add_device_sized(
		&mut self,
		kind: DeviceKind,
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	) -> &Device {
		let counter = self.issued.entry(kind).or_insert(0);
		*counter += 1;
		let id = DeviceId::Num(*counter);
		self.devices.push(Device {
			kind,
			id,
			x,
			y,
			width,
			height,
		});
		&self.devices[self.devices.len() - 1]
	}

	/// Removes the device and every edge touching it. Returns whether a
	/// device was actually removed.
	pub fn remove_device(&mut self, device: &DeviceRef) -> bool {
		let before = self.devices.len();
		self.devices.retain(|d| !d.is(device.kind, &device.id));
		self.edges.retain(|e| !e.touches(device));
		self.devices.len() != before
	}

	/// Moves the top-left corner. Returns false for an unknown device.
	pub fn move_device(&mut self, device: &DeviceRef, x: f64, y: f64) -> bool {
		match self.device_mut(device) {
			Some(d) => {
				d.x = x;
				d.y = y;
				true
			}
			None => false,
		}
	}

	/// True when `a` and `b` are linked in either direction.
	pub fn has_edge(&self, a: &DeviceRef, b: &DeviceRef) -> bool {
		self.edges.iter().any(|e| e.same_pair(a, b))
	}

	/// Links two devices unless that would be a self-link or a duplicate.
	pub fn add_edge(&mut self, from: DeviceRef, to: DeviceRef) -> Result<&Edge, LinkRejection> {
		if from == to {
			return Err(LinkRejection::SelfLink);
		}
		if self.has_edge(&from, &to) {
			return Err(LinkRejection::Duplicate);
		}
		self.edges.push(Edge { from, to });
		Ok(&self.edges[self.edges.len() - 1])
	}

	/// Replaces both lists and reseeds the per-kind id counters from the
	/// loaded devices.
	pub fn load(&mut self, payload: TopologyPayload) {
		self.devices = payload.devices;
		self.edges = payload.links;
		self.issued.clear();
		for device in &self.devices {
			if let Some(n) = device.id.as_num() {
				let counter = self.issued.entry(device.kind).or_insert(0);
				*counter = (*counter).max(n);
			}
		}
	}

	/// Snapshot of both lists in the persisted shape.
	pub fn payload(&self) -> TopologyPayload {
		TopologyPayload {
			devices: self.devices.clone(),
			links: self.edges.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn pc(id: u64) -> DeviceRef {
		DeviceRef::new(DeviceKind::Pc, id)
	}

	fn switch(id: u64) -> DeviceRef {
		DeviceRef::new(DeviceKind::Switch, id)
	}

	#[test]
	fn ids_increase_per_kind_and_are_not_reused() {
		let mut store = TopologyStore::new();
		let first = store.add_device(DeviceKind::Pc, 0.0, 0.0).reference();
		let second = store.add_device(DeviceKind::Pc, 50.0, 0.0).reference();
		let other = store.add_device(DeviceKind::Router, 0.0, 50.0).reference();
		assert_eq!(first, pc(1));
		assert_eq!(second, pc(2));
		assert_eq!(other, DeviceRef::new(DeviceKind::Router, 1));

		assert!(store.remove_device(&second));
		let third = store.add_device(DeviceKind::Pc, 0.0, 0.0).reference();
		assert_eq!(third, pc(3));
	}

	#[test]
	fn reversed_duplicate_and_self_links_are_rejected() {
		let mut store = TopologyStore::new();
		store.add_device(DeviceKind::Pc, 0.0, 0.0);
		store.add_device(DeviceKind::Switch, 0.0, 0.0);

		assert!(store.add_edge(pc(1), switch(1)).is_ok());
		assert_eq!(store.add_edge(switch(1), pc(1)), Err(LinkRejection::Duplicate));
		assert_eq!(store.add_edge(pc(1), pc(1)), Err(LinkRejection::SelfLink));
		assert_eq!(store.edges().len(), 1);
		assert_eq!(store.edges()[0].from, pc(1));
	}

	#[test]
	fn self_link_rejected_even_when_device_missing() {
		let mut store = TopologyStore::new();
		assert_eq!(store.add_edge(pc(9), pc(9)), Err(LinkRejection::SelfLink));
	}

	#[test]
	fn remove_cascades_exactly_to_touching_edges() {
		let mut store = TopologyStore::new();
		store.add_device(DeviceKind::Pc, 0.0, 0.0);
		store.add_device(DeviceKind::Pc, 0.0, 0.0);
		store.add_device(DeviceKind::Switch, 0.0, 0.0);
		store.add_edge(pc(1), switch(1)).unwrap();
		store.add_edge(pc(2), switch(1)).unwrap();
		store.add_edge(pc(1), pc(2)).unwrap();

		store.remove_device(&pc(1));
		assert_eq!(
			store.edges(),
			&[Edge {
				from: pc(2),
				to: switch(1)
			}]
		);
		assert!(store.device(&pc(1)).is_none());
	}

	#[test]
	fn removing_missing_device_is_a_no_op() {
		let mut store = TopologyStore::new();
		store.add_device(DeviceKind::Pc, 0.0, 0.0);
		assert!(!store.remove_device(&switch(4)));
		assert_eq!(store.devices().len(), 1);
	}

	#[test]
	fn move_allows_off_canvas_positions() {
		let mut store = TopologyStore::new();
		store.add_device(DeviceKind::Server, 0.0, 0.0);
		let server = DeviceRef::new(DeviceKind::Server, 1);
		assert!(store.move_device(&server, -120.0, 5000.0));
		let d = store.device(&server).unwrap();
		assert_eq!((d.x, d.y), (-120.0, 5000.0));
	}

	#[test]
	fn load_normalizes_ids_and_reads_back_equal() {
		let payload: TopologyPayload = serde_json::from_value(json!({
			"devices": [
				{"Type": "PC", "Id": "1", "X": 10, "Y": 10},
				{"Type": "Switch", "Id": 4, "X": 100, "Y": 10, "Width": 60, "Height": 30}
			],
			"links": [{"from": {"Type": "PC", "Id": 1}, "to": {"Type": "Switch", "Id": "4"}}]
		}))
		.unwrap();

		let mut store = TopologyStore::new();
		store.load(payload.clone());
		assert_eq!(store.payload(), payload);
		assert_eq!(store.edges()[0].to, switch(4));
		assert_eq!(store.device(&switch(4)).unwrap().width, 60.0);

		let next = store.add_device(DeviceKind::Switch, 0.0, 0.0).reference();
		assert_eq!(next, switch(5));
	}

	#[test]
	fn load_without_links_starts_with_no_edges() {
		let payload: TopologyPayload = serde_json::from_value(json!({
			"devices": [{"Type": "Router", "Id": 2, "X": 0, "Y": 0}]
		}))
		.unwrap();
		let mut store = TopologyStore::new();
		store.load(payload);
		assert!(store.edges().is_empty());
		assert_eq!(store.devices().len(), 1);
	}
}
