use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Width and height given to devices placed from the palette.
pub const DEFAULT_DEVICE_SIZE: f64 = 40.0;

/// The closed set of device kinds the palette offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DeviceKind {
	#[serde(rename = "PC")]
	Pc,
	Switch,
	Router,
	Server,
}

impl DeviceKind {
	/// All kinds, in palette order.
	pub const ALL: [DeviceKind; 4] = [
		DeviceKind::Pc,
		DeviceKind::Switch,
		DeviceKind::Router,
		DeviceKind::Server,
	];

	/// Label used on the wire, in the palette and in log messages.
	pub fn as_str(self) -> &'static str {
		match self {
			DeviceKind::Pc => "PC",
			DeviceKind::Switch => "Switch",
			DeviceKind::Router => "Router",
			DeviceKind::Server => "Server",
		}
	}

	/// Palette blurb shown when a device is selected.
	pub fn description(self) -> &'static str {
		match self {
			DeviceKind::Pc => "A user-end device that connects to the network.",
			DeviceKind::Switch => "Connects multiple devices within a LAN.",
			DeviceKind::Router => "Routes data between networks.",
			DeviceKind::Server => "Provides data or services to clients.",
		}
	}
}

impl fmt::Display for DeviceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DeviceKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		DeviceKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| format!("unknown device type `{s}`"))
	}
}

/// A device id exactly as it arrives from persisted data or the DOM.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
	/// Non-negative integer.
	Num(u64),
	/// Negative integer.
	Signed(i64),
	/// Any other JSON number, e.g. `1.0`.
	Float(f64),
	/// Any string.
	Text(String),
}

/// Canonical device id, scoped per [`DeviceKind`].
///
/// Ids issued by the editor are always numeric. Textual ids only survive
/// when persisted data carried a string that is not all decimal digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DeviceId {
	/// Issued by the editor or loaded from a non-negative integer.
	Num(u64),
	/// Kept verbatim from persisted data.
	Text(String),
}

impl DeviceId {
	/// The numeric value, if this id can feed the per-kind counter.
	pub fn as_num(&self) -> Option<u64> {
		match self {
			DeviceId::Num(n) => Some(*n),
			DeviceId::Text(_) => None,
		}
	}
}

impl fmt::Display for DeviceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeviceId::Num(n) => write!(f, "{n}"),
			DeviceId::Text(s) => f.write_str(s),
		}
	}
}

impl From<u64> for DeviceId {
	fn from(n: u64) -> Self {
		DeviceId::Num(n)
	}
}

impl<'de> Deserialize<'de> for DeviceId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		RawId::deserialize(deserializer).map(normalize_id)
	}
}

/// Strings made only of decimal digits become numeric ids; any other
/// string is kept verbatim so it still matches structurally equal ids.
/// Integral floats count as integers. Negative or fractional numbers keep
/// their printed form as a textual id.
pub fn normalize_id(raw: RawId) -> DeviceId {
	match raw {
		RawId::Num(n) => DeviceId::Num(n),
		RawId::Signed(n) => DeviceId::Text(n.to_string()),
		RawId::Float(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => {
			DeviceId::Num(v as u64)
		}
		RawId::Float(v) => DeviceId::Text(v.to_string()),
		RawId::Text(s) => {
			let digits = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
			match s.parse::<u64>() {
				Ok(n) if digits => DeviceId::Num(n),
				_ => DeviceId::Text(s),
			}
		}
	}
}

/// The `(type, id)` pair that identifies a device.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceRef {
	/// Device type.
	#[serde(rename = "Type")]
	pub kind: DeviceKind,
	/// Id, unique within `kind`.
	#[serde(rename = "Id")]
	pub id: DeviceId,
}

impl DeviceRef {
	/// Pairs a kind with anything convertible to an id.
	pub fn new(kind: DeviceKind, id: impl Into<DeviceId>) -> Self {
		Self {
			kind,
			id: id.into(),
		}
	}

	/// Key the shortest-path service expects, e.g. `Router_3`.
	pub fn query_key(&self) -> String {
		format!("{}_{}", self.kind, self.id)
	}
}

impl fmt::Display for DeviceRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.kind, self.id)
	}
}

/// A placed device, in topology coordinates. `x, y` is the top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
	/// Device type.
	#[serde(rename = "Type")]
	pub kind: DeviceKind,
	/// Id, unique within `kind`.
	#[serde(rename = "Id")]
	pub id: DeviceId,
	/// Left edge.
	#[serde(rename = "X", default, deserialize_with = "lenient_number")]
	pub x: f64,
	/// Top edge.
	#[serde(rename = "Y", default, deserialize_with = "lenient_number")]
	pub y: f64,
	/// Bounding box width.
	#[serde(rename = "Width", default = "default_size", deserialize_with = "device_size")]
	pub width: f64,
	/// Bounding box height.
	#[serde(rename = "Height", default = "default_size", deserialize_with = "device_size")]
	pub height: f64,
}

impl Device {
	/// The identity of this device.
	pub fn reference(&self) -> DeviceRef {
		DeviceRef {
			kind: self.kind,
			id: self.id.clone(),
		}
	}

	/// True when this device has the given identity.
	pub fn is(&self, kind: DeviceKind, id: &DeviceId) -> bool {
		self.kind == kind && &self.id == id
	}

	/// Midpoint of the bounding box, where links attach.
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Inclusive bounds check in topology coordinates.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
	}
}

/// A link between two devices. Undirected for identity, but stored in
/// creation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// Device clicked first.
	pub from: DeviceRef,
	/// Device clicked second.
	pub to: DeviceRef,
}

impl Edge {
	/// True when either end is `device`.
	pub fn touches(&self, device: &DeviceRef) -> bool {
		&self.from == device || &self.to == device
	}

	/// True when both edges join the same unordered pair.
	pub fn same_pair(&self, a: &DeviceRef, b: &DeviceRef) -> bool {
		(&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
	}
}

/// The persisted `{devices, links}` document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyPayload {
	/// Devices in paint order.
	#[serde(default)]
	pub devices: Vec<Device>,
	/// Edges in creation order.
	#[serde(default)]
	pub links: Vec<Edge>,
}

/// Finds the first device matching `kind` and a raw id.
pub fn resolve(devices: &[Device], kind: DeviceKind, id: RawId) -> Option<&Device> {
	let id = normalize_id(id);
	devices.iter().find(|d| d.is(kind, &id))
}

/// Same as [`resolve`] for an already canonical reference.
pub fn resolve_ref<'a>(devices: &'a [Device], device: &DeviceRef) -> Option<&'a Device> {
	devices.iter().find(|d| d.is(device.kind, &device.id))
}

fn default_size() -> f64 {
	DEFAULT_DEVICE_SIZE
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
	Float(f64),
	Text(String),
}

impl Number {
	fn value<E: serde::de::Error>(self) -> Result<f64, E> {
		match self {
			Number::Float(v) => Ok(v),
			Number::Text(s) if s.trim().is_empty() => Ok(0.0),
			Number::Text(s) => s
				.trim()
				.parse()
				.map_err(|_| E::custom(format!("`{s}` is not a number"))),
		}
	}
}

// Null and blank strings read as 0.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
	match Option::<Number>::deserialize(deserializer)? {
		Some(n) => n.value(),
		None => Ok(0.0),
	}
}

// A null, blank or zero size falls back to the default, same as a missing one.
fn device_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
	let size = lenient_number(deserializer)?;
	Ok(if size == 0.0 { DEFAULT_DEVICE_SIZE } else { size })
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn device(kind: DeviceKind, id: u64) -> Device {
		Device {
			kind,
			id: DeviceId::Num(id),
			x: 0.0,
			y: 0.0,
			width: 40.0,
			height: 40.0,
		}
	}

	#[test]
	fn digit_strings_normalize_to_numbers() {
		assert_eq!(normalize_id(RawId::Text("42".into())), DeviceId::Num(42));
		assert_eq!(normalize_id(RawId::Num(7)), DeviceId::Num(7));
		assert_eq!(
			normalize_id(RawId::Text("4a".into())),
			DeviceId::Text("4a".into())
		);
		assert_eq!(normalize_id(RawId::Text(String::new())), DeviceId::Text(String::new()));
		assert_eq!(
			normalize_id(RawId::Text("+3".into())),
			DeviceId::Text("+3".into())
		);
	}

	#[test]
	fn resolve_accepts_string_or_number_ids() {
		let devices = vec![device(DeviceKind::Pc, 1), device(DeviceKind::Switch, 1)];
		let hit = resolve(&devices, DeviceKind::Switch, RawId::Text("1".into())).unwrap();
		assert_eq!(hit.kind, DeviceKind::Switch);
		assert!(resolve(&devices, DeviceKind::Router, RawId::Num(1)).is_none());
		assert!(resolve(&devices, DeviceKind::Pc, RawId::Num(2)).is_none());
	}

	#[test]
	fn resolve_returns_first_match_on_duplicate_identity() {
		let mut second = device(DeviceKind::Pc, 1);
		second.x = 99.0;
		let devices = vec![device(DeviceKind::Pc, 1), second];
		let hit = resolve(&devices, DeviceKind::Pc, RawId::Num(1)).unwrap();
		assert_eq!(hit.x, 0.0);
	}

	#[test]
	fn textual_ids_match_structurally() {
		let mut odd = device(DeviceKind::Server, 0);
		odd.id = DeviceId::Text("edge-1".into());
		let devices = vec![odd];
		assert!(resolve(&devices, DeviceKind::Server, RawId::Text("edge-1".into())).is_some());
	}

	#[test]
	fn device_parses_persisted_shape() {
		let d: Device = serde_json::from_value(json!({
			"Type": "Router", "Id": "3", "X": "12.5", "Y": 4
		}))
		.unwrap();
		assert_eq!(d.reference(), DeviceRef::new(DeviceKind::Router, 3));
		assert_eq!((d.x, d.y, d.width, d.height), (12.5, 4.0, 40.0, 40.0));

		let zero: Device = serde_json::from_value(json!({
			"Type": "PC", "Id": 1, "X": 0, "Y": 0, "Width": 0, "Height": 15
		}))
		.unwrap();
		assert_eq!((zero.width, zero.height), (40.0, 15.0));
	}

	#[test]
	fn numeric_ids_of_any_json_shape_load() {
		let ids: Vec<DeviceId> = serde_json::from_value(json!([1.0, 7, -1, 2.5, "3"])).unwrap();
		assert_eq!(
			ids,
			[
				DeviceId::Num(1),
				DeviceId::Num(7),
				DeviceId::Text("-1".into()),
				DeviceId::Text("2.5".into()),
				DeviceId::Num(3),
			]
		);
	}

	#[test]
	fn blank_and_null_fields_fall_back_instead_of_failing() {
		let d: Device = serde_json::from_value(json!({
			"Type": "Switch", "Id": 1.0, "X": null, "Y": "", "Width": "", "Height": null
		}))
		.unwrap();
		assert_eq!(d.reference(), DeviceRef::new(DeviceKind::Switch, 1));
		assert_eq!((d.x, d.y, d.width, d.height), (0.0, 0.0, 40.0, 40.0));

		let payload: TopologyPayload = serde_json::from_str(
			r#"{"devices": [{"Type": "PC", "Id": -1, "X": 5, "Y": 5, "Width": " "}], "links": []}"#,
		)
		.unwrap();
		assert_eq!(payload.devices[0].id.to_string(), "-1");
		assert_eq!(payload.devices[0].width, 40.0);
	}

	#[test]
	fn payload_serializes_with_persisted_field_names() {
		let payload = TopologyPayload {
			devices: vec![device(DeviceKind::Pc, 1)],
			links: vec![Edge {
				from: DeviceRef::new(DeviceKind::Pc, 1),
				to: DeviceRef::new(DeviceKind::Switch, 2),
			}],
		};
		let value = serde_json::to_value(&payload).unwrap();
		assert_eq!(
			value,
			json!({
				"devices": [{"Type": "PC", "Id": 1, "X": 0.0, "Y": 0.0, "Width": 40.0, "Height": 40.0}],
				"links": [{"from": {"Type": "PC", "Id": 1}, "to": {"Type": "Switch", "Id": 2}}]
			})
		);
	}

	#[test]
	fn edges_compare_as_unordered_pairs() {
		let a = DeviceRef::new(DeviceKind::Pc, 1);
		let b = DeviceRef::new(DeviceKind::Switch, 1);
		let edge = Edge {
			from: a.clone(),
			to: b.clone(),
		};
		assert!(edge.same_pair(&b, &a));
		assert!(edge.touches(&b));
		assert!(!edge.touches(&DeviceRef::new(DeviceKind::Pc, 2)));
	}

	#[test]
	fn kind_round_trips_through_its_label() {
		for kind in DeviceKind::ALL {
			assert_eq!(kind.as_str().parse::<DeviceKind>(), Ok(kind));
		}
		assert!("Hub".parse::<DeviceKind>().is_err());
		assert_eq!(DeviceRef::new(DeviceKind::Router, 3).query_key(), "Router_3");
	}
}
