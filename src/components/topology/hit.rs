use super::types::Device;

/// First device in list order whose rectangle contains the point, edges
/// included. `x, y` must already be in topology coordinates.
///
/// List order decides overlaps, not paint order. A device with a negative
/// size never matches.
pub fn hit_test(devices: &[Device], x: f64, y: f64) -> Option<&Device> {
	devices.iter().find(|d| d.contains(x, y))
}
