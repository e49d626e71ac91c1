use super::types::Device;

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasSize {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl CanvasSize {
	/// A `width` by `height` canvas.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Which mapping the canvas uses between topology and pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
	/// Topology coordinates are pixel coordinates; devices can be edited.
	#[default]
	Edit,
	/// Read-only view scaled and centred to fit every device.
	Preview,
}

impl ViewMode {
	/// `None` means there is nothing to draw in this mode.
	pub fn transform(self, devices: &[Device], size: CanvasSize, padding: f64) -> Option<ViewTransform> {
		match self {
			ViewMode::Edit => Some(ViewTransform::IDENTITY),
			ViewMode::Preview => ViewTransform::fit(devices, size, padding),
		}
	}
}

/// Axis-aligned bounds of all devices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn of(devices: &[Device]) -> Option<Self> {
		devices.iter().fold(None, |acc, d| {
			let (x1, y1) = (d.x + d.width, d.y + d.height);
			Some(match acc {
				None => Bounds {
					min_x: d.x,
					min_y: d.y,
					max_x: x1,
					max_y: y1,
				},
				Some(b) => Bounds {
					min_x: b.min_x.min(d.x),
					min_y: b.min_y.min(d.y),
					max_x: b.max_x.max(x1),
					max_y: b.max_y.max(y1),
				},
			})
		})
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Uniform scale `k` followed by a translation: `screen = topology * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in pixels.
	pub x: f64,
	/// Vertical translation in pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// Draws topology coordinates as pixels unchanged.
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Fits the bounding box of `devices` into `size`, keeping `padding`
	/// pixels free in total on each axis and centring the result.
	pub fn fit(devices: &[Device], size: CanvasSize, padding: f64) -> Option<Self> {
		let bounds = Bounds::of(devices)?;
		let (content_w, content_h) = (bounds.width(), bounds.height());
		if content_w <= 0.0 || content_h <= 0.0 {
			return None;
		}

		let k = ((size.width - padding) / content_w).min((size.height - padding) / content_h);
		let (offset_x, offset_y) = (
			(size.width - content_w * k) / 2.0,
			(size.height - content_h * k) / 2.0,
		);
		Some(Self {
			x: offset_x - bounds.min_x * k,
			y: offset_y - bounds.min_y * k,
			k,
		})
	}

	/// True for the edit view's transform.
	pub fn is_identity(&self) -> bool {
		*self == Self::IDENTITY
	}

	/// Maps a topology point to canvas pixels.
	pub fn topology_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x * self.k + self.x, y * self.k + self.y)
	}

	/// Inverse of [`topology_to_screen`](Self::topology_to_screen).
	pub fn screen_to_topology(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}
