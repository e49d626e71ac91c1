use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::EditorConfig;
use super::transform::{CanvasSize, ViewMode, ViewTransform};
use super::types::{Device, DeviceKind, Edge, resolve_ref};

const LINK_COLOR: &str = "#88c";
const LINK_WIDTH: f64 = 3.0;
const LABEL_FONT: &str = "12px monospace";
const LABEL_GAP: f64 = 12.0;

/// The drawing primitives the renderer needs. Implemented for the browser
/// 2d context; tests record calls instead.
pub trait Surface {
	/// Erases the whole canvas.
	fn clear(&mut self, size: CanvasSize);
	/// Applies `t` to everything drawn until the matching `pop_transform`.
	fn push_transform(&mut self, t: &ViewTransform);
	/// Restores the transform active before the last `push_transform`.
	fn pop_transform(&mut self);
	/// Strokes a straight line.
	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
	/// Fills an axis-aligned rectangle.
	fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
	/// Fills a circle of radius `r` around `(cx, cy)`.
	fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: &str);
	/// Draws `text` with its baseline starting at `(x, y)`.
	fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, size: CanvasSize) {
		self.clear_rect(0.0, 0.0, size.width, size.height);
	}

	fn push_transform(&mut self, t: &ViewTransform) {
		self.save();
		let _ = self.translate(t.x, t.y);
		let _ = self.scale(t.k, t.k);
	}

	fn pop_transform(&mut self) {
		self.restore();
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.stroke();
	}

	fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: &str) {
		self.set_fill_style_str(color);
		self.begin_path();
		let _ = self.arc(cx, cy, r.abs(), 0.0, 2.0 * PI);
		self.fill();
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) {
		self.set_fill_style_str(color);
		self.set_font(font);
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}
}

/// Clears the canvas and draws links, then each device icon followed by its
/// label. In preview mode nothing is drawn when the content has no area.
pub fn render<S: Surface + ?Sized>(
	surface: &mut S,
	size: CanvasSize,
	devices: &[Device],
	edges: &[Edge],
	mode: ViewMode,
	config: &EditorConfig,
) {
	surface.clear(size);
	let Some(transform) = mode.transform(devices, size, config.padding) else {
		return;
	};

	surface.push_transform(&transform);
	draw_edges(surface, devices, edges);
	for device in devices {
		draw_icon(surface, device);
		draw_label(surface, device, size, mode, config);
	}
	surface.pop_transform();
}

fn draw_edges<S: Surface + ?Sized>(surface: &mut S, devices: &[Device], edges: &[Edge]) {
	for edge in edges {
		let (Some(from), Some(to)) = (resolve_ref(devices, &edge.from), resolve_ref(devices, &edge.to))
		else {
			continue;
		};
		surface.line(from.center(), to.center(), LINK_COLOR, LINK_WIDTH);
	}
}

fn draw_icon<S: Surface + ?Sized>(surface: &mut S, device: &Device) {
	match device.kind {
		DeviceKind::Pc => draw_pc(surface, device),
		DeviceKind::Switch => draw_switch(surface, device),
		DeviceKind::Router => draw_router(surface, device),
		DeviceKind::Server => draw_server(surface, device),
	}
}

// Monitor with a stand underneath.
fn draw_pc<S: Surface + ?Sized>(surface: &mut S, d: &Device) {
	surface.fill_rect(d.x, d.y, d.width, d.height - 10.0, "lightblue");
	surface.fill_rect(d.x + 10.0, d.y + d.height - 10.0, d.width - 20.0, 10.0, "gray");
}

fn draw_switch<S: Surface + ?Sized>(surface: &mut S, d: &Device) {
	surface.fill_rect(d.x, d.y, d.width, d.height, "orange");
	let mut port = 5.0;
	while port < d.width {
		surface.fill_rect(d.x + port, d.y + d.height / 2.0 - 2.0, 4.0, 4.0, "black");
		port += 10.0;
	}
}

fn draw_router<S: Surface + ?Sized>(surface: &mut S, d: &Device) {
	let (cx, cy) = d.center();
	surface.fill_circle(cx, cy, d.width / 2.0, "green");
	surface.fill_text("R", cx - 4.0, cy + 4.0, "bold 12px monospace", "white");
}

fn draw_server<S: Surface + ?Sized>(surface: &mut S, d: &Device) {
	surface.fill_rect(d.x, d.y, d.width, d.height, "purple");
	surface.fill_text("SV", d.x + 5.0, d.y + d.height / 2.0 + 4.0, "bold 11px monospace", "white");
}

fn draw_label<S: Surface + ?Sized>(
	surface: &mut S,
	d: &Device,
	size: CanvasSize,
	mode: ViewMode,
	config: &EditorConfig,
) {
	let below = d.y + d.height + LABEL_GAP;
	let (y, color) = match mode {
		ViewMode::Edit => (below.min(size.height - config.label_margin), "black"),
		ViewMode::Preview => (below, "white"),
	};
	let label = format!("{} {}", d.kind, d.id);
	surface.fill_text(&label, d.x, y, LABEL_FONT, color);
}
