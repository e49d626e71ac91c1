use super::types::DEFAULT_DEVICE_SIZE;

const FALLBACK_API_URL: &str = "http://localhost:8080";

/// Settings shared by the editor, the renderer and the backend client.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// Base URL of the diagram service, without trailing slash.
	pub api_base: String,
	/// Total pixels kept free on each axis by the fit-to-content view.
	pub padding: f64,
	/// Size of devices dropped from the palette.
	pub default_size: f64,
	/// Minimum gap between a label and the canvas bottom in the edit view.
	pub label_margin: f64,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			api_base: option_env!("TOPOLOGY_API_URL")
				.unwrap_or(FALLBACK_API_URL)
				.trim_end_matches('/')
				.to_string(),
			padding: 40.0,
			default_size: DEFAULT_DEVICE_SIZE,
			label_margin: 5.0,
		}
	}
}

impl EditorConfig {
	/// Points the backend client at another diagram service.
	pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
		self.api_base = base.into().trim_end_matches('/').to_string();
		self
	}

	/// Joins `path` onto the API base.
	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.api_base, path.trim_start_matches('/'))
	}
}
