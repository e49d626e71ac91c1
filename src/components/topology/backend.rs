//! HTTP collaborators of the editor: loading and saving a simulation and
//! asking the diagram service for shortest paths.

use js_sys::Promise;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use super::config::EditorConfig;
use super::types::{DeviceRef, TopologyPayload};

/// Why a request to the diagram service failed.
#[derive(Debug, Error)]
pub enum BackendError {
	/// The request never got an answer.
	#[error("{0}")]
	Transport(String),
	/// The service answered with a non-2xx status.
	#[error("HTTP {status}{}", detail(.body))]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response text, possibly empty.
		body: String,
	},
	/// The answer was not the expected JSON.
	#[error("invalid response: {0}")]
	Decode(#[from] serde_json::Error),
	/// Valid JSON without the expected content.
	#[error("malformed response: {0}")]
	Malformed(String),
}

fn detail(body: &str) -> String {
	if body.is_empty() {
		String::new()
	} else {
		format!(": {body}")
	}
}

impl From<JsValue> for BackendError {
	fn from(value: JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				value
					.dyn_ref::<js_sys::Error>()
					.map(|e| String::from(e.message()))
			})
			.unwrap_or_else(|| format!("{value:?}"));
		BackendError::Transport(message)
	}
}

/// What a load request found on the server.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
	/// Saved topology found.
	Loaded {
		/// Simulation title, shown above the canvas.
		name: Option<String>,
		/// The saved topology.
		payload: TopologyPayload,
	},
	/// The service answered without a simulation record.
	NotFound,
	/// The simulation exists but nothing was saved yet.
	Empty,
}

#[derive(Deserialize)]
struct Envelope<T> {
	data: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulationRecord {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	data_json: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody {
	data_json: String,
}

/// Decodes the answer to `GET diagrams/{id}`.
pub fn parse_simulation(body: &str) -> Result<LoadOutcome, BackendError> {
	let envelope: Envelope<SimulationRecord> = serde_json::from_str(body)?;
	let Some(record) = envelope.data else {
		return Ok(LoadOutcome::NotFound);
	};
	match record.data_json.as_deref() {
		None | Some("") => Ok(LoadOutcome::Empty),
		Some(json) => Ok(LoadOutcome::Loaded {
			name: record.name,
			payload: serde_json::from_str(json)?,
		}),
	}
}

/// Wraps `payload` as the `dataJson` string the service stores.
pub fn encode_save_body(payload: &TopologyPayload) -> Result<String, BackendError> {
	let body = SaveBody {
		data_json: serde_json::to_string(payload)?,
	};
	Ok(serde_json::to_string(&body)?)
}

/// Returns the first entry of a `{ "data": [...] }` answer as text.
pub fn parse_path_result(body: &str) -> Result<String, BackendError> {
	let envelope: Envelope<Vec<Value>> = serde_json::from_str(body)?;
	let first = envelope
		.data
		.and_then(|entries| entries.into_iter().next())
		.ok_or_else(|| BackendError::Malformed("expected a non-empty `data` array".into()))?;
	Ok(match first {
		Value::String(s) => s,
		other => other.to_string(),
	})
}

/// Client for the diagram service.
#[derive(Clone, Debug)]
pub struct Backend {
	config: EditorConfig,
}

impl Backend {
	/// A client for `config.api_base`.
	pub fn new(config: EditorConfig) -> Self {
		Self { config }
	}

	/// Fetches a saved simulation.
	pub async fn load(&self, simulation_id: &str) -> Result<LoadOutcome, BackendError> {
		let url = self.config.url(&format!("diagrams/{simulation_id}"));
		let body = self.send("GET", &url, None).await?;
		parse_simulation(&body)
	}

	/// Replaces the saved topology of a simulation.
	pub async fn save(&self, simulation_id: &str, payload: &TopologyPayload) -> Result<(), BackendError> {
		let url = self.config.url(&format!("diagrams/{simulation_id}"));
		self.send("PUT", &url, Some(encode_save_body(payload)?)).await?;
		Ok(())
	}

	/// Deletes a simulation.
	pub async fn delete(&self, simulation_id: &str) -> Result<(), BackendError> {
		let url = self.config.url(&format!("diagrams/{simulation_id}"));
		self.send("DELETE", &url, None).await?;
		Ok(())
	}

	/// Asks for shortest paths from `device`; returns the service's text.
	pub async fn shortest_path(&self, simulation_id: &str, device: &DeviceRef) -> Result<String, BackendError> {
		let url = self
			.config
			.url(&format!("diagrams/sssp/{simulation_id}/{}", device.query_key()));
		let body = self.send("GET", &url, None).await?;
		parse_path_result(&body)
	}

	async fn send(&self, method: &str, url: &str, body: Option<String>) -> Result<String, BackendError> {
		let init = RequestInit::new();
		init.set_method(method);
		init.set_credentials(RequestCredentials::Include);
		if let Some(body) = &body {
			init.set_body(&JsValue::from_str(body));
		}
		let request = Request::new_with_str_and_init(url, &init)?;
		if body.is_some() {
			request.headers().set("Content-Type", "application/json")?;
		}

		let window = web_sys::window().ok_or_else(|| BackendError::Transport("no window".into()))?;
		let pending: Promise = window.fetch_with_request(&request);
		let response: Response = JsFuture::from(pending).await?.dyn_into()?;
		let text = JsFuture::from(response.text()?)
			.await?
			.as_string()
			.unwrap_or_default();

		if !response.ok() {
			return Err(BackendError::Status {
				status: response.status(),
				body: text,
			});
		}
		Ok(text)
	}
}
