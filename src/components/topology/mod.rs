mod backend;
mod component;
mod config;
mod console;
mod editor;
mod hit;
mod render;
mod state;
mod store;
mod transform;
mod types;

pub use backend::{
	Backend, BackendError, LoadOutcome, encode_save_body, parse_path_result, parse_simulation,
};
pub use component::{DEVICE_DATA_KEY, EditorHandle, TopologyCanvas};
pub use config::EditorConfig;
pub use console::{EventLog, LogEntry, LogLevel};
pub use editor::Editor;
pub use hit::hit_test;
pub use render::{Surface, render};
pub use state::{Button, DragState, Effect, Event, Interaction, Mode};
pub use store::{LinkRejection, TopologyStore};
pub use transform::{CanvasSize, ViewMode, ViewTransform};
pub use types::{
	DEFAULT_DEVICE_SIZE, Device, DeviceId, DeviceKind, DeviceRef, Edge, RawId, TopologyPayload,
	normalize_id, resolve,
};
