use log::{info, warn};

/// Severity class shown next to each console line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
	/// Neutral progress or a rejected but harmless action.
	Info,
	/// A change that took effect.
	Success,
	/// A failed request or a missing prerequisite.
	Error,
}

impl LogLevel {
	/// Class name the console list styles by.
	pub fn css_class(self) -> &'static str {
		match self {
			LogLevel::Info => "info",
			LogLevel::Success => "success",
			LogLevel::Error => "error",
		}
	}
}

/// One console line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
	/// Severity class.
	pub level: LogLevel,
	/// Text exactly as shown.
	pub message: String,
}

/// Append-only, ordered record of everything the editor did. Each entry is
/// also forwarded to the `log` facade.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
	entries: Vec<LogEntry>,
}

impl EventLog {
	/// An empty log.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one entry.
	pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
		let message = message.into();
		match level {
			LogLevel::Error => warn!("{message}"),
			LogLevel::Info | LogLevel::Success => info!("{message}"),
		}
		self.entries.push(LogEntry { level, message });
	}

	/// Appends an [`LogLevel::Info`] entry.
	pub fn info(&mut self, message: impl Into<String>) {
		self.push(LogLevel::Info, message);
	}

	/// Appends a [`LogLevel::Success`] entry.
	pub fn success(&mut self, message: impl Into<String>) {
		self.push(LogLevel::Success, message);
	}

	/// Appends a [`LogLevel::Error`] entry.
	pub fn error(&mut self, message: impl Into<String>) {
		self.push(LogLevel::Error, message);
	}

	/// Drops every entry, leaving only a note that the console was cleared.
	pub fn clear(&mut self) {
		self.entries.clear();
		self.info("Console cleared");
	}

	/// All entries, oldest first.
	pub fn entries(&self) -> &[LogEntry] {
		&self.entries
	}

	/// The newest entry.
	pub fn last(&self) -> Option<&LogEntry> {
		self.entries.last()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when nothing was logged.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
