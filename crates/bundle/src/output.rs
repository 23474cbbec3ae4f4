//! Where a finished document goes.

use std::io;
use std::path::{Path, PathBuf};

/// Destination for the composed document.
///
/// The pipeline writes once and then reads the document back for
/// verification, so the bytes checked are the bytes the target holds.
pub trait OutputSink {
	/// Stores the document, replacing any previous content.
	fn write_document(&mut self, document: &str) -> io::Result<()>;

	/// Returns the stored document.
	fn read_back(&self) -> io::Result<String>;

	/// Human-readable name of the target, for logs and errors.
	fn describe(&self) -> String;
}

/// Writes to a file, creating parent directories as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
	path: PathBuf,
}

impl FileOutput {
	/// A sink writing to `path`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// The output file.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl OutputSink for FileOutput {
	fn write_document(&mut self, document: &str) -> io::Result<()> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&self.path, document)
	}

	fn read_back(&self) -> io::Result<String> {
		std::fs::read_to_string(&self.path)
	}

	fn describe(&self) -> String {
		self.path.display().to_string()
	}
}

/// Keeps the document in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryOutput {
	document: Option<String>,
}

impl MemoryOutput {
	/// An empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// The written document, if any.
	pub fn document(&self) -> Option<&str> {
		self.document.as_deref()
	}

	/// Consumes the sink, returning the written document.
	pub fn into_document(self) -> Option<String> {
		self.document
	}
}

impl OutputSink for MemoryOutput {
	fn write_document(&mut self, document: &str) -> io::Result<()> {
		self.document = Some(document.to_string());
		Ok(())
	}

	fn read_back(&self) -> io::Result<String> {
		self.document
			.clone()
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "nothing written"))
	}

	fn describe(&self) -> String {
		"<memory>".to_string()
	}
}
