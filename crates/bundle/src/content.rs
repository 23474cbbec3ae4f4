//! Source files and the per-build content map.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::BuildWarning;
use crate::manifest::Manifest;
use crate::mime;
use crate::progress::Reporter;

/// Where the collector reads raw bytes from.
pub trait FileSource {
	/// Reads the full contents of a manifest path.
	fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads manifest paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
	root: PathBuf,
}

impl DirSource {
	/// A source rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

impl FileSource for DirSource {
	/// Paths with a `..` segment are refused so reads stay below the root.
	fn read(&self, path: &str) -> io::Result<Vec<u8>> {
		let relative = path.replace('\\', "/");
		let segments: Vec<&str> = relative.split('/').filter(|seg| !seg.is_empty() && *seg != ".").collect();
		if segments.contains(&"..") {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				format!("'{path}' leaves the source root"),
			));
		}
		let mut full = self.root.clone();
		full.extend(segments);
		std::fs::read(full)
	}
}

/// In-memory file set, for uploads that never touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
	/// An empty source.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a file.
	pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
		self.files.insert(path.into(), bytes.into());
	}

	/// Builder-style [`Self::insert`].
	pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		self.insert(path, bytes);
		self
	}

	/// A manifest listing every file, sorted by path.
	pub fn manifest(&self) -> Manifest {
		let mut paths: Vec<&String> = self.files.keys().collect();
		paths.sort();
		paths.into_iter().cloned().collect()
	}
}

impl FileSource for MemorySource {
	fn read(&self, path: &str) -> io::Result<Vec<u8>> {
		self.files
			.get(path)
			.cloned()
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not in upload")))
	}
}

/// One loaded input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	path: String,
	bytes: Vec<u8>,
}

impl SourceFile {
	/// Wraps loaded bytes. Backslashes in `path` become forward slashes.
	pub fn new(path: &str, bytes: Vec<u8>) -> Self {
		Self {
			path: path.replace('\\', "/"),
			bytes,
		}
	}

	/// Forward-slash normalized path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Raw contents.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// MIME type derived from the extension.
	pub fn mime_type(&self) -> &'static str {
		mime::for_path(&self.path)
	}

	/// Contents as text when they are valid UTF-8.
	pub fn as_utf8(&self) -> Option<&str> {
		std::str::from_utf8(&self.bytes).ok()
	}
}

/// Logical path to source file, in manifest order.
///
/// Keys keep the manifest's spelling. Iteration order is the order entries
/// were inserted, which keeps builds and matcher tie-breaks deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMap {
	files: IndexMap<String, SourceFile>,
}

impl ContentMap {
	/// An empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a file unless the key is already present.
	///
	/// Returns false for duplicates; the first occurrence wins.
	pub fn insert(&mut self, key: impl Into<String>, bytes: Vec<u8>) -> bool {
		match self.files.entry(key.into()) {
			Entry::Occupied(_) => false,
			Entry::Vacant(slot) => {
				let file = SourceFile::new(slot.key(), bytes);
				slot.insert(file);
				true
			}
		}
	}

	/// Looks up a key exactly.
	pub fn get(&self, key: &str) -> Option<&SourceFile> {
		self.files.get(key)
	}

	/// Removes a key, keeping the order of the remaining entries.
	pub fn remove(&mut self, key: &str) -> Option<SourceFile> {
		self.files.shift_remove(key)
	}

	/// Keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.files.keys().map(String::as_str)
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceFile)> {
		self.files.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// True when empty.
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Keeps only the entries for which `keep` returns true.
	pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
		self.files.retain(|key, _| keep(key));
	}
}

impl<K: Into<String>, B: Into<Vec<u8>>> FromIterator<(K, B)> for ContentMap {
	fn from_iter<T: IntoIterator<Item = (K, B)>>(iter: T) -> Self {
		let mut map = Self::new();
		for (key, bytes) in iter {
			map.insert(key, bytes.into());
		}
		map
	}
}

/// Loads every manifest path from `source`.
///
/// Unreadable entries are reported and skipped; references to them stay
/// unresolved later on.
pub(crate) fn collect(manifest: &Manifest, source: &dyn FileSource, reporter: &mut Reporter<'_>) -> ContentMap {
	let mut map = ContentMap::new();
	for path in manifest.paths() {
		match source.read(path) {
			Ok(bytes) => {
				if !map.insert(path.as_str(), bytes) {
					tracing::debug!(path = %path, "duplicate manifest entry ignored");
				}
			}
			Err(error) => reporter.warn(BuildWarning::UnreadableResource {
				path: path.clone(),
				reason: error.to_string(),
			}),
		}
	}
	reporter.detail(|| format!("loaded {} of {} listed files", map.len(), manifest.len()));
	map
}
