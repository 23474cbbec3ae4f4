//! Build manifests: one relative file path per non-blank line.

use std::path::Path;

use crate::error::{BuildError, Result};

/// Ordered list of paths describing a build's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
	paths: Vec<String>,
}

impl Manifest {
	/// Parses manifest text. Lines are trimmed and blank lines skipped.
	pub fn parse(text: &str) -> Self {
		Self {
			paths: text
				.lines()
				.map(str::trim)
				.filter(|line| !line.is_empty())
				.map(str::to_string)
				.collect(),
		}
	}

	/// Reads and parses a UTF-8 manifest file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| BuildError::Manifest {
			path: path.to_path_buf(),
			error,
		})?;
		Ok(Self::parse(&text))
	}

	/// Paths in manifest order.
	pub fn paths(&self) -> &[String] {
		&self.paths
	}

	/// Number of listed paths.
	pub fn len(&self) -> usize {
		self.paths.len()
	}

	/// True when the manifest lists nothing.
	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}
}

impl<S: Into<String>> FromIterator<S> for Manifest {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self {
			paths: iter.into_iter().map(Into::into).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn skips_blank_lines_and_trims() {
		let manifest = Manifest::parse("index.html\n\n  Build/game.wasm  \r\n\t\nstyle.css");
		assert_eq!(manifest.paths(), ["index.html", "Build/game.wasm", "style.css"]);
		assert_eq!(manifest.len(), 3);
	}

	#[test]
	fn load_missing_file_is_manifest_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = Manifest::load(dir.path().join("files.txt")).unwrap_err();
		assert!(matches!(err, BuildError::Manifest { .. }));
	}
}
