//! Fatal build errors and non-fatal build warnings.
//!
//! Structural problems abort a build and surface as [`BuildError`]. Problems
//! with a single resource degrade gracefully: they are reported as
//! [`BuildWarning`]s and the build carries on.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a build.
#[derive(Debug, Error)]
pub enum BuildError {
	/// No manifest entry has the entry-document basename. Nothing is written.
	#[error("entry document '{name}' not found in manifest")]
	MissingEntryDocument {
		/// The configured entry-document basename.
		name: String,
	},

	/// More than one manifest entry has the entry-document basename.
	#[error("entry document '{name}' is ambiguous: {}", candidates.join(", "))]
	AmbiguousEntryDocument {
		/// The configured entry-document basename.
		name: String,
		/// Every matching manifest path, in manifest order.
		candidates: Vec<String>,
	},

	/// The manifest file could not be read.
	#[error("failed to read manifest {path}: {error}")]
	Manifest {
		/// Manifest location.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Writing or re-reading the output document failed.
	#[error("output {target}: {error}")]
	Output {
		/// Human-readable description of the output target.
		target: String,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The written document breaks the loader ordering invariant.
	///
	/// The document already exists at the output target when this is raised.
	#[error("ordering verification failed after writing {target}: {violation}")]
	OrderingViolation {
		/// Human-readable description of the output target.
		target: String,
		/// What the verifier found.
		violation: OrderingViolation,
	},
}

impl BuildError {
	/// True when an output document was written before the failure.
	pub fn artifact_written(&self) -> bool {
		matches!(self, Self::OrderingViolation { .. })
	}
}

/// Specific ordering problems detected by the output verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingViolation {
	/// A loader was composed but its start marker is absent.
	#[error("loader was injected but the loader start marker is missing")]
	LoaderMarkerMissing,
	/// The loader start marker follows the resource table.
	#[error("loader marker at byte {loader} follows the resource table at byte {table}")]
	LoaderAfterTable {
		/// Byte offset of the loader start marker.
		loader: usize,
		/// Byte offset of the resource-table marker.
		table: usize,
	},
	/// Loader markers are present although no loader was composed.
	#[error("loader markers present although no loader was injected")]
	UnexpectedLoaderMarker,
	/// The resource-table marker is absent.
	#[error("resource table marker is missing")]
	TableMarkerMissing,
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Non-fatal problems encountered during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
	/// A manifest entry could not be read; it is omitted from the build.
	UnreadableResource {
		/// Manifest path.
		path: String,
		/// Rendered I/O error.
		reason: String,
	},
	/// Text was not valid UTF-8 and was decoded lossily.
	NonUtf8TextFallback {
		/// Content-map key of the text resource.
		path: String,
	},
	/// Compression was requested but no usable codec exists.
	///
	/// Reported once; the rest of the build embeds raw bytes.
	CompressionUnavailable {
		/// The codec identifier that was asked for.
		requested: String,
	},
	/// Compressing one resource failed; that resource is embedded raw.
	CompressionFailed {
		/// Content-map key.
		path: String,
		/// Codec identifier.
		codec: String,
		/// Rendered codec error.
		reason: String,
	},
	/// No head/body regions were found in the loader, so it is used whole.
	LoaderExtractionFallback {
		/// Where the loader came from.
		source: String,
	},
	/// A named loader could not be located.
	LoaderNotFound {
		/// The requested loader name.
		name: String,
	},
	/// A loader file is still present in the resource table.
	LoaderLeftover {
		/// Content-map key.
		path: String,
	},
	/// A tag reference could not be resolved and was left untouched.
	UnresolvedReference {
		/// The reference as written in the document.
		reference: String,
		/// Which rewriting pass saw it (`script`, `stylesheet`, `media`, ...).
		context: &'static str,
	},
}

impl std::fmt::Display for BuildWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnreadableResource { path, reason } => {
				write!(f, "could not read '{path}': {reason}")
			}
			Self::NonUtf8TextFallback { path } => {
				write!(f, "'{path}' is not valid UTF-8; decoded with replacement characters")
			}
			Self::CompressionUnavailable { requested } => write!(
				f,
				"compression requested but codec '{requested}' is unavailable; embedding uncompressed"
			),
			Self::CompressionFailed { path, codec, reason } => {
				write!(f, "{codec} compression of '{path}' failed ({reason}); embedding raw")
			}
			Self::LoaderExtractionFallback { source } => {
				write!(f, "no head/body regions in loader {source}; using raw markup")
			}
			Self::LoaderNotFound { name } => write!(f, "loader '{name}' not found"),
			Self::LoaderLeftover { path } => {
				write!(f, "loader file '{path}' is still embedded in the resource table")
			}
			Self::UnresolvedReference { reference, context } => {
				write!(f, "unresolved {context} reference '{reference}' left as-is")
			}
		}
	}
}
