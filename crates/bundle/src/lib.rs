//! Self-contained offline HTML builds.
//!
//! Given a manifest of files (an HTML entry document plus its scripts,
//! stylesheets, media, and binary assets), a build produces one HTML document
//! that runs with no network access:
//!
//! * references the entry document makes through tags are inlined,
//! * every file is also stored in a resource table inside the document,
//! * a small runtime shim answers `fetch` and
//!   `WebAssembly.instantiateStreaming` calls from that table,
//! * an optional loader UI is placed ahead of the (large) table.
//!
//! ```no_run
//! use offweb_bundle::{BuildConfig, CodecRegistry, DirSource, FileOutput, Manifest, NullSink, Pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::load("files.txt")?;
//! let pipeline = Pipeline::new(BuildConfig::default(), CodecRegistry::with_defaults());
//! let result = pipeline.run(&manifest, &DirSource::new("."), &mut FileOutput::new("offline.html"), &mut NullSink)?;
//! println!("{} resources embedded", result.embedded_keys.len());
//! # Ok(())
//! # }
//! ```
//!
//! Reference resolution uses [`offweb_matcher`] on both sides: while
//! rewriting, and inside the generated shim.

pub mod codec;
pub mod config;
pub mod content;
pub mod encode;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod mime;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod rewrite;
pub mod runtime;
pub mod vars;
pub mod verify;

pub use codec::{Codec, CodecError, CodecRegistry};
pub use config::{BuildConfig, ConfigError, ReportOptions};
pub use content::{ContentMap, DirSource, FileSource, MemorySource, SourceFile};
pub use encode::{EmbeddedEntry, EmbeddedResourceMap};
pub use error::{BuildError, BuildWarning, OrderingViolation};
pub use loader::LoaderFragment;
pub use manifest::Manifest;
pub use offweb_matcher::MatchRules;
pub use output::{FileOutput, MemoryOutput, OutputSink};
pub use pipeline::{BuildResult, Pipeline};
pub use progress::{BuildEvent, BuildStage, NullSink, ProgressSink};
#[cfg(feature = "brotli")]
pub use codec::BrotliCodec;
