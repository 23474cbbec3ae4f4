//! Pluggable compression codecs for resource-table entries.
//!
//! The registry is queried for availability before use. A missing codec
//! degrades the build to uncompressed embedding instead of failing it.

use std::fmt;
use std::io;

use thiserror::Error;

/// Identifier of the brotli codec, as written into table entries.
pub const BROTLI: &str = "br";

/// A codec failure for one payload.
#[derive(Debug, Error)]
pub enum CodecError {
	/// The codec's stream reported an I/O error.
	#[error("{codec} stream error: {error}")]
	Io {
		/// Codec identifier.
		codec: String,
		/// The underlying error.
		error: io::Error,
	},
	/// The codec is registered but cannot be used in this build.
	#[error("codec '{0}' is unavailable")]
	Unavailable(String),
}

/// A named compression algorithm.
pub trait Codec: Send + Sync {
	/// Identifier written into compressed entries (`"br"`).
	fn id(&self) -> &str;

	/// Whether the codec can be used right now.
	fn is_available(&self) -> bool {
		true
	}

	/// Compresses `data`.
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

	/// Inverse of [`Codec::compress`].
	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Codecs known to a pipeline, looked up by identifier.
#[derive(Default)]
pub struct CodecRegistry {
	codecs: Vec<Box<dyn Codec>>,
}

impl fmt::Debug for CodecRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.codecs.iter().map(|c| c.id())).finish()
	}
}

impl CodecRegistry {
	/// A registry with no codecs; every compression request degrades to raw.
	pub fn empty() -> Self {
		Self::default()
	}

	/// A registry holding the codecs enabled at compile time.
	pub fn with_defaults() -> Self {
		#[allow(unused_mut)]
		let mut registry = Self::empty();
		#[cfg(feature = "brotli")]
		registry.register(BrotliCodec::default());
		registry
	}

	/// Adds a codec. A later codec with the same id shadows earlier ones.
	pub fn register(&mut self, codec: impl Codec + 'static) {
		self.codecs.insert(0, Box::new(codec));
	}

	/// Codec `id` if it is registered and available.
	pub fn get(&self, id: &str) -> Option<&dyn Codec> {
		self.codecs
			.iter()
			.find(|c| c.id() == id)
			.filter(|c| c.is_available())
			.map(|c| &**c)
	}

	/// Registered identifiers, most recently registered first.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.codecs.iter().map(|c| c.id())
	}
}

/// Brotli via the `brotli` crate.
#[cfg(feature = "brotli")]
#[derive(Debug, Clone, Copy)]
pub struct BrotliCodec {
	/// Compression quality, 0 to 11.
	pub quality: u32,
	/// Log2 of the sliding window size.
	pub lgwin: u32,
}

#[cfg(feature = "brotli")]
impl Default for BrotliCodec {
	fn default() -> Self {
		Self { quality: 9, lgwin: 22 }
	}
}

#[cfg(feature = "brotli")]
impl BrotliCodec {
	const BUFFER: usize = 4096;

	fn io_error(error: io::Error) -> CodecError {
		CodecError::Io {
			codec: BROTLI.to_string(),
			error,
		}
	}
}

#[cfg(feature = "brotli")]
impl Codec for BrotliCodec {
	fn id(&self) -> &str {
		BROTLI
	}

	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
		use std::io::Write;

		let mut out = Vec::with_capacity(data.len() / 2);
		{
			let mut writer = brotli::CompressorWriter::new(&mut out, Self::BUFFER, self.quality, self.lgwin);
			writer.write_all(data).map_err(Self::io_error)?;
			writer.flush().map_err(Self::io_error)?;
		}
		Ok(out)
	}

	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
		use std::io::Read;

		let mut out = Vec::new();
		brotli::Decompressor::new(data, Self::BUFFER)
			.read_to_end(&mut out)
			.map_err(Self::io_error)?;
		Ok(out)
	}
}
