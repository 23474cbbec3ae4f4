//! The embedded resource table.
//!
//! Every content-map entry is stored either as a plain base64 string or as a
//! compressed object `{ "b64", "encoding", "mime" }`. The table serializes to
//! the JSON object the runtime shim reads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::codec::{Codec, CodecError, CodecRegistry};
use crate::config::BuildConfig;
use crate::content::ContentMap;
use crate::error::BuildWarning;
use crate::mime;
use crate::progress::Reporter;

/// Extensions never compressed. Their text is normally inlined already, and
/// the runtime consumes them as text.
const UNCOMPRESSED: &[&str] = &["html", "htm", "css"];

/// One resource in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddedEntry {
	/// Base64 of the original bytes.
	Raw(String),
	/// Base64 of codec output.
	Compressed {
		/// Base64 of the compressed bytes.
		b64: String,
		/// Codec identifier.
		encoding: String,
		/// MIME type of the original resource.
		mime: String,
	},
}

/// Failure to recover original bytes from an entry.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// The stored text is not valid base64.
	#[error("invalid base64: {0}")]
	Base64(#[from] base64::DecodeError),
	/// The entry names a codec the registry does not provide.
	#[error("codec '{0}' is not available")]
	UnknownCodec(String),
	/// Decompression failed.
	#[error(transparent)]
	Codec(#[from] CodecError),
}

impl EmbeddedEntry {
	/// True for [`EmbeddedEntry::Compressed`].
	pub fn is_compressed(&self) -> bool {
		matches!(self, Self::Compressed { .. })
	}

	/// Codec of a compressed entry.
	pub fn encoding(&self) -> Option<&str> {
		match self {
			Self::Raw(_) => None,
			Self::Compressed { encoding, .. } => Some(encoding),
		}
	}

	/// The original resource bytes.
	pub fn decode(&self, codecs: &CodecRegistry) -> Result<Vec<u8>, DecodeError> {
		match self {
			Self::Raw(b64) => Ok(STANDARD.decode(b64)?),
			Self::Compressed { b64, encoding, .. } => {
				let codec = codecs.get(encoding).ok_or_else(|| DecodeError::UnknownCodec(encoding.clone()))?;
				Ok(codec.decompress(&STANDARD.decode(b64)?)?)
			}
		}
	}

	fn to_json(&self) -> Value {
		match self {
			Self::Raw(b64) => Value::String(b64.clone()),
			Self::Compressed { b64, encoding, mime } => serde_json::json!({
				"b64": b64,
				"encoding": encoding,
				"mime": mime,
			}),
		}
	}
}

/// Logical path to entry, in content-map order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddedResourceMap {
	entries: IndexMap<String, EmbeddedEntry>,
}

impl EmbeddedResourceMap {
	/// Entry for `key`.
	pub fn get(&self, key: &str) -> Option<&EmbeddedEntry> {
		self.entries.get(key)
	}

	/// Keys in table order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Entries in table order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &EmbeddedEntry)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The table as a JSON object literal, safe to place inside a `<script>`.
	///
	/// Keys keep table order and `</` is written as `<\/`.
	pub fn to_script_json(&self) -> String {
		let body: Vec<String> = self
			.entries
			.iter()
			.map(|(key, entry)| format!("{}:{}", Value::String(key.clone()), entry.to_json()))
			.collect();
		format!("{{{}}}", body.join(",")).replace("</", "<\\/")
	}

	/// Table keys as a JSON array, in table order, safe to place in a script.
	///
	/// Object key order is not reliable in JavaScript (integer-like keys sort
	/// first), so the runtime iterates this array instead.
	pub fn keys_script_json(&self) -> String {
		let keys: Vec<String> = self.entries.keys().map(|key| Value::String(key.clone()).to_string()).collect();
		format!("[{}]", keys.join(",")).replace("</", "<\\/")
	}

	/// Parses a table produced by [`Self::to_script_json`].
	pub fn from_json(input: &str) -> serde_json::Result<Self> {
		serde_json::from_str(input)
	}
}

/// True when `path` may be stored compressed.
pub fn is_compressible(path: &str) -> bool {
	mime::extension(path).is_none_or(|ext| !UNCOMPRESSED.contains(&ext.as_str()))
}

/// Encodes every content-map entry, reporting progress from 50% to 99%.
pub(crate) fn encode(
	content: &ContentMap,
	config: &BuildConfig,
	codecs: &CodecRegistry,
	reporter: &mut Reporter<'_>,
) -> EmbeddedResourceMap {
	let codec = if config.compress { codecs.get(&config.codec) } else { None };
	if config.compress && codec.is_none() {
		reporter.warn(BuildWarning::CompressionUnavailable {
			requested: config.codec.clone(),
		});
	}

	reporter.progress(50, || format!("embedding {} resources", content.len()));
	let total = content.len();
	let mut entries = IndexMap::with_capacity(total);
	for (i, (key, file)) in content.iter().enumerate() {
		let entry = match codec.filter(|_| is_compressible(key)) {
			Some(codec) => compress_entry(codec, key, file.bytes(), file.mime_type(), reporter),
			None => EmbeddedEntry::Raw(STANDARD.encode(file.bytes())),
		};
		tracing::trace!(path = %key, compressed = entry.is_compressed(), "embedded");
		entries.insert(key.to_string(), entry);

		let percent = 50 + (i + 1) * 49 / total;
		reporter.progress(percent as u8, || format!("embedded {key}"));
	}
	EmbeddedResourceMap { entries }
}

fn compress_entry(
	codec: &dyn Codec,
	key: &str,
	bytes: &[u8],
	mime: &str,
	reporter: &mut Reporter<'_>,
) -> EmbeddedEntry {
	match codec.compress(bytes) {
		Ok(packed) => {
			tracing::debug!(path = %key, codec = codec.id(), before = bytes.len(), after = packed.len(), "compressed");
			EmbeddedEntry::Compressed {
				b64: STANDARD.encode(packed),
				encoding: codec.id().to_string(),
				mime: mime.to_string(),
			}
		}
		Err(error) => {
			reporter.warn(BuildWarning::CompressionFailed {
				path: key.to_string(),
				codec: codec.id().to_string(),
				reason: error.to_string(),
			});
			EmbeddedEntry::Raw(STANDARD.encode(bytes))
		}
	}
}

#[cfg(test)]
mod tests;
