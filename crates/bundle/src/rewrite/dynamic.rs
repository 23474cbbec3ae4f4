//! `buildUrl + "/name"` expressions that compute a resource URL at runtime.

use regex::{Captures, Regex};

use super::{HtmlRewriter, data_uri};

/// Rewrites `<var> + "/name"` into a quoted data URI of the file named `name`.
pub(crate) struct DynamicUrls {
	pattern: Option<Regex>,
}

impl DynamicUrls {
	/// Matches concatenations onto any of `vars`. No pattern when `vars` is empty.
	pub(crate) fn new(vars: &[String]) -> Self {
		let names: Vec<String> = vars.iter().filter(|v| !v.is_empty()).map(|v| regex::escape(v)).collect();
		if names.is_empty() {
			return Self { pattern: None };
		}
		let source = format!(r#"\b(?:{})\s*\+\s*["']/?([^"'/]+)["']"#, names.join("|"));
		let pattern = match Regex::new(&source) {
			Ok(pattern) => Some(pattern),
			Err(error) => {
				tracing::warn!(%error, "dynamic URL pattern rejected");
				None
			}
		};
		Self { pattern }
	}

	/// Replaces every expression whose file name resolves by basename.
	/// Unresolved expressions stay as written.
	pub(crate) fn rewrite(&self, rw: &HtmlRewriter<'_>, text: &str, count: &mut usize) -> String {
		let Some(pattern) = &self.pattern else {
			return text.to_string();
		};
		pattern
			.replace_all(text, |caps: &Captures<'_>| match rw.resolve_basename(&caps[1]) {
				Some((key, file)) => {
					tracing::debug!(name = &caps[1], key, "dynamic URL inlined");
					*count += 1;
					format!("\"{}\"", data_uri(file.mime_type(), file.bytes()))
				}
				None => caps[0].to_string(),
			})
			.into_owned()
	}
}
