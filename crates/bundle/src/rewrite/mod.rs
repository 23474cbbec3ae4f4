//! Entry-document rewriting.
//!
//! A constrained token scanner over a known tag vocabulary, not an HTML
//! parser. Passes run in a fixed order, each over the previous pass's output:
//!
//! 1. template variables
//! 2. dynamic `buildUrl + "/name"` expressions
//! 3. external scripts
//! 4. stylesheet links
//! 5. media tags
//!
//! Every reference is resolved through the shared matcher. References that do
//! not resolve are left untouched.

mod attrs;
mod dynamic;
mod media;
mod script;
mod stylesheet;

use std::borrow::Cow;

use base64::Engine;
use offweb_matcher::MatchRules;

use crate::config::BuildConfig;
use crate::content::{ContentMap, SourceFile};
use crate::error::BuildWarning;
use crate::progress::Reporter;
use crate::vars;

pub(crate) use dynamic::DynamicUrls;

/// Counts of references each pass replaced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
	/// Expressions turned into data URIs.
	pub dynamic: usize,
	/// Script tags inlined as text or data URIs.
	pub scripts: usize,
	/// Stylesheet links replaced with style blocks.
	pub stylesheets: usize,
	/// Media attributes replaced with data URIs.
	pub media: usize,
}

pub(crate) struct HtmlRewriter<'a> {
	content: &'a ContentMap,
	config: &'a BuildConfig,
	rules: &'a MatchRules,
	dynamic: DynamicUrls,
}

impl<'a> HtmlRewriter<'a> {
	pub(crate) fn new(content: &'a ContentMap, config: &'a BuildConfig, rules: &'a MatchRules) -> Self {
		Self {
			content,
			config,
			rules,
			dynamic: DynamicUrls::new(&config.dynamic_url_vars),
		}
	}

	pub(crate) fn rewrite(&self, document: &str, reporter: &mut Reporter<'_>) -> (String, RewriteStats) {
		let mut stats = RewriteStats::default();
		let text = self.substitute(document);
		let text = self.dynamic.rewrite(self, &text, &mut stats.dynamic);
		let text = script::rewrite(self, &text, reporter, &mut stats.scripts);
		let text = stylesheet::rewrite(self, &text, reporter, &mut stats.stylesheets);
		let text = media::rewrite(self, &text, reporter, &mut stats.media);
		(text, stats)
	}

	fn substitute<'t>(&self, text: &'t str) -> Cow<'t, str> {
		vars::substitute(text, &self.config.variables)
	}

	fn resolve(&self, reference: &str) -> Option<(&'a str, &'a SourceFile)> {
		let hit = self.rules.best_match(reference, self.content.keys())?;
		Some((hit.key, self.content.get(hit.key)?))
	}

	fn resolve_basename(&self, name: &str) -> Option<(&'a str, &'a SourceFile)> {
		let hit = self.rules.resolve_basename(name, self.content.keys())?;
		Some((hit.key, self.content.get(hit.key)?))
	}

	/// Text of a resource, lossily decoded (with a warning) when not UTF-8.
	fn decode_text(&self, key: &str, file: &'a SourceFile, reporter: &mut Reporter<'_>) -> Cow<'a, str> {
		match file.as_utf8() {
			Some(text) => Cow::Borrowed(text),
			None => {
				reporter.warn(BuildWarning::NonUtf8TextFallback { path: key.to_string() });
				String::from_utf8_lossy(file.bytes())
			}
		}
	}

	fn unresolved(&self, reporter: &mut Reporter<'_>, reference: &str, context: &'static str) {
		if offweb_matcher::normalize_reference(reference).is_none() {
			return;
		}
		reporter.warn(BuildWarning::UnresolvedReference {
			reference: reference.to_string(),
			context,
		});
	}
}

/// `data:` URI for `bytes`.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
	let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
	format!("data:{mime};base64,{encoded}")
}
