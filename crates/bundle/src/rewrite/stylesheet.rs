//! `<link rel="stylesheet">` inlining and `url(...)` rewriting inside CSS.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{HtmlRewriter, attrs, data_uri};
use crate::mime;
use crate::progress::Reporter;

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<link\b([^>]*)>").expect("link pattern is valid"));

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]+))\s*\)"#).expect("css url pattern is valid")
});

/// Replaces stylesheet links that resolve to a `.css` file with a `<style>`
/// block holding the file's text.
///
/// With `embed_css_direct` the block keeps the link's `id`, or gets one
/// derived from the href.
pub(super) fn rewrite(rw: &HtmlRewriter<'_>, text: &str, reporter: &mut Reporter<'_>, count: &mut usize) -> String {
	LINK.replace_all(text, |caps: &Captures<'_>| {
		let parsed = attrs::parse(&caps[1]);
		let is_stylesheet = attrs::value(&parsed, "rel")
			.is_some_and(|rel| rel.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case("stylesheet")));
		let Some(href) = attrs::value(&parsed, "href").filter(|_| is_stylesheet) else {
			return caps[0].to_string();
		};
		let Some((key, file)) = rw.resolve(href) else {
			rw.unresolved(reporter, href, "stylesheet");
			return caps[0].to_string();
		};
		if mime::extension(key).as_deref() != Some("css") {
			rw.unresolved(reporter, href, "non-css stylesheet");
			return caps[0].to_string();
		}

		let css = rw.decode_text(key, file, reporter);
		let css = rw.substitute(&css).into_owned();
		let css = rewrite_urls(rw, key, &css);
		*count += 1;
		reporter.detail(|| format!("inlined stylesheet {key}"));

		let mut open = String::from("<style");
		if rw.config.embed_css_direct {
			let id = attrs::value(&parsed, "id").map_or_else(|| stylesheet_id(href), str::to_string);
			open.push_str(&format!(" id=\"{}\"", attrs::escape_value(&id)));
		}
		if let Some(media) = attrs::value(&parsed, "media") {
			open.push_str(&format!(" media=\"{}\"", attrs::escape_value(media)));
		}
		format!("{open}>\n{css}\n</style>")
	})
	.into_owned()
}

/// Element id for a stylesheet without one: every character outside
/// `[A-Za-z0-9_-]` becomes `_`, with a `css_` prefix before a leading digit.
pub(crate) fn stylesheet_id(href: &str) -> String {
	let normalized = href.replace('\\', "/");
	let trimmed = normalized.trim_start_matches(['.', '/']);
	let id: String = trimmed
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
		.collect();
	if id.starts_with(|c: char| c.is_ascii_digit()) { format!("css_{id}") } else { id }
}

/// Rewrites `url(...)` references to media and fonts relative to `css_key`.
fn rewrite_urls(rw: &HtmlRewriter<'_>, css_key: &str, css: &str) -> String {
	let base = css_key.rsplit_once('/').map_or("", |(dir, _)| dir);
	CSS_URL
		.replace_all(css, |caps: &Captures<'_>| {
			let Some(reference) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)).map(|m| m.as_str()) else {
				return caps[0].to_string();
			};
			if reference.starts_with('#') || reference.contains("://") || reference.starts_with("data:") {
				return caps[0].to_string();
			}
			let joined = join_relative(base, reference);
			match rw.resolve(&joined) {
				Some((key, file)) if mime::is_media(key) || mime::is_font(key) => {
					format!("url(\"{}\")", data_uri(file.mime_type(), file.bytes()))
				}
				_ => caps[0].to_string(),
			}
		})
		.into_owned()
}

/// Resolves `reference` against directory `base`, folding `.` and `..`.
/// A leading `/` makes the reference root-relative.
pub(crate) fn join_relative(base: &str, reference: &str) -> String {
	let mut parts: Vec<&str> = Vec::new();
	let reference = match reference.strip_prefix('/') {
		Some(rooted) => rooted,
		None => {
			parts.extend(base.split('/').filter(|s| !s.is_empty()));
			reference
		}
	};
	for segment in reference.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				parts.pop();
			}
			other => parts.push(other),
		}
	}
	parts.join("/")
}
