//! `<script src="...">` inlining.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{HtmlRewriter, attrs, data_uri};
use crate::progress::Reporter;

static EXTERNAL_SCRIPT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)<script\b([^>]*)>\s*</script\s*>").expect("script pattern is valid"));

static CLOSING_SCRIPT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("closing script pattern is valid"));

/// Attributes that only make sense for a fetched script.
const FETCH_ONLY: &[&str] = &["src", "defer", "async", "integrity", "crossorigin"];

/// Replaces empty script tags whose `src` resolves with the script inline.
///
/// Text scripts get template variables and dynamic URLs applied before
/// inlining. Scripts that are not UTF-8 keep an embedded data URI instead.
pub(super) fn rewrite(rw: &HtmlRewriter<'_>, text: &str, reporter: &mut Reporter<'_>, count: &mut usize) -> String {
	EXTERNAL_SCRIPT
		.replace_all(text, |caps: &Captures<'_>| {
			let attr_text = &caps[1];
			let parsed = attrs::parse(attr_text);
			let Some(src) = attrs::value(&parsed, "src") else {
				return caps[0].to_string();
			};
			let Some((key, file)) = rw.resolve(src) else {
				rw.unresolved(reporter, src, "script");
				return caps[0].to_string();
			};
			*count += 1;
			match file.as_utf8() {
				Some(body) => {
					let body = rw.substitute(body);
					let mut dynamic = 0;
					let body = rw.dynamic.rewrite(rw, &body, &mut dynamic);
					reporter.detail(|| format!("inlined script {key}"));
					format!(
						"<script{}>\n{}\n</script>",
						attrs::render_without(attr_text, &parsed, FETCH_ONLY),
						escape_script_text(&body)
					)
				}
				None => {
					reporter.detail(|| format!("embedded binary script {key}"));
					format!(
						"<script{} src=\"{}\"></script>",
						attrs::render_without(attr_text, &parsed, &["src"]),
						data_uri("application/javascript", file.bytes())
					)
				}
			}
		})
		.into_owned()
}

/// Keeps inline script text from closing its own element early.
pub(crate) fn escape_script_text(text: &str) -> String {
	CLOSING_SCRIPT.replace_all(text, r"<\/$1").into_owned()
}
