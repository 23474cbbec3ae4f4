//! Media-tag `src`/`poster` references.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{HtmlRewriter, attrs, data_uri};
use crate::mime;
use crate::progress::Reporter;

static MEDIA_TAG: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)<(img|image|source|video|audio)\b([^>]*)>").expect("media pattern is valid")
});

/// Attributes that carry a resource URL on media tags.
const URL_ATTRS: &[&str] = &["src", "poster", "href", "xlink:href"];

/// Inlines media references that resolve to an image, audio, or video file.
/// All other attribute text is preserved byte for byte.
pub(super) fn rewrite(rw: &HtmlRewriter<'_>, text: &str, reporter: &mut Reporter<'_>, count: &mut usize) -> String {
	MEDIA_TAG
		.replace_all(text, |caps: &Captures<'_>| {
			let attr_text = &caps[2];
			let parsed = attrs::parse(attr_text);
			let mut edits = Vec::new();
			for attr in &parsed {
				if !URL_ATTRS.iter().any(|name| attr.name.eq_ignore_ascii_case(name)) {
					continue;
				}
				let (Some(value), Some(span)) = (attr.value, attr.value_span.clone()) else {
					continue;
				};
				match rw.resolve(value) {
					Some((key, file)) if mime::is_media(key) => {
						reporter.detail(|| format!("inlined media {key}"));
						edits.push((span, format!("\"{}\"", data_uri(file.mime_type(), file.bytes()))));
					}
					Some(_) => {}
					None => rw.unresolved(reporter, value, "media"),
				}
			}
			if edits.is_empty() {
				return caps[0].to_string();
			}
			*count += edits.len();
			format!("<{}{}>", &caps[1], attrs::replace_values(attr_text, edits))
		})
		.into_owned()
}
