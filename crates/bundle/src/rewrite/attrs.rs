//! Attribute scanning for the narrow tag vocabulary the rewriter touches.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static ATTR: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*("([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
		.expect("attribute pattern is valid")
});

/// One attribute inside a tag's attribute text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attr<'t> {
	pub name: &'t str,
	/// Unquoted value; `None` for boolean attributes.
	pub value: Option<&'t str>,
	/// The whole `name="value"` text.
	pub span: Range<usize>,
	/// The value including its quotes.
	pub value_span: Option<Range<usize>>,
}

pub(crate) fn parse(text: &str) -> Vec<Attr<'_>> {
	ATTR.captures_iter(text)
		.filter_map(|caps| {
			let whole = caps.get(0)?;
			let name = caps.get(1)?.as_str();
			let value = caps.get(3).or_else(|| caps.get(4)).or_else(|| caps.get(5));
			Some(Attr {
				name,
				value: value.map(|m| m.as_str()),
				span: whole.range(),
				value_span: caps.get(2).map(|m| m.range()),
			})
		})
		.collect()
}

/// First attribute named `name`, compared case-insensitively.
pub(crate) fn find<'a, 't>(attrs: &'a [Attr<'t>], name: &str) -> Option<&'a Attr<'t>> {
	attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

pub(crate) fn value<'t>(attrs: &[Attr<'t>], name: &str) -> Option<&'t str> {
	find(attrs, name).and_then(|a| a.value)
}

/// Re-renders the attributes not named in `drop`, each preceded by a space.
pub(crate) fn render_without(text: &str, attrs: &[Attr<'_>], drop: &[&str]) -> String {
	attrs
		.iter()
		.filter(|a| !drop.iter().any(|d| a.name.eq_ignore_ascii_case(d)))
		.map(|a| format!(" {}", &text[a.span.clone()]))
		.collect()
}

/// Makes an unquoted value safe inside `"..."`.
pub(crate) fn escape_value(value: &str) -> Cow<'_, str> {
	if value.contains('"') { Cow::Owned(value.replace('"', "&quot;")) } else { Cow::Borrowed(value) }
}

/// Replaces value spans in `text`. Spans must not overlap.
pub(crate) fn replace_values(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
	edits.sort_by_key(|(range, _)| range.start);
	let mut out = String::with_capacity(text.len());
	let mut last = 0;
	for (range, replacement) in edits {
		out.push_str(&text[last..range.start]);
		out.push_str(&replacement);
		last = range.end;
	}
	out.push_str(&text[last..]);
	out
}
