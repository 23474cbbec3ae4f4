//! `{{ NAME }}` template-variable substitution for text assets.

use std::borrow::Cow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("placeholder pattern is valid"));

/// Replaces placeholders naming a configured variable with its value.
///
/// Placeholders for unknown names are left exactly as written. Substituted
/// values are not rescanned.
pub fn substitute<'t>(text: &'t str, variables: &IndexMap<String, String>) -> Cow<'t, str> {
	if variables.is_empty() {
		return Cow::Borrowed(text);
	}
	PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| match variables.get(&caps[1]) {
		Some(value) => value.clone(),
		None => caps[0].to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vars(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
		pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
	}

	#[test]
	fn replaces_known_and_keeps_unknown() {
		let variables = vars(&[("PRODUCT_NAME", "Sample"), ("VERSION", "1.2")]);
		let out = substitute("<title>{{ PRODUCT_NAME }} v{{VERSION}} {{ UNKNOWN }}</title>", &variables);
		assert_eq!(out, "<title>Sample v1.2 {{ UNKNOWN }}</title>");
	}

	#[test]
	fn values_are_literal() {
		let variables = vars(&[("A", "{{ B }}"), ("B", "$1")]);
		assert_eq!(substitute("{{ A }}|{{ B }}", &variables), "{{ B }}|$1");
	}

	#[test]
	fn borrows_without_variables() {
		let out = substitute("{{ A }}", &IndexMap::new());
		assert!(matches!(out, Cow::Borrowed(_)));
	}
}
