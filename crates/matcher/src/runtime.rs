use crate::MatchRules;

const TEMPLATE: &str = include_str!("runtime.js");

/// Name of the generated JavaScript entry point.
///
/// Called as `offwebBestMatch(reference, keys[, rules])`; returns the winning
/// key or `null`.
pub const RUNTIME_BEST_MATCH_FN: &str = "offwebBestMatch";

/// JavaScript source for the matcher, with `rules` baked in.
///
/// The source only declares functions and one constant, touches no DOM, and
/// can be evaluated in any ECMAScript 2015 environment.
pub fn runtime_source(rules: &MatchRules) -> String {
	TEMPLATE.replace("__MATCH_RULES__", &rules.to_js_literal())
}
