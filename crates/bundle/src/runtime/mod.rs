//! The runtime patch block placed in front of the document.
//!
//! The block is one `<script>` element. It carries the resource table and
//! wraps `fetch` and `WebAssembly.instantiateStreaming` so requests for
//! embedded files are answered from the table. Requests are resolved with the
//! JavaScript rendition of the same [`MatchRules`] the rewriter used.

use offweb_matcher::{MatchRules, runtime_source};

use crate::encode::EmbeddedResourceMap;
use crate::mime;

#[cfg(test)]
mod tests;

const TEMPLATE: &str = include_str!("shim.js");

/// Comment placed immediately before the resource table.
pub const TABLE_MARKER: &str = "/* EMBEDDED FILES MAP */";

/// Name of the JavaScript constant holding the resource table.
pub const TABLE_CONST: &str = "EMBEDDED_FILES";

/// Window property set once the shim has installed its wrappers.
pub const INSTALL_GUARD: &str = "__OFFWEB_PATCHED__";

/// Renders the patch block for `table`.
///
/// Installing the block twice in one document is harmless; the second copy
/// sees [`INSTALL_GUARD`] and does nothing.
pub fn render_patch(table: &EmbeddedResourceMap, rules: &MatchRules) -> String {
	let matcher = indent(&runtime_source(rules));
	TEMPLATE
		.replacen("__OFFWEB_MATCHER__", &matcher, 1)
		.replacen("__OFFWEB_MIME_TYPES__", &mime::js_table(), 1)
		.replacen("__OFFWEB_KEYS__", &table.keys_script_json(), 1)
		.replacen("__OFFWEB_EMBEDDED_FILES__", &table.to_script_json(), 1)
}

fn indent(source: &str) -> String {
	source
		.lines()
		.map(|line| if line.is_empty() { String::new() } else { format!("\t{line}") })
		.collect::<Vec<_>>()
		.join("\n")
}
