//! Post-write ordering check.
//!
//! The loader has to reach the browser before the resource table, or users
//! stare at a blank page while megabytes of base64 are parsed. The verifier
//! runs on the bytes read back from the output target.

use crate::error::OrderingViolation;
use crate::loader::{self, PREFIX_START};
use crate::runtime::TABLE_MARKER;

/// Checks marker order in a written document.
///
/// With `loader_injected`, the loader start marker must exist and come before
/// the table marker. Without it, no loader marker may appear at all.
pub fn verify_ordering(document: &str, loader_injected: bool) -> Result<(), OrderingViolation> {
	let table = document.find(TABLE_MARKER).ok_or(OrderingViolation::TableMarkerMissing)?;
	if !loader_injected {
		if loader::MARKERS.iter().any(|marker| document.contains(marker)) {
			return Err(OrderingViolation::UnexpectedLoaderMarker);
		}
		return Ok(());
	}
	let loader = document.find(PREFIX_START).ok_or(OrderingViolation::LoaderMarkerMissing)?;
	if loader > table {
		return Err(OrderingViolation::LoaderAfterTable { loader, table });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loader_before_table_passes() {
		let doc = format!("{PREFIX_START}<div/><script>{TABLE_MARKER}</script>");
		assert_eq!(verify_ordering(&doc, true), Ok(()));
	}

	#[test]
	fn loader_after_table_fails() {
		let doc = format!("<script>{TABLE_MARKER}</script>{PREFIX_START}");
		assert_eq!(
			verify_ordering(&doc, true),
			Err(OrderingViolation::LoaderAfterTable {
				loader: 8 + TABLE_MARKER.len() + 9,
				table: 8,
			})
		);
	}

	#[test]
	fn missing_markers() {
		assert_eq!(
			verify_ordering(&format!("<script>{TABLE_MARKER}</script>"), true),
			Err(OrderingViolation::LoaderMarkerMissing)
		);
		assert_eq!(verify_ordering(PREFIX_START, true), Err(OrderingViolation::TableMarkerMissing));
		assert_eq!(verify_ordering("<html></html>", false), Err(OrderingViolation::TableMarkerMissing));
	}

	#[test]
	fn loader_markers_without_loader_fail() {
		let doc = format!("{}<script>{TABLE_MARKER}</script>", loader::RAW_END);
		assert_eq!(verify_ordering(&doc, false), Err(OrderingViolation::UnexpectedLoaderMarker));
		assert_eq!(verify_ordering(&format!("<script>{TABLE_MARKER}</script>"), false), Ok(()));
	}
}
