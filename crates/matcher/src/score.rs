use crate::MatchRules;

/// A scored candidate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate<'k> {
	/// The candidate key exactly as it appeared in the file set.
	pub key: &'k str,
	/// Tier score plus any build-output bonus.
	pub score: u32,
}

/// Normalizes a reference or key for matching.
///
/// Drops query and fragment, converts backslashes to `/`, and strips leading
/// `./` segments. Returns `None` for empty results and for `data:`/`blob:`
/// URLs, which never name a file.
pub fn normalize_reference(reference: &str) -> Option<String> {
	if reference.starts_with("data:") || reference.starts_with("blob:") {
		return None;
	}
	let end = reference.find(['?', '#']).unwrap_or(reference.len());
	let slashed = reference[..end].replace('\\', "/");
	let mut path = slashed.as_str();
	while let Some(rest) = path.strip_prefix("./") {
		path = rest;
	}
	(!path.is_empty()).then(|| path.to_string())
}

/// Final `/`-separated segment of a normalized path.
pub fn basename(path: &str) -> &str {
	path.rsplit('/').next().unwrap_or(path)
}

/// `short` is a suffix of `long` that starts on a segment boundary.
fn is_path_suffix(long: &str, short: &str) -> bool {
	if long.len() <= short.len() || !long.ends_with(short) {
		return false;
	}
	short.starts_with('/') || long.as_bytes()[long.len() - short.len() - 1] == b'/'
}

impl MatchRules {
	/// Scores `key` against `reference`, or `None` when no tier applies.
	pub fn score(&self, reference: &str, key: &str) -> Option<u32> {
		let reference = normalize_reference(reference)?;
		self.score_normalized(&reference, key)
	}

	fn score_normalized(&self, reference: &str, key: &str) -> Option<u32> {
		let key = normalize_reference(key)?;
		let tier = if key == reference {
			self.exact
		} else if is_path_suffix(reference, &key) || is_path_suffix(&key, reference) {
			self.suffix
		} else {
			let wanted = basename(reference);
			if wanted.is_empty() || basename(&key) != wanted {
				return None;
			}
			self.basename
		};
		Some(tier + self.bonus(&key))
	}

	fn bonus(&self, normalized_key: &str) -> u32 {
		if self.is_build_output(normalized_key) { self.build_bonus } else { 0 }
	}

	/// Every key that matches `reference`, best first.
	///
	/// The sort is stable, so keys with equal scores stay in iteration order.
	pub fn candidates<'k, I>(&self, reference: &str, keys: I) -> Vec<MatchCandidate<'k>>
	where
		I: IntoIterator<Item = &'k str>,
	{
		let Some(reference) = normalize_reference(reference) else {
			return Vec::new();
		};
		let mut out: Vec<_> = keys
			.into_iter()
			.filter_map(|key| {
				self.score_normalized(&reference, key)
					.map(|score| MatchCandidate { key, score })
			})
			.collect();
		out.sort_by(|a, b| b.score.cmp(&a.score));
		out
	}

	/// The winning key for `reference`, if any candidate matches.
	pub fn best_match<'k, I>(&self, reference: &str, keys: I) -> Option<MatchCandidate<'k>>
	where
		I: IntoIterator<Item = &'k str>,
	{
		let reference = normalize_reference(reference)?;
		let mut best: Option<MatchCandidate<'k>> = None;
		for key in keys {
			let Some(score) = self.score_normalized(&reference, key) else {
				continue;
			};
			if best.is_none_or(|b| score > b.score) {
				best = Some(MatchCandidate { key, score });
			}
		}
		best
	}

	/// Resolves a bare file name using only the basename tier.
	///
	/// Used where a reference is assembled at runtime from a base URL and a
	/// literal name, so the directory part of the key is unknown. Build-output
	/// candidates still win ties.
	pub fn resolve_basename<'k, I>(&self, name: &str, keys: I) -> Option<MatchCandidate<'k>>
	where
		I: IntoIterator<Item = &'k str>,
	{
		let wanted = normalize_reference(name)?;
		let wanted = basename(&wanted);
		if wanted.is_empty() {
			return None;
		}
		let mut best: Option<MatchCandidate<'k>> = None;
		for key in keys {
			let Some(normalized) = normalize_reference(key) else {
				continue;
			};
			if basename(&normalized) != wanted {
				continue;
			}
			let score = self.basename + self.bonus(&normalized);
			if best.is_none_or(|b| score > b.score) {
				best = Some(MatchCandidate { key, score });
			}
		}
		best
	}
}
