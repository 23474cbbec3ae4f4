/// Scoring constants and build-output markers shared by both matcher renditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
	/// Score for an exact path match.
	pub exact: u32,
	/// Score when one path is a `/`-bounded suffix of the other.
	pub suffix: u32,
	/// Score when only the basenames agree.
	pub basename: u32,
	/// Added to candidates below one of [`Self::build_dirs`].
	///
	/// Must stay below the gap between tiers so it only breaks ties.
	pub build_bonus: u32,
	/// Directory segments conventionally used for build output.
	pub build_dirs: Vec<String>,
}

impl Default for MatchRules {
	fn default() -> Self {
		Self {
			exact: 40,
			suffix: 30,
			basename: 10,
			build_bonus: 5,
			build_dirs: vec!["Build".to_string(), "TemplateData".to_string()],
		}
	}
}

impl MatchRules {
	/// Replaces the build-output directory markers.
	pub fn with_build_dirs<I, S>(mut self, dirs: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.build_dirs = dirs.into_iter().map(Into::into).collect();
		self
	}

	/// Returns true when any directory segment of `key` is a build-output marker.
	///
	/// `key` is expected to be normalized already. The final segment is the file
	/// name and never counts.
	pub fn is_build_output(&self, key: &str) -> bool {
		let Some((dir, _)) = key.rsplit_once('/') else {
			return false;
		};
		dir.split('/').any(|seg| self.build_dirs.iter().any(|marker| marker == seg))
	}

	/// Renders the rules as a JavaScript object literal.
	pub fn to_js_literal(&self) -> String {
		serde_json::json!({
			"exact": self.exact,
			"suffix": self.suffix,
			"basename": self.basename,
			"buildBonus": self.build_bonus,
			"buildDirs": self.build_dirs,
		})
		.to_string()
	}
}
