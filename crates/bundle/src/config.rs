//! Build configuration.
//!
//! A [`BuildConfig`] is passed explicitly into every build. Nothing in the
//! pipeline reads process-wide state, so concurrent builds with different
//! settings never observe each other.
//!
//! Configuration can be loaded from a TOML file:
//!
//! ```toml
//! entry_document = "index.html"
//! compress = true
//! inject_loader = true
//! selected_loader = "basic"
//! loader_dirs = ["loaders"]
//!
//! [variables]
//! PRODUCT_NAME = "Sample"
//!
//! [report]
//! verbose = true
//! ```
//!
//! or from the settings object posted by the web front-end (see
//! [`BuildConfig::from_settings_json`]).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use offweb_matcher::MatchRules;
use serde::Deserialize;
use thiserror::Error;


/// Name of the loader used when none is selected.
pub const DEFAULT_LOADER: &str = "basic";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or structure.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error parsing a JSON settings payload.
	#[error("settings parse error: {0}")]
	Json(#[from] serde_json::Error),

	/// A `KEY=VALUE` assignment was malformed.
	#[error("invalid variable assignment '{0}' (expected KEY=VALUE)")]
	InvalidVariable(String),
}

/// Per-build reporting switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
	/// Emit per-resource detail messages.
	pub verbose: bool,
	/// Emit percentage progress events.
	pub emit_progress: bool,
}

impl Default for ReportOptions {
	fn default() -> Self {
		Self {
			verbose: false,
			emit_progress: true,
		}
	}
}

/// Everything that parameterizes one build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
	/// Template variables substituted into `{{ NAME }}` placeholders.
	pub variables: IndexMap<String, String>,
	/// Basename of the entry document (compared case-insensitively).
	pub entry_document: String,
	/// Compose a loading UI ahead of the resource table.
	pub inject_loader: bool,
	/// Loader to use; falls back to [`DEFAULT_LOADER`].
	pub selected_loader: Option<String>,
	/// Directories searched for `<name>/index.html` loader fragments.
	pub loader_dirs: Vec<PathBuf>,
	/// Keep or generate an `id` on inlined stylesheets.
	pub embed_css_direct: bool,
	/// Compress resource-table entries where the type allows it.
	pub compress: bool,
	/// Codec identifier used when compressing.
	pub codec: String,
	/// Directory segments treated as build output by the matcher.
	pub build_dirs: Vec<String>,
	/// Base-URL variables recognized in `var + "/name"` expressions.
	pub dynamic_url_vars: Vec<String>,
	/// Verbosity and progress switches.
	pub report: ReportOptions,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			variables: IndexMap::new(),
			entry_document: "index.html".to_string(),
			inject_loader: false,
			selected_loader: None,
			loader_dirs: Vec::new(),
			embed_css_direct: false,
			compress: false,
			codec: "br".to_string(),
			build_dirs: MatchRules::default().build_dirs,
			dynamic_url_vars: vec!["buildUrl".to_string()],
			report: ReportOptions::default(),
		}
	}
}

/// Shape of the settings object the web front-end posts with a build.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsPayload {
	verbose: bool,
	emit_progress: Option<bool>,
	embed_css: bool,
	compress: bool,
	inject_loader: Option<bool>,
	selected_loader: Option<String>,
	variables: IndexMap<String, String>,
}

impl BuildConfig {
	/// Parses a TOML configuration document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Loads configuration from a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&content)
	}

	/// Builds a configuration from the front-end's JSON settings object.
	///
	/// Unknown fields (`clean_temp`, `auto_open`, ...) belong to the front-end
	/// and are ignored. Loader injection defaults to on, as in the front-end.
	pub fn from_settings_json(input: &str) -> Result<Self, ConfigError> {
		let settings: SettingsPayload = serde_json::from_str(input)?;
		Ok(Self {
			variables: settings.variables,
			inject_loader: settings.inject_loader.unwrap_or(true),
			selected_loader: settings.selected_loader.filter(|s| !s.is_empty()),
			embed_css_direct: settings.embed_css,
			compress: settings.compress,
			report: ReportOptions {
				verbose: settings.verbose,
				emit_progress: settings.emit_progress.unwrap_or(true),
			},
			..Self::default()
		})
	}

	/// Matcher rules for this build.
	pub fn match_rules(&self) -> MatchRules {
		MatchRules::default().with_build_dirs(self.build_dirs.iter().cloned())
	}

	/// The loader name to look for.
	pub fn loader_name(&self) -> &str {
		self.selected_loader.as_deref().unwrap_or(DEFAULT_LOADER)
	}
}

/// Parses a `KEY=VALUE` variable assignment.
pub fn parse_variable(assignment: &str) -> Result<(String, String), ConfigError> {
	match assignment.split_once('=') {
		Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
		_ => Err(ConfigError::InvalidVariable(assignment.to_string())),
	}
}
