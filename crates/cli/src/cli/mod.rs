//! Command-line argument parsing.
//!
//! Flags override values from the optional `--config` file. Loader injection
//! is on unless the file or `--no-loader` turns it off.

use std::path::{Path, PathBuf};

use clap::Parser;
use offweb_bundle::config::parse_variable;
use offweb_bundle::{BuildConfig, BuildEvent, ConfigError};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "offweb")]
#[command(about = "Bundle a web build into one self-contained offline HTML file")]
#[command(version)]
pub struct Args {
	/// Manifest listing the files to bundle, one relative path per line
	#[arg(short, long, value_name = "PATH", default_value = "files.txt")]
	pub manifest: PathBuf,

	/// Directory the manifest paths are relative to (defaults to the manifest's directory)
	#[arg(short, long, value_name = "DIR")]
	pub root: Option<PathBuf>,

	/// Where to write the bundled document
	#[arg(short, long, value_name = "PATH", default_value = "offline.html")]
	pub output: PathBuf,

	/// TOML build configuration
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Template variable, substituted into {{ KEY }} placeholders (repeatable)
	#[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
	pub vars: Vec<(String, String)>,

	/// Do not compose a loader ahead of the resource table
	#[arg(long)]
	pub no_loader: bool,

	/// Loader to compose (defaults to "basic")
	#[arg(long, value_name = "NAME")]
	pub loader: Option<String>,

	/// Extra directory searched for <NAME>/index.html loaders (repeatable)
	#[arg(long = "loader-dir", value_name = "DIR")]
	pub loader_dirs: Vec<PathBuf>,

	/// Keep or generate ids on inlined stylesheets
	#[arg(long)]
	pub embed_css: bool,

	/// Compress embedded resources
	#[arg(long)]
	pub compress: bool,

	/// Per-resource progress detail and debug logging
	#[arg(short, long, conflicts_with = "quiet")]
	pub verbose: bool,

	/// Only report warnings and errors
	#[arg(short, long)]
	pub quiet: bool,

	/// Write logs to this file instead of the terminal
	#[arg(long, value_name = "PATH")]
	pub log_file: Option<PathBuf>,
}

impl Args {
	/// Directory manifest paths resolve against.
	pub fn source_root(&self) -> PathBuf {
		if let Some(root) = &self.root {
			return root.clone();
		}
		match self.manifest.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		}
	}

	/// The configuration file, if any, with flags applied on top.
	pub fn build_config(&self) -> Result<BuildConfig, ConfigError> {
		let mut config = match &self.config {
			Some(path) => load_config(path)?,
			None => BuildConfig {
				inject_loader: true,
				..BuildConfig::default()
			},
		};

		config.variables.extend(self.vars.iter().cloned());
		if self.no_loader {
			config.inject_loader = false;
		}
		if let Some(name) = &self.loader {
			config.selected_loader = Some(name.clone());
		}
		config.loader_dirs.extend(self.loader_dirs.iter().cloned());
		config.embed_css_direct |= self.embed_css;
		config.compress |= self.compress;
		if self.verbose {
			config.report.verbose = true;
		}
		if self.quiet {
			config.report.verbose = false;
			config.report.emit_progress = false;
		}
		Ok(config)
	}

	/// How build events are echoed to the terminal.
	pub fn echo(&self) -> Echo {
		match (self.quiet, self.log_file.is_some()) {
			(true, true) => Echo::Warnings,
			(true, false) => Echo::Silent,
			(false, true) => Echo::All,
			(false, false) => Echo::Progress,
		}
	}
}

/// Reads a TOML config file. A file that does not mention `inject_loader`
/// keeps the command-line default of composing a loader.
fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
	let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	let mut config = BuildConfig::from_toml_str(&text)?;
	let table: toml::Table = toml::from_str(&text)?;
	if !table.contains_key("inject_loader") {
		config.inject_loader = true;
	}
	Ok(config)
}

/// Which build events the terminal sees.
///
/// Stage changes, info, and warnings are also logged through `tracing`; when
/// that goes to the terminal only progress lines are echoed on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
	/// Every event.
	All,
	/// Progress lines only.
	Progress,
	/// Warnings only.
	Warnings,
	/// Nothing.
	Silent,
}

impl Echo {
	/// Whether `event` is printed.
	pub fn shows(self, event: &BuildEvent) -> bool {
		match self {
			Self::All => true,
			Self::Progress => matches!(event, BuildEvent::Progress { .. }),
			Self::Warnings => matches!(event, BuildEvent::Warning(_)),
			Self::Silent => false,
		}
	}
}
