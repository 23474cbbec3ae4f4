//! Loader UI fragments: discovery, extraction, and composition.
//!
//! A loader is a small HTML page shown while the browser parses the (large)
//! resource table. Its markup is lifted out of its own document and placed in
//! front of the runtime patch, between comment markers the verifier looks for.
//!
//! Loaders are found, in order:
//!
//! 1. the selected loader in the manifest, under `loaders/<name>/index.html`
//!    or `src/loaders/<name>/index.html`
//! 2. the selected loader in a configured loader directory
//!    (`<dir>/<name>/index.html`)
//! 3. the first loader in the manifest
//! 4. `<dir>/basic/index.html` in a configured loader directory
//! 5. the built-in `basic` loader
//!
//! A selected loader other than `basic` that is not found at steps 1 or 2
//! is reported as a warning.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{BuildConfig, DEFAULT_LOADER};
use crate::content::ContentMap;
use crate::error::BuildWarning;
use crate::progress::Reporter;

/// Opens the composed prefix.
pub const PREFIX_START: &str = "<!-- OFFWEB LOADER PREFIX START -->";
/// Closes the composed prefix.
pub const PREFIX_END: &str = "<!-- OFFWEB LOADER PREFIX END -->";
/// Opens the wrapped loader body.
pub const BODY_START: &str = "<!-- OFFWEB LOADER BODY START -->";
/// Closes the wrapped loader body.
pub const BODY_END: &str = "<!-- OFFWEB LOADER BODY END -->";
/// Opens a loader used without extraction.
pub const RAW_START: &str = "<!-- OFFWEB LOADER RAW START -->";
/// Closes a loader used without extraction.
pub const RAW_END: &str = "<!-- OFFWEB LOADER RAW END -->";

/// Every loader marker, in composition order.
pub const MARKERS: [&str; 6] = [PREFIX_START, BODY_START, BODY_END, RAW_START, RAW_END, PREFIX_END];

/// `id` of the element wrapping the loader body.
pub const WRAPPER_ID: &str = "offweb-loader-wrapper";

const BUILTIN_BASIC: &str = include_str!("../assets/basic_loader.html");

static LOADER_INDEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)(?:^|/)((?:src/)?loaders/([^/]+)/)index\.html$").expect("loader path pattern is valid")
});

static HEAD: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>(.*?)</head\s*>").expect("head pattern is valid"));

static BODY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").expect("body pattern is valid"));

static HEAD_OPEN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").expect("head open pattern is valid"));

static DOCTYPE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^\s*<!doctype[^>]*>").expect("doctype pattern is valid"));

/// A loader page split into the parts that get composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderFragment {
	/// Where the loader came from (manifest key, file path, or `built-in`).
	pub source: String,
	/// Loader name (its directory name).
	pub name: String,
	/// Inner text of `<head>`, if any.
	pub head: Option<String>,
	/// Inner text of `<body>`, if any.
	pub body: Option<String>,
	/// The complete loader markup.
	pub raw: String,
}

impl LoaderFragment {
	/// Splits `markup` into head and body regions.
	pub fn parse(name: impl Into<String>, source: impl Into<String>, markup: impl Into<String>) -> Self {
		let raw = markup.into();
		let inner = |re: &Regex| re.captures(&raw).map(|caps| caps[1].to_string());
		Self {
			head: inner(&HEAD),
			body: inner(&BODY),
			name: name.into(),
			source: source.into(),
			raw,
		}
	}

	/// The loader shipped with the crate.
	pub fn builtin() -> Self {
		Self::parse(DEFAULT_LOADER, "built-in", BUILTIN_BASIC)
	}

	/// True when the body region was found.
	pub fn is_extracted(&self) -> bool {
		self.body.is_some()
	}

	/// Opening marker plus the loader markup; the patch and closing marker follow.
	fn render_open(&self) -> String {
		let mut out = String::from(PREFIX_START);
		match &self.body {
			Some(body) => {
				if let Some(head) = &self.head {
					out.push('\n');
					out.push_str(head);
				}
				out.push_str(&format!("\n{BODY_START}\n<div id=\"{WRAPPER_ID}\">{body}</div>\n{BODY_END}"));
			}
			None => out.push_str(&format!("\n{RAW_START}\n{}\n{RAW_END}", self.raw)),
		}
		out
	}
}

/// A loader page found in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLoader {
	/// Content-map key of the loader's `index.html`.
	pub key: String,
	/// Loader name.
	pub name: String,
	/// Loader markup.
	pub markup: String,
}

impl ManifestLoader {
	fn fragment(&self) -> LoaderFragment {
		LoaderFragment::parse(&self.name, &self.key, self.markup.clone())
	}
}

/// If `path` is a loader page, its directory prefix and loader name.
pub fn loader_index(path: &str) -> Option<(String, String)> {
	let normalized = path.replace('\\', "/");
	let caps = LOADER_INDEX.captures(&normalized)?;
	let dir_end = caps.get(1)?.end();
	Some((normalized[..dir_end].to_string(), caps[2].to_string()))
}

/// Removes every loader directory from `content` and returns the loader pages
/// it held, in manifest order.
pub(crate) fn extract_loaders(content: &mut ContentMap, reporter: &mut Reporter<'_>) -> Vec<ManifestLoader> {
	let mut dirs = Vec::new();
	let mut loaders = Vec::new();
	for (key, file) in content.iter() {
		let Some((dir, name)) = loader_index(key) else {
			continue;
		};
		let markup = match file.as_utf8() {
			Some(text) => text.to_string(),
			None => {
				reporter.warn(BuildWarning::NonUtf8TextFallback { path: key.to_string() });
				String::from_utf8_lossy(file.bytes()).into_owned()
			}
		};
		loaders.push(ManifestLoader {
			key: key.to_string(),
			name,
			markup,
		});
		dirs.push(dir);
	}
	if !dirs.is_empty() {
		let before = content.len();
		content.retain(|key| {
			let normalized = key.replace('\\', "/");
			!dirs.iter().any(|dir| normalized.starts_with(dir.as_str()))
		});
		tracing::debug!(removed = before - content.len(), "loader files excluded from the build");
	}
	loaders
}

/// Finds the loader to compose, or `None` when loaders are disabled.
pub(crate) fn discover(
	config: &BuildConfig,
	manifest_loaders: &[ManifestLoader],
	reporter: &mut Reporter<'_>,
) -> Option<LoaderFragment> {
	if !config.inject_loader {
		return None;
	}
	let wanted = config.loader_name();
	let named = !wanted.eq_ignore_ascii_case(DEFAULT_LOADER);

	let exact = manifest_loaders.iter().find(|l| l.name.eq_ignore_ascii_case(wanted));
	let mut fragment = exact
		.map(ManifestLoader::fragment)
		.or_else(|| config.loader_dirs.iter().find_map(|dir| read_loader(dir, wanted)));
	if fragment.is_none() {
		if named {
			reporter.warn(BuildWarning::LoaderNotFound { name: wanted.to_string() });
		}
		fragment = manifest_loaders.first().map(ManifestLoader::fragment);
	}
	if fragment.is_none() && named {
		fragment = config.loader_dirs.iter().find_map(|dir| read_loader(dir, DEFAULT_LOADER));
	}

	let fragment = fragment.unwrap_or_else(LoaderFragment::builtin);
	if !fragment.is_extracted() {
		reporter.warn(BuildWarning::LoaderExtractionFallback {
			source: fragment.source.clone(),
		});
	}
	reporter.info(format!("using loader '{}' from {}", fragment.name, fragment.source));
	Some(fragment)
}

fn read_loader(dir: &Path, name: &str) -> Option<LoaderFragment> {
	let path = dir.join(name).join("index.html");
	match std::fs::read(&path) {
		Ok(bytes) => {
			let markup = String::from_utf8_lossy(&bytes).into_owned();
			Some(LoaderFragment::parse(name, path.display().to_string(), markup))
		}
		Err(error) if error.kind() == io::ErrorKind::NotFound => None,
		Err(error) => {
			tracing::debug!(path = %path.display(), %error, "loader unreadable");
			None
		}
	}
}

/// Places the loader (if any) and the runtime patch in front of `document`.
///
/// With a loader, a marker-delimited prefix holding the loader markup and then
/// the patch goes right after any leading doctype. Without one, the patch goes
/// right after the first `<head>` tag, or at the very start.
pub fn compose(document: &str, patch: &str, loader: Option<&LoaderFragment>) -> String {
	match loader {
		Some(loader) => {
			let prefix = format!("{}\n{patch}\n{PREFIX_END}", loader.render_open());
			let at = DOCTYPE.find(document).map_or(0, |m| m.end());
			let (doctype, rest) = document.split_at(at);
			let separator = if doctype.is_empty() { "" } else { "\n" };
			format!("{doctype}{separator}{prefix}\n{rest}")
		}
		None => match HEAD_OPEN.find(document) {
			Some(m) => format!("{}{patch}{}", &document[..m.end()], &document[m.end()..]),
			None => format!("{patch}{document}"),
		},
	}
}

/// True when `key` sits under a `loaders/` directory.
pub fn is_loader_path(key: &str) -> bool {
	let normalized = key.replace('\\', "/").to_ascii_lowercase();
	normalized.starts_with("loaders/") || normalized.contains("/loaders/")
}
