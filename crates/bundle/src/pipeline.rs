//! Build orchestration.
//!
//! A [`Pipeline`] holds everything that parameterizes builds and no per-build
//! state, so one pipeline can run any number of builds, including from
//! several threads at once. Each [`Pipeline::run`] moves strictly forward
//! through the [`BuildStage`]s and ends in `Done` or `Failed`.

use std::borrow::Cow;

use offweb_matcher::MatchRules;

use crate::codec::CodecRegistry;
use crate::config::BuildConfig;
use crate::content::{self, ContentMap, FileSource};
use crate::encode::{self, EmbeddedResourceMap};
use crate::error::{BuildError, BuildWarning, Result};
use crate::loader;
use crate::manifest::Manifest;
use crate::output::OutputSink;
use crate::progress::{BuildEvent, BuildStage, ProgressSink, Reporter};
use crate::rewrite::{HtmlRewriter, RewriteStats};
use crate::runtime;
use crate::verify;

/// Everything a finished build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
	/// The composed document, as written.
	pub document: String,
	/// Keys of the resource table, in table order.
	pub embedded_keys: Vec<String>,
	/// The resource table.
	pub embedded: EmbeddedResourceMap,
	/// Every event delivered to the sink, in order.
	pub events: Vec<BuildEvent>,
	/// The warnings among [`Self::events`].
	pub warnings: Vec<BuildWarning>,
	/// Source of the composed loader, if one was used.
	pub loader: Option<String>,
	/// Description of the output target.
	pub output: String,
	/// Reference counts from the rewriting passes.
	pub rewrites: RewriteStats,
}

/// Runs builds with one configuration and codec set.
#[derive(Debug)]
pub struct Pipeline {
	config: BuildConfig,
	codecs: CodecRegistry,
	rules: MatchRules,
}

impl Pipeline {
	/// A pipeline for `config`, compressing with `codecs` when asked to.
	pub fn new(config: BuildConfig, codecs: CodecRegistry) -> Self {
		let rules = config.match_rules();
		Self { config, codecs, rules }
	}

	/// The configuration every build of this pipeline uses.
	pub fn config(&self) -> &BuildConfig {
		&self.config
	}

	/// Builds one document from `manifest`, reading through `source` and
	/// writing to `output`. Events go to `sink` as they happen.
	///
	/// A missing or ambiguous entry document fails before anything is
	/// written. An ordering violation fails after the document was written.
	pub fn run(
		&self,
		manifest: &Manifest,
		source: &dyn FileSource,
		output: &mut dyn OutputSink,
		sink: &mut dyn ProgressSink,
	) -> Result<BuildResult> {
		let span = tracing::info_span!("build", entry = %self.config.entry_document, files = manifest.len());
		let _guard = span.enter();
		let mut reporter = Reporter::new(sink, self.config.report);

		reporter.enter(BuildStage::Collecting);
		reporter.progress(0, || format!("collecting {} files", manifest.len()));
		let mut content = content::collect(manifest, source, &mut reporter);
		let manifest_loaders = loader::extract_loaders(&mut content, &mut reporter);
		let entry_key = match select_entry(&content, &self.config.entry_document) {
			Ok(key) => key,
			Err(error) => return Err(fail(reporter, error)),
		};
		reporter.detail(|| format!("entry document: {entry_key}"));

		reporter.enter(BuildStage::Rewriting);
		reporter.progress(10, || format!("rewriting {entry_key}"));
		let (document, rewrites) = self.rewrite_entry(&content, &entry_key, &mut reporter);

		reporter.enter(BuildStage::Encoding);
		let embedded = encode::encode(&content, &self.config, &self.codecs, &mut reporter);

		reporter.enter(BuildStage::PatchGenerating);
		let patch = runtime::render_patch(&embedded, &self.rules);

		reporter.enter(BuildStage::Composing);
		let loader = loader::discover(&self.config, &manifest_loaders, &mut reporter);
		let document = loader::compose(&document, &patch, loader.as_ref());

		reporter.enter(BuildStage::Writing);
		let target = output.describe();
		if let Err(error) = output.write_document(&document) {
			return Err(fail(reporter, BuildError::Output { target, error }));
		}
		for key in embedded.keys().filter(|key| loader::is_loader_path(key)) {
			reporter.warn(BuildWarning::LoaderLeftover { path: key.to_string() });
		}

		reporter.enter(BuildStage::Verifying);
		let written = match output.read_back() {
			Ok(written) => written,
			Err(error) => return Err(fail(reporter, BuildError::Output { target, error })),
		};
		if let Err(violation) = verify::verify_ordering(&written, loader.is_some()) {
			return Err(fail(reporter, BuildError::OrderingViolation { target, violation }));
		}

		reporter.enter(BuildStage::Done);
		reporter.progress(100, || format!("wrote {target}"));
		reporter.info(format!(
			"built {target}: {} bytes, {} embedded resources",
			document.len(),
			embedded.len()
		));

		let (events, warnings) = reporter.finish();
		Ok(BuildResult {
			document,
			embedded_keys: embedded.keys().map(str::to_string).collect(),
			embedded,
			events,
			warnings,
			loader: loader.map(|l| l.source),
			output: target,
			rewrites,
		})
	}

	fn rewrite_entry(&self, content: &ContentMap, entry_key: &str, reporter: &mut Reporter<'_>) -> (String, RewriteStats) {
		let text = match content.get(entry_key) {
			Some(file) => match file.as_utf8() {
				Some(text) => Cow::Borrowed(text),
				None => {
					reporter.warn(BuildWarning::NonUtf8TextFallback {
						path: entry_key.to_string(),
					});
					String::from_utf8_lossy(file.bytes())
				}
			},
			None => Cow::Borrowed(""),
		};
		let (document, stats) = HtmlRewriter::new(content, &self.config, &self.rules).rewrite(&text, reporter);
		reporter.detail(|| {
			format!(
				"inlined {} scripts, {} stylesheets, {} media references, {} dynamic URLs",
				stats.scripts, stats.stylesheets, stats.media, stats.dynamic
			)
		});
		(document, stats)
	}
}

/// The single content-map key whose basename matches `name`, ignoring case.
fn select_entry(content: &ContentMap, name: &str) -> Result<String> {
	let mut candidates: Vec<String> = content
		.keys()
		.filter(|key| offweb_matcher::basename(&key.replace('\\', "/")).eq_ignore_ascii_case(name))
		.map(str::to_string)
		.collect();
	match candidates.len() {
		0 => Err(BuildError::MissingEntryDocument { name: name.to_string() }),
		1 => Ok(candidates.remove(0)),
		_ => Err(BuildError::AmbiguousEntryDocument {
			name: name.to_string(),
			candidates,
		}),
	}
}

fn fail(mut reporter: Reporter<'_>, error: BuildError) -> BuildError {
	tracing::error!(%error, "build failed");
	reporter.enter(BuildStage::Failed);
	error
}
