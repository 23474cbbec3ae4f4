//! Build stages, events, and the caller-supplied progress sink.
//!
//! Every build owns its own [`Reporter`]; verbosity and progress emission are
//! read from the build's [`ReportOptions`] and never from shared state.

use std::fmt;

use crate::config::ReportOptions;
use crate::error::BuildWarning;

/// Pipeline stages, in the only order a build moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStage {
	/// Reading manifest entries into the content map.
	Collecting,
	/// Rewriting the entry document.
	Rewriting,
	/// Building the embedded resource map.
	Encoding,
	/// Rendering the runtime patch block.
	PatchGenerating,
	/// Assembling loader, patch, and document.
	Composing,
	/// Writing the document to the output target.
	Writing,
	/// Re-reading the output and checking marker order.
	Verifying,
	/// Terminal success state.
	Done,
	/// Terminal failure state.
	Failed,
}

impl BuildStage {
	/// The stage that follows this one on success.
	pub fn next(self) -> Option<Self> {
		use BuildStage::*;
		match self {
			Collecting => Some(Rewriting),
			Rewriting => Some(Encoding),
			Encoding => Some(PatchGenerating),
			PatchGenerating => Some(Composing),
			Composing => Some(Writing),
			Writing => Some(Verifying),
			Verifying => Some(Done),
			Done | Failed => None,
		}
	}

	/// True for [`BuildStage::Done`] and [`BuildStage::Failed`].
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Done | Self::Failed)
	}

	/// Lower-case label used in log output.
	pub fn label(self) -> &'static str {
		match self {
			Self::Collecting => "collecting",
			Self::Rewriting => "rewriting",
			Self::Encoding => "encoding",
			Self::PatchGenerating => "patch-generating",
			Self::Composing => "composing",
			Self::Writing => "writing",
			Self::Verifying => "verifying",
			Self::Done => "done",
			Self::Failed => "failed",
		}
	}
}

/// Something that happened during a build, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
	/// The pipeline entered a stage.
	Stage(BuildStage),
	/// Overall completion, non-decreasing across a build.
	Progress {
		/// Percentage in `0..=100`.
		percent: u8,
		/// Optional detail, only populated in verbose mode.
		message: Option<String>,
	},
	/// A recoverable problem.
	Warning(BuildWarning),
	/// Informational message.
	Info(String),
}

impl fmt::Display for BuildEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stage(stage) => write!(f, "[STAGE] {}", stage.label()),
			Self::Progress { percent, message: Some(message) } => write!(f, "[{percent}%] {message}"),
			Self::Progress { percent, message: None } => write!(f, "[{percent}%]"),
			Self::Warning(warning) => write!(f, "[WARN] {warning}"),
			Self::Info(message) => write!(f, "[INFO] {message}"),
		}
	}
}

/// Receives build events as they happen.
pub trait ProgressSink {
	/// Called once per event, in order.
	fn emit(&mut self, event: &BuildEvent);
}

impl<F: FnMut(&BuildEvent)> ProgressSink for F {
	fn emit(&mut self, event: &BuildEvent) {
		self(event)
	}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
	fn emit(&mut self, _event: &BuildEvent) {}
}

/// Per-build event fan-out: caller sink, tracing, and the build record.
pub(crate) struct Reporter<'s> {
	sink: &'s mut dyn ProgressSink,
	options: ReportOptions,
	stage: Option<BuildStage>,
	last_percent: u8,
	events: Vec<BuildEvent>,
	warnings: Vec<BuildWarning>,
}

impl<'s> Reporter<'s> {
	pub(crate) fn new(sink: &'s mut dyn ProgressSink, options: ReportOptions) -> Self {
		Self {
			sink,
			options,
			stage: None,
			last_percent: 0,
			events: Vec::new(),
			warnings: Vec::new(),
		}
	}

	/// Moves to `stage`. Only forward moves along [`BuildStage::next`] are
	/// valid, plus a move to [`BuildStage::Failed`] from any live stage.
	pub(crate) fn enter(&mut self, stage: BuildStage) {
		debug_assert!(
			match self.stage {
				None => stage == BuildStage::Collecting,
				Some(current) => !current.is_terminal() && (stage == BuildStage::Failed || current.next() == Some(stage)),
			},
			"invalid stage transition {:?} -> {stage:?}",
			self.stage
		);
		self.stage = Some(stage);
		tracing::info!(stage = stage.label(), "build stage");
		self.record(BuildEvent::Stage(stage));
	}

	/// Reports progress. `message` is only rendered in verbose mode.
	pub(crate) fn progress(&mut self, percent: u8, message: impl FnOnce() -> String) {
		let percent = percent.min(100).max(self.last_percent);
		self.last_percent = percent;
		if !self.options.emit_progress {
			return;
		}
		let message = self.options.verbose.then(message);
		tracing::debug!(percent, message = message.as_deref().unwrap_or(""), "build progress");
		self.record(BuildEvent::Progress { percent, message });
	}

	pub(crate) fn info(&mut self, message: impl Into<String>) {
		let message = message.into();
		tracing::info!("{message}");
		self.record(BuildEvent::Info(message));
	}

	/// Informational message that only reaches the sink in verbose mode.
	pub(crate) fn detail(&mut self, message: impl FnOnce() -> String) {
		if self.options.verbose {
			self.info(message());
		}
	}

	pub(crate) fn warn(&mut self, warning: BuildWarning) {
		tracing::warn!("{warning}");
		self.warnings.push(warning.clone());
		self.record(BuildEvent::Warning(warning));
	}

	fn record(&mut self, event: BuildEvent) {
		self.sink.emit(&event);
		self.events.push(event);
	}

	pub(crate) fn finish(self) -> (Vec<BuildEvent>, Vec<BuildWarning>) {
		(self.events, self.warnings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stages_advance_linearly() {
		let mut stage = BuildStage::Collecting;
		let mut seen = vec![stage];
		while let Some(next) = stage.next() {
			seen.push(next);
			stage = next;
		}
		assert_eq!(seen.len(), 8);
		assert_eq!(stage, BuildStage::Done);
		assert_eq!(BuildStage::Failed.next(), None);
	}

	#[test]
	fn progress_never_decreases() {
		let mut seen = Vec::new();
		let mut sink = |event: &BuildEvent| seen.push(event.clone());
		let mut reporter = Reporter::new(&mut sink, ReportOptions::default());
		reporter.progress(50, String::new);
		reporter.progress(10, String::new);
		reporter.progress(120, String::new);
		drop(reporter);
		let percents: Vec<u8> = seen
			.iter()
			.filter_map(|e| match e {
				BuildEvent::Progress { percent, .. } => Some(*percent),
				_ => None,
			})
			.collect();
		assert_eq!(percents, vec![50, 50, 100]);
	}

	#[test]
	fn quiet_options_suppress_progress_and_detail() {
		let mut sink = NullSink;
		let options = ReportOptions {
			verbose: false,
			emit_progress: false,
		};
		let mut reporter = Reporter::new(&mut sink, options);
		reporter.progress(30, || "hidden".into());
		reporter.detail(|| "hidden".into());
		reporter.warn(BuildWarning::LoaderNotFound { name: "x".into() });
		let (events, warnings) = reporter.finish();
		assert_eq!(events.len(), 1);
		assert_eq!(warnings.len(), 1);
	}

	#[test]
	fn display_matches_log_format() {
		let event = BuildEvent::Progress {
			percent: 57,
			message: Some("embedded app.js".into()),
		};
		assert_eq!(event.to_string(), "[57%] embedded app.js");
		assert_eq!(
			BuildEvent::Progress {
				percent: 100,
				message: None
			}
			.to_string(),
			"[100%]"
		);
	}
}
