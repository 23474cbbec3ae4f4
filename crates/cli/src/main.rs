//! `offweb`: bundles a web build into one offline HTML document.

mod cli;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use offweb_bundle::{BuildError, BuildEvent, CodecRegistry, DirSource, FileOutput, Manifest, Pipeline};
use tracing::info;

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose, args.quiet, args.log_file.as_deref())?;

	let config = args.build_config().context("loading build configuration")?;
	let manifest = Manifest::load(&args.manifest)?;
	let root = args.source_root();
	info!(
		manifest = %args.manifest.display(),
		root = %root.display(),
		output = %args.output.display(),
		"starting offweb build"
	);

	let pipeline = Pipeline::new(config, CodecRegistry::with_defaults());
	let echo = args.echo();
	let mut sink = |event: &BuildEvent| {
		if echo.shows(event) {
			eprintln!("{event}");
		}
	};
	let mut output = FileOutput::new(&args.output);

	match pipeline.run(&manifest, &DirSource::new(root), &mut output, &mut sink) {
		Ok(result) => {
			if !args.quiet {
				println!(
					"wrote {} ({} bytes, {} embedded resources, {} warnings)",
					result.output,
					result.document.len(),
					result.embedded_keys.len(),
					result.warnings.len()
				);
			}
			Ok(())
		}
		Err(error @ BuildError::OrderingViolation { .. }) => {
			eprintln!(
				"{} was written but failed verification; do not ship it",
				output.path().display()
			);
			Err(error.into())
		}
		Err(error) => Err(error.into()),
	}
}

fn setup_tracing(verbose: bool, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(match (verbose, quiet) {
			(true, _) => "offweb=debug",
			(false, true) => "offweb=warn",
			(false, false) => "offweb=info",
		})
	});

	if let Some(path) = log_file {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent)
				.with_context(|| format!("creating log directory {}", parent.display()))?;
		}
		let file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(path)
			.with_context(|| format!("opening log file {}", path.display()))?;

		let file_layer = tracing_subscriber::fmt::layer()
			.with_writer(file)
			.with_ansi(false)
			.with_target(true);

		tracing_subscriber::registry().with(filter).with(file_layer).init();
		info!(path = %path.display(), "offweb tracing initialized");
		return Ok(());
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
	Ok(())
}
