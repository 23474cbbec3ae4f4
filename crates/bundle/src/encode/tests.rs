use pretty_assertions::assert_eq;

use super::*;
use crate::progress::{BuildEvent, NullSink};

/// Byte reversal; invertible and easy to check.
struct Reverse;

impl Codec for Reverse {
	fn id(&self) -> &str {
		"rev"
	}

	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
		Ok(data.iter().rev().copied().collect())
	}

	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
		self.compress(data)
	}
}

struct Broken;

impl Codec for Broken {
	fn id(&self) -> &str {
		"broken"
	}

	fn compress(&self, _data: &[u8]) -> Result<Vec<u8>, CodecError> {
		Err(CodecError::Io {
			codec: "broken".into(),
			error: std::io::Error::other("boom"),
		})
	}

	fn decompress(&self, _data: &[u8]) -> Result<Vec<u8>, CodecError> {
		Err(CodecError::Unavailable("broken".into()))
	}
}

fn content() -> ContentMap {
	[
		("index.html", b"<html></html>".to_vec()),
		("TemplateData/style.css", b"p{}".to_vec()),
		("TemplateData/icon.png", vec![1, 2, 3]),
		("Build/game.wasm", b"\0asm".to_vec()),
	]
	.into_iter()
	.collect()
}

fn registry() -> CodecRegistry {
	let mut codecs = CodecRegistry::empty();
	codecs.register(Reverse);
	codecs.register(Broken);
	codecs
}

fn run(config: &BuildConfig, codecs: &CodecRegistry) -> (EmbeddedResourceMap, Vec<BuildEvent>, Vec<BuildWarning>) {
	let content = content();
	let mut sink = NullSink;
	let mut reporter = Reporter::new(&mut sink, config.report);
	let map = encode(&content, config, codecs, &mut reporter);
	let (events, warnings) = reporter.finish();
	(map, events, warnings)
}

#[test]
fn raw_entries_without_compression() {
	let (map, _, warnings) = run(&BuildConfig::default(), &registry());
	assert_eq!(
		map.keys().collect::<Vec<_>>(),
		vec!["index.html", "TemplateData/style.css", "TemplateData/icon.png", "Build/game.wasm"]
	);
	assert_eq!(map.get("TemplateData/icon.png"), Some(&EmbeddedEntry::Raw("AQID".into())));
	assert!(map.iter().all(|(_, e)| !e.is_compressed()));
	assert!(warnings.is_empty());
}

#[test]
fn compression_skips_markup_and_styles() {
	let config = BuildConfig {
		compress: true,
		codec: "rev".into(),
		..BuildConfig::default()
	};
	let codecs = registry();
	let (map, _, warnings) = run(&config, &codecs);
	assert!(warnings.is_empty());
	assert!(!map.get("index.html").unwrap().is_compressed());
	assert!(!map.get("TemplateData/style.css").unwrap().is_compressed());

	let icon = map.get("TemplateData/icon.png").unwrap();
	assert_eq!(
		icon,
		&EmbeddedEntry::Compressed {
			b64: "AwIB".into(),
			encoding: "rev".into(),
			mime: "image/png".into(),
		}
	);
	assert_eq!(icon.encoding(), Some("rev"));

	let original = content();
	for (key, entry) in map.iter() {
		assert_eq!(entry.decode(&codecs).unwrap(), original.get(key).unwrap().bytes(), "{key}");
	}
}

#[test]
fn missing_codec_warns_once_and_embeds_raw() {
	let config = BuildConfig {
		compress: true,
		codec: "zstd".into(),
		..BuildConfig::default()
	};
	let (map, _, warnings) = run(&config, &registry());
	assert_eq!(
		warnings,
		vec![BuildWarning::CompressionUnavailable {
			requested: "zstd".into()
		}]
	);
	assert!(map.iter().all(|(_, e)| !e.is_compressed()));
}

#[test]
fn failing_codec_falls_back_per_resource() {
	let config = BuildConfig {
		compress: true,
		codec: "broken".into(),
		..BuildConfig::default()
	};
	let (map, _, warnings) = run(&config, &registry());
	assert_eq!(warnings.len(), 2);
	assert!(matches!(
		&warnings[0],
		BuildWarning::CompressionFailed { path, codec, .. } if path == "TemplateData/icon.png" && codec == "broken"
	));
	assert!(map.iter().all(|(_, e)| !e.is_compressed()));
}

#[test]
fn progress_runs_from_fifty_to_ninety_nine() {
	let (_, events, _) = run(&BuildConfig::default(), &registry());
	let percents: Vec<u8> = events
		.iter()
		.filter_map(|e| match e {
			BuildEvent::Progress { percent, .. } => Some(*percent),
			_ => None,
		})
		.collect();
	assert_eq!(percents, vec![50, 62, 74, 86, 99]);
}

#[test]
fn script_json_is_ordered_and_escaped() {
	let content: ContentMap = [("z.txt", b"</script>".to_vec()), ("a.txt", b"x".to_vec())].into_iter().collect();
	let mut sink = NullSink;
	let mut reporter = Reporter::new(&mut sink, Default::default());
	let map = encode(&content, &BuildConfig::default(), &CodecRegistry::empty(), &mut reporter);

	let json = map.to_script_json();
	assert_eq!(json, r#"{"z.txt":"PC9zY3JpcHQ+","a.txt":"eA=="}"#);

	let compressed = EmbeddedResourceMap {
		entries: [(
			"a</b".to_string(),
			EmbeddedEntry::Compressed {
				b64: "AA==".into(),
				encoding: "br".into(),
				mime: "text/plain".into(),
			},
		)]
		.into_iter()
		.collect(),
	};
	let json = compressed.to_script_json();
	assert!(!json.contains("</"));
	assert_eq!(EmbeddedResourceMap::from_json(&json).unwrap(), compressed);
}

#[test]
fn key_list_keeps_table_order() {
	let content: ContentMap = [("index.html", "a"), ("b/c/1", "b"), ("1", "c"), ("x</y", "d")]
		.into_iter()
		.collect();
	let mut sink = NullSink;
	let mut reporter = Reporter::new(&mut sink, Default::default());
	let map = encode(&content, &BuildConfig::default(), &CodecRegistry::empty(), &mut reporter);

	assert_eq!(map.keys_script_json(), r#"["index.html","b/c/1","1","x<\/y"]"#);
}

#[test]
fn compressibility() {
	assert!(is_compressible("Build/game.wasm"));
	assert!(is_compressible("Build/game.data"));
	assert!(is_compressible("LICENSE"));
	assert!(!is_compressible("index.HTML"));
	assert!(!is_compressible("a/b.css"));
}
