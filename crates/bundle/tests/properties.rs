//! Round-trip and idempotence laws over generated file sets.

use offweb_bundle::{
	BuildConfig, BuildResult, CodecRegistry, EmbeddedEntry, EmbeddedResourceMap, Manifest, MemoryOutput, MemorySource,
	NullSink, Pipeline,
};
use proptest::collection::vec;
use proptest::prelude::*;

const EXTENSIONS: &[&str] = &["png", "wasm", "data", "js", "json", "css", "txt"];

fn file_set() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
	vec(("[a-z]{1,8}", 0..EXTENSIONS.len(), vec(any::<u8>(), 0..256)), 1..8).prop_map(|files| {
		let mut seen = std::collections::HashSet::new();
		files
			.into_iter()
			.filter_map(|(stem, ext, bytes)| {
				let path = format!("Build/{stem}.{}", EXTENSIONS[ext]);
				seen.insert(path.clone()).then_some((path, bytes))
			})
			.collect()
	})
}

fn build(files: &[(String, Vec<u8>)], compress: bool) -> BuildResult {
	let mut source = MemorySource::new().with("index.html", "<html><head></head><body></body></html>");
	for (path, bytes) in files {
		source.insert(path.clone(), bytes.clone());
	}
	let manifest: Manifest = std::iter::once("index.html".to_string())
		.chain(files.iter().map(|(p, _)| p.clone()))
		.collect();
	let config = BuildConfig {
		compress,
		..BuildConfig::default()
	};
	Pipeline::new(config, CodecRegistry::with_defaults())
		.run(&manifest, &source, &mut MemoryOutput::new(), &mut NullSink)
		.unwrap()
}

fn decoded(map: &EmbeddedResourceMap) -> Vec<(String, Vec<u8>)> {
	let codecs = CodecRegistry::with_defaults();
	map.iter()
		.map(|(key, entry)| (key.to_string(), entry.decode(&codecs).unwrap()))
		.collect()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(48))]

	#[test]
	fn raw_entries_decode_to_original(files in file_set()) {
		let result = build(&files, false);
		for (path, bytes) in &files {
			let entry = result.embedded.get(path).unwrap();
			prop_assert!(matches!(entry, EmbeddedEntry::Raw(_)));
			prop_assert_eq!(&entry.decode(&CodecRegistry::empty()).unwrap(), bytes);
		}
	}

	#[test]
	fn compressed_entries_decode_to_original(files in file_set()) {
		let result = build(&files, true);
		let codecs = CodecRegistry::with_defaults();
		for (path, bytes) in &files {
			let entry = result.embedded.get(path).unwrap();
			prop_assert_eq!(&entry.decode(&codecs).unwrap(), bytes);
			if path.ends_with(".css") {
				prop_assert!(!entry.is_compressed());
			}
		}
	}

	#[test]
	fn builds_are_content_idempotent(files in file_set(), compress in any::<bool>()) {
		let first = build(&files, compress);
		let second = build(&files, compress);
		prop_assert_eq!(&first.embedded_keys, &second.embedded_keys);
		prop_assert_eq!(decoded(&first.embedded), decoded(&second.embedded));
		if !compress {
			prop_assert_eq!(&first.embedded, &second.embedded);
			prop_assert_eq!(&first.document, &second.document);
		}
	}

	#[test]
	fn script_json_parses_back(files in file_set(), compress in any::<bool>()) {
		let result = build(&files, compress);
		let json = result.embedded.to_script_json();
		prop_assert!(!json.contains("</"));
		prop_assert_eq!(EmbeddedResourceMap::from_json(&json).unwrap(), result.embedded);
	}
}
