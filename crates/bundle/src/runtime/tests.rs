use super::*;
use crate::codec::CodecRegistry;
use crate::config::BuildConfig;
use crate::content::ContentMap;
use crate::progress::{NullSink, Reporter};

fn table(files: &[(&str, &[u8])]) -> EmbeddedResourceMap {
	let content: ContentMap = files.iter().map(|(k, v)| (*k, v.to_vec())).collect();
	let mut sink = NullSink;
	let mut reporter = Reporter::new(&mut sink, Default::default());
	crate::encode::encode(&content, &BuildConfig::default(), &CodecRegistry::empty(), &mut reporter)
}

#[test]
fn patch_is_one_script_element() {
	let patch = render_patch(&table(&[("evil.txt", b"</script><script>alert(1)")]), &MatchRules::default());
	assert!(patch.starts_with("<script>"));
	assert!(patch.trim_end().ends_with("</script>"));
	assert_eq!(patch.matches("</script").count(), 1);
	assert_eq!(patch.matches("<script").count(), 1);
}

#[test]
fn table_follows_marker_and_guard() {
	let patch = render_patch(&table(&[("Build/game.wasm", b"\0asm")]), &MatchRules::default());
	let guard = patch.find(INSTALL_GUARD).unwrap();
	let marker = patch.find(TABLE_MARKER).unwrap();
	let table = patch.find(&format!("const {TABLE_CONST} = {{\"Build/game.wasm\":\"AGFzbQ==\"}};")).unwrap();
	assert!(guard < marker && marker < table);
	assert_eq!(patch.matches(TABLE_MARKER).count(), 1);
}

#[test]
fn matcher_and_rules_are_inlined() {
	let rules = MatchRules::default().with_build_dirs(["Out"]);
	let patch = render_patch(&table(&[]), &rules);
	assert!(patch.contains(&format!("function {}(", offweb_matcher::RUNTIME_BEST_MATCH_FN)));
	assert!(patch.contains("\"buildDirs\":[\"Out\"]"));
	assert!(patch.contains("\"wasm\":\"application/wasm\""));
	for placeholder in [
		"__OFFWEB_MATCHER__",
		"__OFFWEB_MIME_TYPES__",
		"__OFFWEB_KEYS__",
		"__OFFWEB_EMBEDDED_FILES__",
	] {
		assert!(!patch.contains(placeholder), "{placeholder}");
	}
	assert!(!patch.contains("__MATCH_RULES__"));
}

#[test]
fn interception_covers_fetch_and_streaming_instantiation() {
	let patch = render_patch(&table(&[]), &MatchRules::default());
	assert!(patch.contains("window.fetch = function"));
	assert!(patch.contains("WebAssembly.instantiateStreaming = async function"));
	assert!(patch.contains("'Content-Encoding'"));
}
