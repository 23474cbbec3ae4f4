//! The generated JavaScript matcher must pick the same winner as the Rust one.

use std::cell::RefCell;

use boa_engine::{Context, Source};
use offweb_matcher::{MatchRules, RUNTIME_BEST_MATCH_FN, runtime_source};
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};

struct JsMatcher {
	context: Context,
}

impl JsMatcher {
	fn new(rules: &MatchRules) -> Self {
		let mut context = Context::default();
		context
			.eval(Source::from_bytes(runtime_source(rules).as_str()))
			.expect("matcher source must evaluate");
		Self { context }
	}

	fn best(&mut self, reference: &str, keys: &[String]) -> Option<String> {
		let call = format!(
			"JSON.stringify({RUNTIME_BEST_MATCH_FN}({}, {}))",
			serde_json::to_string(reference).unwrap(),
			serde_json::to_string(keys).unwrap(),
		);
		let value = self.context.eval(Source::from_bytes(call.as_str())).expect("call must succeed");
		let json = value
			.to_string(&mut self.context)
			.expect("stringified result")
			.to_std_string_escaped();
		serde_json::from_str(&json).expect("result must be JSON")
	}
}

fn rust_best(rules: &MatchRules, reference: &str, keys: &[String]) -> Option<String> {
	rules
		.best_match(reference, keys.iter().map(String::as_str))
		.map(|c| c.key.to_string())
}

const FIXED: &[(&str, &[&str])] = &[
	("app.js", &["index.html", "app.js", "lib/app.js"]),
	("./Build/game.wasm?v=2", &["game.wasm", "Build/game.wasm"]),
	("http://host/Build/game.data", &["assets/game.data", "Build/game.data"]),
	("game.framework.js", &["Build/game.framework.js", "other/game.framework.js"]),
	("TemplateData\\style.css", &["style.css", "TemplateData/style.css"]),
	("c/logo.png", &["a/logo.png", "b/logo.png"]),
	("lib/app.js", &["mylib/app.js", "src/lib/app.js"]),
	("mygame.wasm", &["game.wasm"]),
	("data:application/wasm;base64,AAAA", &["game.wasm"]),
	("dir/", &["dir/x", "x/dir"]),
	("/", &["a", "b/"]),
	("#frag", &["a"]),
];

#[test]
fn fixed_cases_agree() {
	let rules = MatchRules::default();
	let mut js = JsMatcher::new(&rules);
	for (reference, keys) in FIXED {
		let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
		assert_eq!(
			js.best(reference, &keys),
			rust_best(&rules, reference, &keys),
			"reference {reference:?} against {keys:?}"
		);
	}
}

#[test]
fn custom_rules_agree() {
	let rules = MatchRules {
		exact: 7,
		suffix: 7,
		basename: 3,
		build_bonus: 1,
		build_dirs: vec!["out".into()],
	};
	let mut js = JsMatcher::new(&rules);
	let keys = vec!["out/a.js".to_string(), "a.js".to_string(), "x/a.js".to_string()];
	for reference in ["a.js", "x/a.js", "y/a.js", "out/a.js"] {
		assert_eq!(js.best(reference, &keys), rust_best(&rules, reference, &keys));
	}
}

fn segment() -> impl Strategy<Value = String> {
	prop_oneof![
		Just("Build".to_string()),
		Just("TemplateData".to_string()),
		Just(".".to_string()),
		Just("a".to_string()),
		Just("b".to_string()),
		Just("app.js".to_string()),
		Just("game.wasm".to_string()),
		Just("mygame.wasm".to_string()),
		"[a-c.?#\\\\]{0,3}",
	]
}

fn path() -> impl Strategy<Value = String> {
	(any::<bool>(), prop::collection::vec(segment(), 1..4)).prop_map(|(leading, segs)| {
		let joined = segs.join("/");
		if leading { format!("/{joined}") } else { joined }
	})
}

#[test]
fn generated_cases_agree() {
	let rules = MatchRules::default();
	let js = RefCell::new(JsMatcher::new(&rules));
	let mut runner = TestRunner::new(Config::with_cases(128));
	let strategy = (path(), prop::collection::vec(path(), 0..6));
	runner
		.run(&strategy, |(reference, keys)| {
			let expected = rust_best(&rules, &reference, &keys);
			let actual = js.borrow_mut().best(&reference, &keys);
			prop_assert_eq!(actual, expected, "reference {:?} keys {:?}", reference, keys);
			Ok(())
		})
		.unwrap();
}
