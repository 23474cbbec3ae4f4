//! Extension-based MIME lookup.
//!
//! One table serves data-URI generation, compressed table entries, and the
//! runtime shim, so a resource reports the same type everywhere.

const TABLE: &[(&str, &str)] = &[
	("html", "text/html"),
	("htm", "text/html"),
	("css", "text/css"),
	("js", "application/javascript"),
	("mjs", "application/javascript"),
	("json", "application/json"),
	("wasm", "application/wasm"),
	("txt", "text/plain"),
	("xml", "application/xml"),
	("png", "image/png"),
	("jpg", "image/jpeg"),
	("jpeg", "image/jpeg"),
	("gif", "image/gif"),
	("ico", "image/x-icon"),
	("webp", "image/webp"),
	("svg", "image/svg+xml"),
	("bmp", "image/bmp"),
	("avif", "image/avif"),
	("mp3", "audio/mpeg"),
	("ogg", "audio/ogg"),
	("wav", "audio/wav"),
	("m4a", "audio/mp4"),
	("mp4", "video/mp4"),
	("webm", "video/webm"),
	("woff", "font/woff"),
	("woff2", "font/woff2"),
	("ttf", "font/ttf"),
	("otf", "font/otf"),
];

/// Fallback for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lower-cased extension of `path`, without the dot.
pub fn extension(path: &str) -> Option<String> {
	let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
	let (stem, ext) = name.rsplit_once('.')?;
	(!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// MIME type for `path`, or [`OCTET_STREAM`].
pub fn for_path(path: &str) -> &'static str {
	extension(path)
		.and_then(|ext| TABLE.iter().find(|(e, _)| *e == ext))
		.map_or(OCTET_STREAM, |&(_, mime)| mime)
}

/// True for image, audio, and video types the media pass inlines.
pub fn is_media(path: &str) -> bool {
	let mime = for_path(path);
	mime.starts_with("image/") || mime.starts_with("audio/") || mime.starts_with("video/")
}

/// True for fonts, which stylesheets may reference through `url(...)`.
pub fn is_font(path: &str) -> bool {
	for_path(path).starts_with("font/")
}

/// The extension table as a JavaScript object literal.
pub fn js_table() -> String {
	let map: serde_json::Map<String, serde_json::Value> = TABLE
		.iter()
		.map(|(ext, mime)| (ext.to_string(), serde_json::Value::from(*mime)))
		.collect();
	serde_json::Value::Object(map).to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookups() {
		assert_eq!(for_path("Build/game.wasm"), "application/wasm");
		assert_eq!(for_path("IMG/Logo.PNG"), "image/png");
		assert_eq!(for_path("Build/game.data"), OCTET_STREAM);
		assert_eq!(for_path(".hidden"), OCTET_STREAM);
		assert_eq!(for_path("noext"), OCTET_STREAM);
		assert_eq!(extension("a.b/c"), None);
	}

	#[test]
	fn media_and_fonts() {
		assert!(is_media("icon.png"));
		assert!(is_media("intro.webm"));
		assert!(!is_media("app.js"));
		assert!(is_font("fonts/x.woff2"));
	}

	#[test]
	fn js_table_is_an_object() {
		let parsed: serde_json::Value = serde_json::from_str(&js_table()).unwrap();
		assert_eq!(parsed["wasm"], "application/wasm");
	}
}
