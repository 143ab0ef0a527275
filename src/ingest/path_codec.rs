//! Filename encoding repair — best-effort, never fails
//!
//! Legacy archive tooling stores non-ASCII entry names in a single-byte code
//! page even when the true text is UTF-8 or GBK. By the time a zip reader
//! hands us a `&str`, such names have been mis-decoded as CP437 mojibake.
//! `repair` re-encodes the string back to the CP437 bytes it came from, then
//! tries the encodings the name was actually written in. The original name
//! is always a valid fallback; no error escapes.

use codepage_437::{ToCp437, CP437_CONTROL};
use encoding_rs::GBK;

/// Repair a possibly mis-decoded archive entry name.
pub fn repair(raw: &str) -> String {
    // ASCII survives every decoding intact
    if raw.is_ascii() {
        return raw.to_string();
    }

    let bytes = match raw.to_cp437(&CP437_CONTROL) {
        Ok(bytes) => bytes,
        // Name contains characters outside CP437: it was decoded correctly
        Err(_) => return raw.to_string(),
    };

    if let Ok(utf8) = std::str::from_utf8(&bytes) {
        return utf8.to_string();
    }

    if let Some(gbk) = GBK.decode_without_bom_handling_and_without_replacement(&bytes) {
        return gbk.into_owned();
    }

    tracing::debug!("filename decode fallback, keeping raw name: {raw}");
    raw.to_string()
}

// ─── Tests ─────────────────────────────────────────────────────────
