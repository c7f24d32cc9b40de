//! Byte decoding for cue sheet files.
//!
//! Cue sheets produced by older rippers are frequently stored in a legacy
//! code page. UTF-8 is used whenever the bytes are valid UTF-8; otherwise the
//! fallback encoding is applied unless the user forced a specific one.

use crate::error::{CoreError, CoreResult};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};

/// Encoding used when the cue bytes are not valid UTF-8.
pub const FALLBACK_ENCODING: &Encoding = WINDOWS_1251;

/// Looks up an encoding by its WHATWG label (e.g. "utf-8", "windows-1252", "latin1").
pub fn resolve_encoding(label: &str) -> CoreResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CoreError::CueEncoding(label.to_string()))
}

/// Picks UTF-8 for valid UTF-8 input and the fallback encoding otherwise.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        FALLBACK_ENCODING
    }
}

/// Decodes cue sheet bytes, returning the text and the encoding actually used.
///
/// A byte order mark overrides both the forced and the detected encoding and
/// is stripped from the returned text.
pub fn decode_cue_bytes(
    bytes: &[u8],
    forced: Option<&'static Encoding>,
) -> (String, &'static Encoding) {
    let encoding = forced.unwrap_or_else(|| detect_encoding(bytes));
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!(
            "Cue sheet contains bytes that are not valid {}; they were replaced",
            used.name()
        );
    }
    log::debug!("Decoded cue sheet as {}", used.name());
    (text.into_owned(), used)
}
