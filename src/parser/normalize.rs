//! Input sanitation applied before splitting.
//!
//! Editor text arrives verbatim, so it may carry a byte-order mark, Windows
//! or classic Mac line endings, or stray control characters from pasted
//! binary data. None of these are rejected; they are rewritten so the rest
//! of the pipeline only ever sees `\n`-separated text. The number of lines is
//! preserved, which keeps diagnostics aligned with the editor.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

use super::ParseOptions;

/// C0 controls except tab and line feed, plus DEL.
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid regex"));

/// Sanitize raw document text according to `options`.
pub fn normalize_source<'a>(text: &'a str, options: &ParseOptions) -> Cow<'a, str> {
    if !options.normalize_input {
        return Cow::Borrowed(text);
    }

    let mut result = Cow::Borrowed(text.strip_prefix('\u{FEFF}').unwrap_or(text));

    if result.contains('\r') {
        result = Cow::Owned(result.replace("\r\n", "\n").replace('\r', "\n"));
    }

    if CONTROL_CHARS.is_match(&result) {
        let replaced = CONTROL_CHARS.replace_all(&result, "\u{FFFD}").into_owned();
        log::debug!("Replaced control characters in input");
        result = Cow::Owned(replaced);
    }

    if options.unicode_nfc && is_nfc_quick(result.chars()) != IsNormalized::Yes {
        result = Cow::Owned(result.nfc().collect());
    }

    result
}
