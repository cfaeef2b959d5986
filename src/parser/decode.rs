//! Page bytes to text.
//!
//! Pages arrive as raw bytes in whatever charset the site uses. The order
//! tried is: byte order mark, a `<meta>` charset declaration near the top of
//! the page, UTF-8, then a statistical guess.

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::errors::{ScrapeError, ScrapeResult};

/// How far into the page a charset declaration is looked for.
const SNIFF_LIMIT: usize = 1024;

// Matches both `<meta charset=..>` and `<meta http-equiv=.. content="..; charset=..">`
static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
        .expect("meta charset pattern is valid")
});

fn declared_encoding(buffer: &[u8]) -> Option<&'static Encoding> {
    let head = &buffer[..buffer.len().min(SNIFF_LIMIT)];
    let label = META_CHARSET.captures(head)?.get(1)?;

    // A UTF-16 label without a BOM means UTF-8
    Encoding::for_label(label.as_bytes()).map(Encoding::output_encoding)
}

fn guessed_encoding(buffer: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(buffer, true);
    detector.guess(None, true)
}

/// Text of a page.
///
/// A byte order mark is authoritative: bytes that contradict it are a
/// `MalformedDocument`. Without one, the declared charset and then UTF-8 must
/// decode cleanly to be used; the final guess decodes with replacement
/// characters.
pub fn decode(buffer: &[u8]) -> ScrapeResult<String> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(buffer) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&buffer[bom_length..]);
        if had_errors {
            return Err(ScrapeError::MalformedDocument(format!(
                "bytes do not match their {} byte order mark",
                encoding.name()
            )));
        }
        return Ok(text.into_owned());
    }

    for encoding in declared_encoding(buffer).into_iter().chain([UTF_8]) {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(buffer) {
            tracing::trace!(encoding = encoding.name(), "decoded page");
            return Ok(text.into_owned());
        }
    }

    let encoding = guessed_encoding(buffer);
    let (text, _) = encoding.decode_without_bom_handling(buffer);
    tracing::debug!(encoding = encoding.name(), "guessed page charset");

    Ok(text.into_owned())
}
