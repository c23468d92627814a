use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

/// Decode archived HTML bytes: strict UTF-8 first, then a single-byte
/// Latin-1 style fallback that never fails.
pub fn decode_html(bytes: &[u8]) -> DecodedHtml {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        return decoded(text.into_owned(), UTF_8);
    }

    // windows-1252 is the WHATWG mapping for the latin1 label; unmapped bytes
    // are replaced instead of aborting the decode.
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(body);
    if had_errors {
        engine_logging::engine_debug!("latin-1 fallback replaced undecodable bytes");
    }
    decoded(text.into_owned(), WINDOWS_1252)
}

fn decoded(html: String, encoding: &'static Encoding) -> DecodedHtml {
    DecodedHtml {
        html,
        encoding_label: encoding.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_html;

    #[test]
    fn utf8_is_kept() {
        let decoded = decode_html("héllo 你好".as_bytes());
        assert_eq!(decoded.html, "héllo 你好");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn utf8_bom_is_dropped() {
        let decoded = decode_html(b"\xEF\xBB\xBFhello");
        assert_eq!(decoded.html, "hello");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let decoded = decode_html(b"caf\xe9 \xff");
        assert_eq!(decoded.html, "café ÿ");
        assert_eq!(decoded.encoding_label, "windows-1252");
    }
}
