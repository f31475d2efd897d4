use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::Error;

/// Everything but the unreserved characters of RFC 3986 gets escaped, so
/// the result never contains path separators, brackets or a bare `%`.
const TOKEN_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes an arbitrary string (usually a connection URL) into a token that
/// can be embedded into a single path segment.
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, TOKEN_ESCAPE_SET).to_string()
}

/// Decodes a token produced by [encode].
///
/// Every `%` needs to start an escape sequence of two hex digits, and the
/// decoded bytes need to be valid UTF-8. Characters that don't need escaping
/// are passed through, so hand-written tokens with only some characters
/// escaped decode fine too.
pub fn decode(token: &str) -> Result<String, Error> {
    let bytes = token.as_bytes();
    for (pos, _) in token.match_indices('%') {
        match bytes.get(pos + 1..pos + 3) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {}
            _ => {
                return Err(Error::MalformedToken {
                    token: token.to_owned(),
                    reason: format!("invalid escape sequence at offset {}", pos),
                })
            }
        }
    }

    percent_decode_str(token)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Error::MalformedToken {
            token: token.to_owned(),
            reason: e.to_string(),
        })
}
