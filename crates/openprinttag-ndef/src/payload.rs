/// Payload of a parsed NDEF record, classified by record type.
///
/// Closed set on purpose: callers match exhaustively and decide what to do
/// with records they do not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPayload {
    /// MIME record carrying the concatenated CBOR region payload.
    Cbor(Vec<u8>),

    /// Well-known URI record, already expanded through the prefix table.
    Uri(String),

    /// Any other record; carries the raw type bytes for logging.
    Unknown(Vec<u8>),
}

/// URI prefix codes written by this crate. Longest prefix first so that
/// `https://www.` wins over `https://`.
const URI_PREFIXES: &[(u8, &str)] = &[
    (0x02, "https://www."),
    (0x01, "http://www."),
    (0x04, "https://"),
    (0x03, "http://"),
    (0x06, "mailto:"),
];

fn uri_prefix(code: u8) -> &'static str {
    URI_PREFIXES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, prefix)| *prefix)
        .unwrap_or("")
}

/// Expand a URI record payload: one prefix code byte followed by the UTF-8
/// suffix. An empty payload expands to an empty string, an unknown prefix
/// code expands with no prefix.
pub fn decode_uri_payload(payload: &[u8]) -> String {
    let Some((code, suffix)) = payload.split_first() else {
        return String::new();
    };

    let prefix = uri_prefix(*code);
    let suffix = String::from_utf8_lossy(suffix);
    format!("{prefix}{suffix}")
}

/// Compress a URL into a URI record payload, stripping the longest known
/// prefix and storing its code in the first byte.
pub fn encode_uri_payload(url: &str) -> Vec<u8> {
    let (code, suffix) = URI_PREFIXES
        .iter()
        .find_map(|(code, prefix)| url.strip_prefix(prefix).map(|rest| (*code, rest)))
        .unwrap_or((0x00, url));

    let mut payload = Vec::with_capacity(1 + suffix.len());
    payload.push(code);
    payload.extend_from_slice(suffix.as_bytes());
    payload
}
