//! Splitting of `"Display Name" <address>` header strings.

/// Text between the first `<` and the next `>`; the input unchanged otherwise.
pub fn extract_address(header: &str) -> &str {
    if let Some(start) = header.find('<')
        && let Some(len) = header[start + 1..].find('>')
    {
        return &header[start + 1..start + 1 + len];
    }
    header
}

/// Everything before the first `<`, without surrounding quotes or whitespace.
///
/// With no `<` the input is returned unchanged. A bare `<address>` has no name,
/// so the address stands in for it.
pub fn extract_display_name(header: &str) -> &str {
    let Some(start) = header.find('<') else {
        return header;
    };
    let name = header[..start].trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace());
    if name.is_empty() {
        extract_address(header)
    } else {
        name
    }
}

pub fn extract_address_opt(header: Option<&str>) -> Option<&str> {
    header.map(extract_address)
}

pub fn extract_display_name_opt(header: Option<&str>) -> Option<&str> {
    header.map(extract_display_name)
}

/// Display name ready for the screen, with RFC 2047 encoded-words decoded.
pub fn sender_name(header: &str) -> String {
    let decoded = super::decoders::decode_mime_words(header.as_bytes());
    extract_display_name(&decoded).to_string()
}
