// Request decoding helpers
// Path segments and query strings arrive percent-encoded

/// Decode a single percent-encoded path segment (`Chess%20Club` -> `Chess Club`)
pub fn decode_path_segment(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

/// Find `key` in a form-encoded query string and return its decoded value
///
/// `+` decodes to a space, as browsers encode form submissions. The first
/// occurrence wins.
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| decode_form_component(k).as_deref() == Some(key))
        .and_then(|(_, v)| decode_form_component(v))
}

fn decode_form_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|s| s.into_owned())
}
