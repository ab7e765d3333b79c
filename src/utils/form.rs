//! `application/x-www-form-urlencoded` body decoding.

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;

/// Decode a urlencoded form body into a field map.
///
/// `+` decodes to a space; malformed percent sequences fall back to the
/// raw text rather than failing the request. Later duplicates of a field
/// overwrite earlier ones.
pub fn parse(body: &str) -> FxHashMap<String, String> {
    let mut fields = FxHashMap::default();
    for pair in body.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields.insert(decode(name), decode(value));
    }
    fields
}

/// Decode one urlencoded component.
fn decode(component: &str) -> String {
    let plus_decoded = component.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map(|c| c.into_owned())
        .unwrap_or(plus_decoded)
}
