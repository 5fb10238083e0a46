//! Normalization of user-entered search text into a URL-embeddable query.

use url::form_urlencoded;

/// Lower-cases `raw`, collapses whitespace runs and form-urlencodes the
/// result, so spaces become `+` and reserved characters are percent-encoded.
pub fn normalize(raw: &str) -> String {
    let folded = raw.to_lowercase();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    form_urlencoded::byte_serialize(collapsed.as_bytes()).collect()
}

/// A blank query never starts a query cycle.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}
