//! Target URL validation. Purely syntactic; nothing touches the network.

use url::Url;

/// Parses `input` as a target URL, requiring both a scheme and a host.
///
/// Surrounding whitespace is ignored.
#[must_use]
pub fn parse_target_url(input: &str) -> Option<Url> {
    let url = Url::parse(input.trim()).ok()?;
    url.host_str().filter(|host| !host.is_empty())?;
    Some(url)
}

/// Returns `true` if `input` parses into a URL with a scheme and a host.
#[must_use]
pub fn is_valid_url(input: &str) -> bool {
    parse_target_url(input).is_some()
}
