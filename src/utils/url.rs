// src/utils/url.rs

//! Link inspection utilities.

use url::Url;

/// Extract the host from a link, lowercased and without a leading `www.`.
///
/// # Examples
/// ```
/// use podcast_features::utils::url::get_domain;
///
/// assert_eq!(
///     get_domain("https://www.example.com/about"),
///     Some("example.com".to_string())
/// );
/// assert_eq!(get_domain("not a link"), None);
/// ```
pub fn get_domain(link: &str) -> Option<String> {
    let parsed = Url::parse(link.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    if host.is_empty() { None } else { Some(host) }
}

/// Best-effort display domain for a link: the host when it parses, the link otherwise.
pub fn display_domain(link: &str) -> String {
    get_domain(link).unwrap_or_else(|| link.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("http://example.com"),
            Some("example.com".to_string())
        );
        assert_eq!(
            get_domain("https://Sub.Example.com:8080/path"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(
            get_domain("https://www.mypodcast.fm/episodes"),
            Some("mypodcast.fm".to_string())
        );
    }

    #[test]
    fn test_get_domain_rejects_relative() {
        assert_eq!(get_domain("/channel/123"), None);
        assert_eq!(get_domain(""), None);
    }

    #[test]
    fn test_display_domain_falls_back_to_link() {
        assert_eq!(display_domain("mypodcast dot com"), "mypodcast dot com");
        assert_eq!(display_domain("http://example.com/x"), "example.com");
    }
}
