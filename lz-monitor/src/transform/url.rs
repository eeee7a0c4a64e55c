//! URL shape parsing

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

const URL_SHAPE: &str = r"^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?$";

fn url_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(URL_SHAPE).ok()).as_ref()
}

/// Parts of a URL. Every field is `None` for empty or unparsable input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// path + query + fragment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
}

impl ParsedUrl {
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.path.is_none() && self.protocol.is_none() && self.relative.is_none()
    }
}

/// Split a URL into protocol, host, path and relative part.
///
/// `"https://host.com/path?q=1#frag"` gives protocol `https`, host
/// `host.com`, path `/path` and relative `/path?q=1#frag`.
pub fn parse_url(url: &str) -> ParsedUrl {
    if url.is_empty() {
        return ParsedUrl::default();
    }

    let Some(caps) = url_pattern().and_then(|re| re.captures(url)) else {
        return ParsedUrl::default();
    };

    let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
    let path = group(5);
    let query = caps.get(6).map(|m| m.as_str()).unwrap_or("");
    let fragment = caps.get(8).map(|m| m.as_str()).unwrap_or("");

    ParsedUrl {
        host: group(4),
        relative: path.as_ref().map(|p| format!("{}{}{}", p, query, fragment)),
        path,
        protocol: group(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_url() {
        let parsed = parse_url("https://host.com/path?q=1#frag");
        assert_eq!(parsed.protocol.as_deref(), Some("https"));
        assert_eq!(parsed.host.as_deref(), Some("host.com"));
        assert_eq!(parsed.path.as_deref(), Some("/path"));
        assert_eq!(parsed.relative.as_deref(), Some("/path?q=1#frag"));
    }

    #[test]
    fn empty_input_gives_empty_result() {
        assert!(parse_url("").is_empty());
    }

    #[test]
    fn host_only_has_empty_path() {
        let parsed = parse_url("https://host.com");
        assert_eq!(parsed.host.as_deref(), Some("host.com"));
        assert_eq!(parsed.path.as_deref(), Some(""));
        assert_eq!(parsed.relative.as_deref(), Some(""));
    }

    #[test]
    fn relative_input_has_no_host() {
        let parsed = parse_url("/users/7?tab=posts");
        assert_eq!(parsed.protocol, None);
        assert_eq!(parsed.host, None);
        assert_eq!(parsed.relative.as_deref(), Some("/users/7?tab=posts"));
    }

    #[test]
    fn newline_in_fragment_does_not_match() {
        assert!(parse_url("https://a.com/x#frag\nmore").is_empty());
    }
}
