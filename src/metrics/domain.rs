//! URL → root domain extraction shared by the domain-based metrics.

use url::Url;

/// Host information extracted from a candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDomain {
    /// Lower-cased host with any leading `www.` removed.
    pub root: String,
    /// True only when the URL explicitly uses `https`.
    pub secure: bool,
}

/// Parse a candidate URL.
///
/// Scheme-less inputs such as `example.com/page` are retried with `https://`
/// prepended for host extraction, but are not treated as secure. Returns
/// `None` when no host can be found.
pub fn parse_source(raw: &str) -> Option<SourceDomain> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (parsed, explicit_scheme) = match Url::parse(trimmed) {
        Ok(url) => (url, true),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            (Url::parse(&format!("https://{}", trimmed)).ok()?, false)
        }
        Err(_) => return None,
    };

    let host = parsed.host_str()?.trim_end_matches('.').to_lowercase();
    let root = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if root.is_empty() {
        return None;
    }

    Some(SourceDomain {
        root,
        secure: explicit_scheme && parsed.scheme() == "https",
    })
}

/// Root domain of a URL, if it has one.
pub fn root_domain(raw: &str) -> Option<String> {
    parse_source(raw).map(|d| d.root)
}
