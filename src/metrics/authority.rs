//! Source authority from URL shape alone.
//!
//! ```ascii
//! authority = min(1.0, trusted_suffix(0.5) + https(0.2) + length_bonus)
//!
//! length_bonus: |root| < 15 → 0.3, < 30 → 0.2, otherwise 0.1
//! ```

use super::domain::parse_source;

/// Domain suffixes that earn the trust bonus.
pub const TRUSTED_SUFFIXES: &[&str] = &[".edu", ".gov", ".org", ".ac.uk", ".gov.uk"];

/// Score for a URL with no parsable host.
pub const UNPARSABLE_AUTHORITY: f64 = 0.3;

const TRUSTED_BONUS: f64 = 0.5;
const HTTPS_BONUS: f64 = 0.2;

/// Authority score in `[0, 1]`.
pub fn authority(url: &str) -> f64 {
    let Some(source) = parse_source(url) else {
        return UNPARSABLE_AUTHORITY;
    };

    let mut score = 0.0;
    if TRUSTED_SUFFIXES
        .iter()
        .any(|suffix| source.root.ends_with(suffix))
    {
        score += TRUSTED_BONUS;
    }
    if source.secure {
        score += HTTPS_BONUS;
    }
    score += length_bonus(source.root.chars().count());

    score.min(1.0)
}

fn length_bonus(len: usize) -> f64 {
    if len < 15 {
        0.3
    } else if len < 30 {
        0.2
    } else {
        0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_edu_https_short_caps_at_one() {
        assert!(approx(authority("https://mit.edu/article"), 1.0));
    }

    #[test]
    fn test_gov_with_www() {
        assert!(approx(authority("https://www.nasa.gov/missions"), 1.0));
    }

    #[test]
    fn test_plain_http_commercial() {
        // example.com is 11 chars
        assert!(approx(authority("http://example.com/x"), 0.3));
    }

    #[test]
    fn test_https_medium_domain() {
        // "some-longer-domain.com" is 22 chars
        assert!(approx(authority("https://some-longer-domain.com/"), 0.4));
    }

    #[test]
    fn test_long_domain() {
        let url = "https://a-really-long-subdomain.of-some-site.com/page";
        assert!(approx(authority(url), 0.3));
    }

    #[test]
    fn test_uk_academic() {
        // "cs.ox.ac.uk" trusted + http + short
        assert!(approx(authority("http://cs.ox.ac.uk/"), 0.8));
    }

    #[test]
    fn test_unparsable() {
        assert!(approx(authority(""), UNPARSABLE_AUTHORITY));
        assert!(approx(authority("not a url at all"), UNPARSABLE_AUTHORITY));
    }

    #[test]
    fn test_within_bounds() {
        for url in [
            "https://mit.edu",
            "http://x.com",
            "ftp://files.example.org/a",
            "garbage",
        ] {
            let score = authority(url);
            assert!((0.0..=1.0).contains(&score), "{} -> {}", url, score);
        }
    }
}
