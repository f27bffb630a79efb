//! Market locality from the candidate's domain suffix.
//!
//! `locality = 0.5 + 0.5 if the root domain ends with the market's TLD`.
//!
//! The target TLD is looked up from the [`LocaleContext`] in order:
//! market (name or ISO code), then language code, then the ccTLD of the
//! publishing site's own domain.

use super::domain::root_domain;
use crate::locale::LocaleContext;

/// Base score, and the score for candidates without a host.
pub const BASE_LOCALITY: f64 = 0.5;

const MATCH_BONUS: f64 = 0.5;

/// `(aliases, suffix)`; aliases are lower-case market names, ISO country
/// codes and language codes.
const MARKET_TLDS: &[(&[&str], &str)] = &[
    (&["germany", "deutschland", "de"], ".de"),
    (&["austria", "at"], ".at"),
    (&["switzerland", "ch"], ".ch"),
    (&["france", "fr"], ".fr"),
    (&["united kingdom", "uk", "gb", "great britain", "england"], ".uk"),
    (&["ireland", "ie"], ".ie"),
    (&["spain", "es"], ".es"),
    (&["italy", "it"], ".it"),
    (&["netherlands", "nl"], ".nl"),
    (&["belgium", "be"], ".be"),
    (&["poland", "pl"], ".pl"),
    (&["sweden", "se", "sv"], ".se"),
    (&["denmark", "dk", "da"], ".dk"),
    (&["norway", "no", "nb"], ".no"),
    (&["finland", "fi"], ".fi"),
    (&["portugal", "pt"], ".pt"),
    (&["brazil", "br"], ".br"),
    (&["mexico", "mx"], ".mx"),
    (&["canada", "ca"], ".ca"),
    (&["united states", "usa", "us"], ".us"),
    (&["australia", "au"], ".au"),
    (&["new zealand", "nz"], ".nz"),
    (&["india", "in"], ".in"),
    (&["japan", "jp", "ja"], ".jp"),
    (&["china", "cn", "zh"], ".cn"),
    (&["south korea", "korea", "kr", "ko"], ".kr"),
];

/// Look up the TLD for a market name, ISO code or language code.
pub fn market_tld(key: &str) -> Option<&'static str> {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    // "de-DE" / "en_GB" style tags: try the full tag, then the region, then the language.
    let mut keys = vec![key.clone()];
    let parts: Vec<&str> = key.split(|c: char| c == '-' || c == '_').collect();
    if parts.len() == 2 {
        keys.push(parts[1].to_string());
        keys.push(parts[0].to_string());
    }

    keys.iter().find_map(|k| {
        MARKET_TLDS
            .iter()
            .find(|(aliases, _)| aliases.contains(&k.as_str()))
            .map(|(_, suffix)| *suffix)
    })
}

/// TLD the locale targets, if any.
pub fn target_tld(locale: &LocaleContext) -> Option<String> {
    if let Some(tld) = market_tld(&locale.market) {
        return Some(tld.to_string());
    }
    if let Some(tld) = market_tld(&locale.language) {
        return Some(tld.to_string());
    }
    let site = root_domain(&locale.domain)?;
    let last = site.rsplit('.').next()?;
    (last.len() == 2 && last.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| format!(".{}", last))
}

/// Locality score in `[0, 1]`.
pub fn locality(url: &str, locale: &LocaleContext) -> f64 {
    let Some(root) = root_domain(url) else {
        return BASE_LOCALITY;
    };

    match target_tld(locale) {
        Some(tld) if root.ends_with(&tld) => (BASE_LOCALITY + MATCH_BONUS).min(1.0),
        _ => BASE_LOCALITY,
    }
}
