//! Locale context consumed by the locality metric.

use serde::{Deserialize, Serialize};

/// Target audience of the generated content.
///
/// Only [`crate::metrics::locality`] reads this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleContext {
    /// Publishing site domain, e.g. `example.de`.
    #[serde(default)]
    pub domain: String,
    /// Target market, by name (`Germany`) or ISO code (`DE`).
    #[serde(default)]
    pub market: String,
    /// Content language code, e.g. `de`.
    #[serde(default)]
    pub language: String,
}

impl LocaleContext {
    /// Create a locale context.
    pub fn new(
        domain: impl Into<String>,
        market: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            market: market.into(),
            language: language.into(),
        }
    }
}
