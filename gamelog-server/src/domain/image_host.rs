use url::Url;

use super::error::DomainError;

/// One entry of the cover image allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    /// `**`
    Any,
    /// `placehold.jp`
    Exact(String),
    /// `*.example.com`: exactly one label in front of the suffix.
    OneLabel(String),
    /// `**.supabase.co`: one or more labels in front of the suffix.
    AnyDepth(String),
}

impl HostPattern {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_end_matches('.').to_ascii_lowercase();
        if raw.is_empty() {
            return None;
        }
        if raw == "**" {
            return Some(Self::Any);
        }
        if let Some(suffix) = raw.strip_prefix("**.") {
            return Some(Self::AnyDepth(suffix.to_string()));
        }
        if let Some(suffix) = raw.strip_prefix("*.") {
            return Some(Self::OneLabel(suffix.to_string()));
        }
        Some(Self::Exact(raw))
    }

    fn matches(&self, host: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => host == expected,
            Self::OneLabel(suffix) => {
                subdomain_prefix(host, suffix).is_some_and(|prefix| !prefix.contains('.'))
            }
            Self::AnyDepth(suffix) => subdomain_prefix(host, suffix).is_some(),
        }
    }
}

/// Returns the non-empty part of `host` in front of `.suffix`.
fn subdomain_prefix<'a>(host: &'a str, suffix: &str) -> Option<&'a str> {
    let prefix = host.strip_suffix(suffix)?.strip_suffix('.')?;
    (!prefix.is_empty()).then_some(prefix)
}

/// Hostnames the image layer is allowed to fetch cover art from.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImageHostPolicy {
    patterns: Vec<HostPattern>,
}

impl ImageHostPolicy {
    pub(crate) fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .filter_map(|raw| HostPattern::parse(raw.as_ref()))
                .collect(),
        }
    }

    pub(crate) fn is_allowed_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.patterns.iter().any(|pattern| pattern.matches(&host))
    }

    /// Accepts an absolute `https` URL whose host is on the allow-list and
    /// returns it trimmed.
    pub(crate) fn check_url(&self, raw: &str) -> Result<String, DomainError> {
        let raw = raw.trim();
        let url = Url::parse(raw)
            .map_err(|_| DomainError::validation("cover_image_url", "must be an absolute URL"))?;

        if url.scheme() != "https" {
            return Err(DomainError::validation(
                "cover_image_url",
                "must use https",
            ));
        }

        let host = url
            .host_str()
            .ok_or_else(|| DomainError::validation("cover_image_url", "must have a host"))?;
        if !self.is_allowed_host(host) {
            return Err(DomainError::validation(
                "cover_image_url",
                "host is not on the image allow-list",
            ));
        }

        Ok(raw.to_string())
    }
}
