use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::{BRANCH_PAIR, CDN_PROXY_BASE, PAGES_HOST_SUFFIX, RAW_CONTENT_HOST};

/// Reachability check for a single URL.
///
/// Implementations must never fail: anything other than a confirmed success
/// is reported as `false`.
#[allow(async_fn_in_trait)]
pub trait Probe {
    async fn exists(&self, url: &str) -> bool;
}

/// HEAD-request probe with a bounded timeout.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Not a valid URL '{}': {}", url, e);
                return false;
            }
        };

        match self.client.head(parsed).send().await {
            Ok(response) => {
                let status = response.status();
                debug!("HEAD {} -> {}", url, status);
                status.is_success()
            }
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub original_url: String,
    pub resolved_url: String,
    pub was_fixed: bool,
    pub used_placeholder: bool,
}

/// Account-specific rewrite settings for the raw-content repair heuristics.
#[derive(Debug, Clone)]
pub struct RepairRules {
    pub canonical_owner: String,
    pub placeholder_url: String,
}

/// Parsed `https://raw.githubusercontent.com/{user}/{repo}/{branch}/{path}`.
#[derive(Debug, PartialEq)]
struct RawContentUrl {
    user: String,
    repo: String,
    branch: String,
    path: String,
    query: Option<String>,
}

impl RawContentUrl {
    fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        if parsed.host_str()? != RAW_CONTENT_HOST {
            return None;
        }

        let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();
        if segments.len() < 4 {
            return None;
        }

        Some(Self {
            user: segments[0].to_string(),
            repo: segments[1].to_string(),
            branch: segments[2].to_string(),
            path: segments[3..].join("/"),
            query: parsed.query().map(str::to_string),
        })
    }

    /// Repository path with the original query string, if any.
    fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    fn raw(&self, user: &str, branch: &str) -> String {
        format!(
            "https://{}/{}/{}/{}/{}",
            RAW_CONTENT_HOST,
            user,
            self.repo,
            branch,
            self.path_and_query()
        )
    }
}

fn swapped_branch(branch: &str) -> Option<&'static str> {
    let (first, second) = BRANCH_PAIR;
    if branch == first {
        Some(second)
    } else if branch == second {
        Some(first)
    } else {
        None
    }
}

/// Rewrite candidates for an unreachable URL, in the order they are tried.
///
/// Empty when the URL is not a raw-content link.
pub fn repair_candidates(url: &str, canonical_owner: &str) -> Vec<String> {
    let Some(raw) = RawContentUrl::parse(url) else {
        return Vec::new();
    };

    // GitHub account names are case-insensitive.
    let owner_differs =
        !canonical_owner.is_empty() && !raw.user.eq_ignore_ascii_case(canonical_owner);
    let owner = if owner_differs { canonical_owner } else { raw.user.as_str() };

    let mut candidates = Vec::with_capacity(4);
    if owner_differs {
        candidates.push(raw.raw(owner, &raw.branch));
    }
    if let Some(other) = swapped_branch(&raw.branch) {
        candidates.push(raw.raw(owner, other));
    }

    candidates.push(format!(
        "https://{}.{}/{}/{}",
        owner.to_lowercase(),
        PAGES_HOST_SUFFIX,
        raw.repo,
        raw.path_and_query()
    ));
    candidates.push(format!(
        "{}/{}/{}@{}/{}",
        CDN_PROXY_BASE,
        owner,
        raw.repo,
        raw.branch,
        raw.path_and_query()
    ));

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate != url && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

pub struct UrlResolver<P: Probe> {
    probe: P,
    rules: RepairRules,
}

impl<P: Probe> UrlResolver<P> {
    pub fn new(probe: P, rules: RepairRules) -> Self {
        Self { probe, rules }
    }

    #[cfg(test)]
    pub(crate) fn probe(&self) -> &P {
        &self.probe
    }

    /// Returns a URL that is either confirmed reachable or the placeholder.
    pub async fn resolve(&self, url: &str) -> ResolvedImage {
        if self.probe.exists(url).await {
            return ResolvedImage {
                original_url: url.to_string(),
                resolved_url: url.to_string(),
                was_fixed: false,
                used_placeholder: false,
            };
        }

        for candidate in repair_candidates(url, &self.rules.canonical_owner) {
            if self.probe.exists(&candidate).await {
                info!("🔧 Fixed image URL: {} -> {}", url, candidate);
                return ResolvedImage {
                    original_url: url.to_string(),
                    resolved_url: candidate,
                    was_fixed: true,
                    used_placeholder: false,
                };
            }
        }

        warn!("⚠️  Image not reachable, using placeholder: {}", url);
        ResolvedImage {
            original_url: url.to_string(),
            resolved_url: self.rules.placeholder_url.clone(),
            was_fixed: true,
            used_placeholder: true,
        }
    }
}
