// Rust guideline compliant 2026-10-12

//! Web-page audit: HTTP status, meta tags, broken links, text-to-HTML ratio.
//!
//! [`SiteAuditor`] fetches a page once through the [`PageFetcher`] port,
//! inspects the HTML, then fetches every outbound link to find broken ones.
//! The result is a structured [`AuditReport`]; rendering is the caller's job.
//!
//! Entry point: [`SiteAuditor::audit`]. Configuration via [`AuditConfig::builder`].

mod page;

pub use page::{ParsedPage, parse_page, text_to_html_ratio};

use std::collections::BTreeMap;

pub use url::Url;

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// A fetched HTTP response: status code and decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code after redirects.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Errors from the `PageFetcher` hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// No HTTP response was obtained (DNS, connect, TLS, timeout...).
    #[error("request failed: {reason}")]
    Transport {
        /// Human-readable description.
        reason: String,
    },
}

/// Hexagonal port: GET a URL.
///
/// A non-2xx status is a successful fetch; only transport failures are errors.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait PageFetcher {
    /// Fetch `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when no response is obtained.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

// ---------------------------------------------------------------------------
// AuditError
// ---------------------------------------------------------------------------

/// Errors that can occur during an audit.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The supplied configuration is invalid.
    #[error("invalid audit configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The audited page itself could not be fetched.
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

// ---------------------------------------------------------------------------
// AuditConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`SiteAuditor`].
///
/// Construct via [`AuditConfig::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Fetch outbound links to find broken ones.
    pub check_links: bool,
    /// Optional cap on the number of links fetched. `None` checks them all.
    pub max_links: Option<usize>,
}

/// Builder for [`AuditConfig`].
///
/// Obtain via [`AuditConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct AuditConfigBuilder {
    check_links: bool,
    max_links: Option<usize>,
}

impl AuditConfig {
    /// Create a builder. Default values: `check_links = true`, `max_links = None`.
    #[must_use]
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder { check_links: true, max_links: None }
    }
}

impl AuditConfigBuilder {
    /// Enable or disable link checking.
    #[must_use]
    pub fn check_links(mut self, check_links: bool) -> Self {
        self.check_links = check_links;
        self
    }

    /// Cap the number of links fetched.
    #[must_use]
    pub fn max_links(mut self, n: usize) -> Self {
        self.max_links = Some(n);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidConfig`] when `max_links` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<AuditConfig, AuditError> {
        if self.max_links == Some(0) {
            return Err(AuditError::InvalidConfig {
                reason: "max_links must be >= 1".to_owned(),
            });
        }
        Ok(AuditConfig { check_links: self.check_links, max_links: self.max_links })
    }
}

// ---------------------------------------------------------------------------
// AuditReport
// ---------------------------------------------------------------------------

/// Why a link counts as broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkProblem {
    /// The link answered with a status other than 200.
    Status(u16),
    /// The link could not be fetched at all.
    Unreachable(String),
}

impl std::fmt::Display for LinkProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{code}"),
            Self::Unreachable(reason) => f.write_str(reason),
        }
    }
}

/// One broken outbound link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Absolute URL of the link.
    pub url: Url,
    /// What went wrong.
    pub problem: LinkProblem,
}

/// Everything found on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    /// The audited URL.
    pub url: Url,
    /// HTTP status of the page.
    pub status: u16,
    /// Meta tags by lowercased name.
    pub meta_tags: BTreeMap<String, String>,
    /// Distinct http(s) links found on the page.
    pub links_found: usize,
    /// Links actually fetched (0 when link checking is off).
    pub links_checked: usize,
    /// Links that did not answer 200, in page order.
    pub broken_links: Vec<BrokenLink>,
    /// Document text as a percentage of the raw HTML.
    pub text_to_html_ratio: f64,
}

// ---------------------------------------------------------------------------
// SiteAuditor
// ---------------------------------------------------------------------------

/// Audits one page at a time through a [`PageFetcher`].
#[derive(Debug)]
pub struct SiteAuditor {
    config: AuditConfig,
}

impl SiteAuditor {
    /// Create a new auditor from `config`.
    #[must_use]
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Audit `url`.
    ///
    /// The page is fetched once; links are then fetched one after the other.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Fetch`] when the page itself cannot be fetched.
    /// Link failures never abort the audit; they are reported as broken.
    pub async fn audit<F: PageFetcher>(&self, url: &Url, fetcher: &F) -> Result<AuditReport, AuditError> {
        let page = fetcher.fetch(url).await?;
        tracing::info!(%url, status = page.status, bytes = page.body.len(), "site_audit.page.fetched");

        let parsed = parse_page(url, &page.body);
        let ratio = text_to_html_ratio(parsed.text_chars, page.body.chars().count());
        let links_found = parsed.links.len();

        let to_check: &[Url] = if self.config.check_links {
            let cap = self.config.max_links.unwrap_or(links_found).min(links_found);
            &parsed.links[..cap]
        } else {
            &[]
        };

        let mut broken_links = Vec::new();
        for link in to_check {
            let problem = match fetcher.fetch(link).await {
                Ok(FetchedPage { status: 200, .. }) => continue,
                Ok(FetchedPage { status, .. }) => LinkProblem::Status(status),
                Err(FetchError::Transport { reason }) => LinkProblem::Unreachable(reason),
            };
            tracing::debug!(%link, %problem, "site_audit.link.broken");
            broken_links.push(BrokenLink { url: link.clone(), problem });
        }

        tracing::info!(
            links_found,
            links_checked = to_check.len(),
            broken = broken_links.len(),
            "site_audit.done"
        );
        Ok(AuditReport {
            url: url.clone(),
            status: page.status,
            meta_tags: parsed.meta_tags,
            links_found,
            links_checked: to_check.len(),
            broken_links,
            text_to_html_ratio: ratio,
        })
    }
}
