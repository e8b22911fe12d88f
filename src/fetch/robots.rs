//! Robots-exclusion policy loading and path checks.
//!
//! Parses `User-agent:` groups with `Disallow:` prefix rules. A group naming
//! the configured agent takes precedence over the wildcard group. Loading is
//! deliberately forgiving: a gateway whose robots.txt cannot be fetched or
//! parsed yields no policy, and the orchestrator decides what that means
//! (blocked unless the ignore-robots override is set).

use tracing::{debug, instrument, warn};

use super::client::PageFetcher;
use super::error::FetchError;

/// A parsed robots-exclusion declaration for one host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    groups: Vec<AgentGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AgentGroup {
    /// Lowercased agent tokens this group applies to ("*" for the wildcard).
    agents: Vec<String>,
    /// Path prefixes denied to those agents.
    disallow: Vec<String>,
}

impl AgentGroup {
    fn matches(&self, agent_lower: &str) -> bool {
        self.agents
            .iter()
            .any(|token| token != "*" && agent_lower.contains(token.as_str()))
    }

    fn is_wildcard(&self) -> bool {
        self.agents.iter().any(|token| token == "*")
    }

    fn denies(&self, path: &str) -> bool {
        self.disallow.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl RobotsPolicy {
    /// Fetches and parses the robots declaration at `robots_url`.
    ///
    /// Returns `None` when the declaration cannot be retrieved; a 404 means
    /// the host declares nothing, which is an empty (allow-all) policy.
    #[instrument(skip(fetcher))]
    pub async fn fetch(fetcher: &PageFetcher, robots_url: &str) -> Option<Self> {
        match fetcher.get_text(robots_url).await {
            Ok(body) => Some(Self::parse(&body)),
            Err(FetchError::HttpStatus { status: 404, .. }) => {
                debug!("no robots.txt published, allowing all");
                Some(Self::default())
            }
            Err(e) => {
                warn!(error = %e, "could not load robots policy");
                None
            }
        }
    }

    /// Parses a robots.txt body into agent groups.
    ///
    /// Consecutive `User-agent:` lines share one group; `Disallow:` lines
    /// attach to the current group; comments and unknown directives are
    /// ignored. An empty `Disallow:` value allows everything.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let mut groups: Vec<AgentGroup> = Vec::new();
        let mut current = AgentGroup::default();
        let mut in_agent_run = false;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if let Some(agent) = strip_directive(line, "User-agent:") {
                if !in_agent_run {
                    if !current.agents.is_empty() {
                        groups.push(std::mem::take(&mut current));
                    }
                    in_agent_run = true;
                }
                current.agents.push(agent.to_lowercase());
            } else if let Some(path) = strip_directive(line, "Disallow:") {
                in_agent_run = false;
                if !path.is_empty() {
                    current.disallow.push(normalize_path(path));
                }
            } else {
                // Allow:, Crawl-delay:, Sitemap:, ... end an agent run but are
                // otherwise not interpreted.
                in_agent_run = false;
            }
        }
        if !current.agents.is_empty() {
            groups.push(current);
        }

        Self { groups }
    }

    /// Whether `agent` may fetch `url` under this policy.
    ///
    /// The most specific applicable group wins: a group naming the agent is
    /// consulted first, then the wildcard group; no applicable group means
    /// allowed. A URL whose path cannot be determined is treated as blocked.
    #[must_use]
    pub fn allows(&self, agent: &str, url: &str) -> bool {
        let Some(path) = path_of(url) else {
            return false;
        };
        let agent_lower = agent.to_lowercase();

        if let Some(group) = self.groups.iter().find(|g| g.matches(&agent_lower)) {
            return !group.denies(&path);
        }
        if let Some(group) = self.groups.iter().find(|g| g.is_wildcard()) {
            return !group.denies(&path);
        }
        true
    }
}

fn strip_directive<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let (head, tail) = line.split_at_checked(directive.len())?;
    head.eq_ignore_ascii_case(directive).then(|| tail.trim())
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn path_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let path = parsed.path();
    Some(if path.is_empty() { "/".to_string() } else { path.to_string() })
}
