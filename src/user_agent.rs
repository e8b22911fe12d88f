//! Shared User-Agent string for gateway requests.
//!
//! Single source for the agent identity so landing-page fetches, robots
//! checks, and PDF downloads all present the same token (RFC 9308).

/// Default User-Agent for gateway requests (identifies the tool).
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("scifetch/{version} (academic-research-tool)")
}
