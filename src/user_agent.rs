//! Shared User-Agent string for catalog and asset HTTP clients.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/emoji-downloader";

/// Default User-Agent sent on every request (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("emoji-downloader/{version} (+{PROJECT_UA_URL})")
}
