//! Wiremock servers need a loopback listener. Sandboxed CI runners sometimes
//! refuse one; tests then skip unless `EMOJI_DL_REQUIRE_SOCKET_TESTS` is set.

use std::net::{Ipv4Addr, TcpListener};

use wiremock::MockServer;

const STRICT_ENV_VAR: &str = "EMOJI_DL_REQUIRE_SOCKET_TESTS";

fn strict() -> bool {
    std::env::var(STRICT_ENV_VAR)
        .is_ok_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn loopback_bind_error() -> Option<std::io::Error> {
    TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).err()
}

/// Starts a mock Discord API/CDN server, or returns `None` when loopback
/// sockets are unavailable and skipping is allowed.
///
/// # Panics
///
/// Panics instead of skipping when `EMOJI_DL_REQUIRE_SOCKET_TESTS` is set.
pub async fn mock_server_or_skip() -> Option<MockServer> {
    let Some(error) = loopback_bind_error() else {
        return Some(MockServer::start().await);
    };
    assert!(
        !strict(),
        "mock Discord server unavailable: cannot bind 127.0.0.1 ({error}); unset {STRICT_ENV_VAR} to skip"
    );
    eprintln!("skipping: mock Discord server unavailable, cannot bind 127.0.0.1 ({error})");
    None
}
