//! Port-bound probing.
//!
//! Infers listener state from whether a fresh outbound TCP connection to the
//! address succeeds. Every connection failure (refused, timed out,
//! unreachable) counts as "not bound"; a transient network blip is
//! indistinguishable from a closed port.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;

/// Default delay between two probes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
/// Default number of probes before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;
/// Default bound on a single connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Polling policy for [`wait_until_up`] and [`wait_until_down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Sleep between two probes.
    pub interval: Duration,
    /// Probes made before reporting a timeout.
    pub max_attempts: u32,
    /// Upper bound on a single connect attempt.
    pub connect_timeout: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// What a wait loop was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Bound,
    Unbound,
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::Bound => write!(f, "accept connections"),
            Expectation::Unbound => write!(f, "refuse connections"),
        }
    }
}

/// The address did not reach the expected state within the policy.
#[derive(Debug, Clone, Error)]
#[error("address {address} did not {expected} after {attempts} attempts every {interval:?}")]
pub struct ProbeTimeout {
    pub address: SocketAddr,
    pub expected: Expectation,
    pub attempts: u32,
    pub interval: Duration,
}

/// Map an unspecified bind address onto the loopback address of the same family.
///
/// A listener bound to `0.0.0.0:port` is reachable locally at `127.0.0.1:port`.
pub fn probe_target(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}

/// Attempt one connection to `addr`, releasing it immediately on success.
pub async fn port_is_bound(addr: SocketAddr) -> bool {
    port_is_bound_within(addr, DEFAULT_CONNECT_TIMEOUT).await
}

/// Like [`port_is_bound`] with an explicit connect timeout.
pub async fn port_is_bound_within(addr: SocketAddr, connect_timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(connect_timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Poll until `addr` accepts a connection.
///
/// Returns the number of probes used.
pub async fn wait_until_up(addr: SocketAddr, policy: &ProbePolicy) -> Result<u32, ProbeTimeout> {
    wait_until(addr, policy, Expectation::Bound).await
}

/// Poll until `addr` refuses connections.
///
/// Returns the number of probes used.
pub async fn wait_until_down(addr: SocketAddr, policy: &ProbePolicy) -> Result<u32, ProbeTimeout> {
    wait_until(addr, policy, Expectation::Unbound).await
}

async fn wait_until(
    addr: SocketAddr,
    policy: &ProbePolicy,
    expected: Expectation,
) -> Result<u32, ProbeTimeout> {
    let target = probe_target(addr);
    let want_bound = expected == Expectation::Bound;

    for attempt in 1..=policy.max_attempts {
        if port_is_bound_within(target, policy.connect_timeout).await == want_bound {
            tracing::debug!(address = %target, attempt, expected = %expected, "Probe confirmed");
            return Ok(attempt);
        }
        tracing::trace!(address = %target, attempt, expected = %expected, "Probe not yet confirmed");
        tokio::time::sleep(policy.interval).await;
    }

    Err(ProbeTimeout {
        address: target,
        expected,
        attempts: policy.max_attempts,
        interval: policy.interval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy(max_attempts: u32) -> ProbePolicy {
        ProbePolicy {
            interval: Duration::from_millis(10),
            max_attempts,
            connect_timeout: Duration::from_millis(200),
        }
    }

    /// Reserve an ephemeral port, then release it so nothing listens there.
    fn closed_port() -> SocketAddr {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    #[test]
    fn test_probe_target_maps_unspecified_to_loopback() {
        let v4: SocketAddr = "0.0.0.0:7701".parse().unwrap();
        assert_eq!(probe_target(v4), "127.0.0.1:7701".parse().unwrap());

        let v6: SocketAddr = "[::]:7701".parse().unwrap();
        assert_eq!(probe_target(v6), "[::1]:7701".parse().unwrap());

        let explicit: SocketAddr = "10.1.2.3:80".parse().unwrap();
        assert_eq!(probe_target(explicit), explicit);
    }

    #[tokio::test]
    async fn test_port_is_bound_reflects_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(port_is_bound(addr).await);

        drop(listener);
        assert!(!port_is_bound(addr).await);
    }

    #[tokio::test]
    async fn test_wait_until_up_succeeds_first_attempt() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let attempts = wait_until_up(addr, &fast_policy(5)).await.unwrap();
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_wait_until_up_times_out_with_address_and_attempts() {
        let addr = closed_port();
        let err = wait_until_up(addr, &fast_policy(3)).await.unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(err.address, addr);
        assert_eq!(err.expected, Expectation::Bound);
        let message = err.to_string();
        assert!(message.contains(&addr.to_string()), "message: {message}");
        assert!(message.contains("3 attempts"), "message: {message}");
    }

    #[tokio::test]
    async fn test_wait_until_down_times_out_while_listener_held() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let err = wait_until_down(addr, &fast_policy(2)).await.unwrap_err();
        assert_eq!(err.expected, Expectation::Unbound);
        assert_eq!(err.attempts, 2);
        drop(listener);
    }

    #[tokio::test]
    async fn test_wait_until_down_observes_release() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            drop(listener);
        });

        let attempts = wait_until_down(addr, &fast_policy(50)).await.unwrap();
        assert!(attempts >= 1);
    }
}
