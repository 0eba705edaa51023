//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use liveness_server::net::ProbePolicy;

/// Probe policy short enough to keep failing paths fast.
pub fn fast_policy() -> ProbePolicy {
    ProbePolicy {
        interval: Duration::from_millis(20),
        max_attempts: 100,
        connect_timeout: Duration::from_millis(200),
    }
}

/// Non-pooled client so `stop` never waits on an idle keep-alive connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// GET `path` on `addr`, returning status and body.
pub async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    let res = client()
        .get(format!("http://{}{}", addr, path))
        .send()
        .await
        .expect("server unreachable");
    let status = res.status().as_u16();
    let body = res.text().await.unwrap();
    (status, body)
}

pub fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}
