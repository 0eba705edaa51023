//! The liveness server and its start/stop state machine.
//!
//! `start` binds, spawns the serving task and returns only once a connect
//! probe succeeds. `stop` closes the listener, waits for the serving task to
//! exit and returns only once a connect probe is refused.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::LivenessConfig;
use crate::http::diagnostics::DiagnosticsState;
use crate::http::{HttpServer, PlainStatus, StatusState, StatusTemplate};
use crate::lifecycle::error::{LifecycleError, Operation};
use crate::lifecycle::{OneShot, ServerState};
use crate::net::{listener, probe, ProbePolicy};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`LivenessServer`].
pub struct LivenessServerBuilder {
    host: String,
    port: u16,
    label: String,
    policy: ProbePolicy,
    stop_policy: Option<ProbePolicy>,
    template: Arc<dyn StatusTemplate>,
    diagnostics: bool,
    request_timeout: Duration,
}

impl LivenessServerBuilder {
    /// Pre-fill a builder from loaded configuration.
    pub fn from_config(config: &LivenessConfig) -> Self {
        LivenessServer::builder(
            config.listener.host.clone(),
            config.listener.port,
            config.label.clone(),
        )
        .probe_policy(config.probe.policy())
        .diagnostics(config.diagnostics.enabled)
        .request_timeout(Duration::from_secs(config.listener.request_timeout_secs))
    }

    /// Connection check policy for both `start` and `stop`.
    pub fn probe_policy(mut self, policy: ProbePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the policy `stop` uses to confirm the address is released.
    pub fn stop_policy(mut self, policy: ProbePolicy) -> Self {
        self.stop_policy = Some(policy);
        self
    }

    pub fn template(mut self, template: impl StatusTemplate) -> Self {
        self.template = Arc::new(template);
        self
    }

    /// Expose `/debug/status`.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Construct the server without starting it.
    pub fn build(self) -> LivenessServer {
        let address = join_host_port(&self.host, self.port);
        let label: Arc<str> = Arc::from(self.label);
        let (state, state_rx) = watch::channel(ServerState::Created);
        let local_addr = Arc::new(OnceLock::new());
        let stop_requested = OneShot::new();

        let diagnostics = self.diagnostics.then(|| DiagnosticsState {
            label: label.clone(),
            address: Arc::from(address.as_str()),
            local_addr: local_addr.clone(),
            state: state_rx,
            stop_requested: stop_requested.clone(),
            created_at: Instant::now(),
        });
        let status = StatusState {
            label: label.clone(),
            template: self.template,
        };
        let http = HttpServer::new(status, diagnostics, self.request_timeout);

        tracing::info!(
            address = %address,
            label = %label,
            "Liveness server created"
        );

        LivenessServer {
            address,
            label,
            stop_policy: self.stop_policy.unwrap_or(self.policy),
            policy: self.policy,
            http,
            state,
            local_addr,
            ready: OneShot::new(),
            done: OneShot::new(),
            stop_requested,
            close: OneShot::new(),
        }
    }

    /// Construct and start the server.
    pub async fn launch(self) -> Result<LivenessServer, LifecycleError> {
        let server = self.build();
        server.start().await?;
        Ok(server)
    }
}

/// Announces liveness for a labeled instance on one address.
///
/// Not restartable: once stopped (or failed) the instance stays that way.
pub struct LivenessServer {
    address: String,
    label: Arc<str>,
    policy: ProbePolicy,
    stop_policy: ProbePolicy,
    http: HttpServer,
    state: watch::Sender<ServerState>,
    local_addr: Arc<OnceLock<SocketAddr>>,
    ready: OneShot,
    done: OneShot,
    stop_requested: OneShot,
    /// Serving handle: firing it makes the accept loop return.
    close: OneShot,
}

impl LivenessServer {
    pub fn builder(
        host: impl Into<String>,
        port: u16,
        label: impl Into<String>,
    ) -> LivenessServerBuilder {
        LivenessServerBuilder {
            host: host.into(),
            port,
            label: label.into(),
            policy: ProbePolicy::default(),
            stop_policy: None,
            template: Arc::new(PlainStatus),
            diagnostics: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Construct with defaults and start immediately.
    pub async fn launch(
        host: impl Into<String>,
        port: u16,
        label: impl Into<String>,
    ) -> Result<Self, LifecycleError> {
        Self::builder(host, port, label).launch().await
    }

    /// Bind, spawn the serving task and wait until the address accepts connections.
    ///
    /// Repeat calls do not bind again: they wait for an in-flight `start` to
    /// settle, then return `Ok` if the server got past `Starting` and
    /// [`LifecycleError::Failed`] if it did not.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == ServerState::Created {
                *state = ServerState::Starting;
                true
            } else {
                false
            }
        });
        if !claimed {
            let mut state_rx = self.state.subscribe();
            let _ = state_rx.wait_for(|state| *state != ServerState::Starting).await;
            let settled = self.state();
            tracing::debug!(address = %self.address, state = %settled, "Start ignored, already started");
            return match settled {
                ServerState::Failed => Err(LifecycleError::Failed {
                    address: self.address.clone(),
                }),
                _ => Ok(()),
            };
        }

        let (listener, local_addr) = match listener::bind(&self.address).await {
            Ok(bound) => bound,
            Err(e) => {
                tracing::error!(address = %self.address, error = %e, "Bind failed");
                self.state.send_replace(ServerState::Failed);
                return Err(e.into());
            }
        };
        let _ = self.local_addr.set(local_addr);

        self.spawn_serving_task(listener);

        match probe::wait_until_up(local_addr, &self.policy).await {
            Ok(attempts) => {
                self.ready.fire();
                self.state.send_replace(ServerState::Listening);
                tracing::info!(
                    address = %local_addr,
                    label = %self.label,
                    attempts,
                    "Liveness server ready"
                );
                Ok(())
            }
            Err(source) => {
                tracing::error!(address = %local_addr, error = %source, "Server never became reachable");
                self.close.fire();
                self.done.wait().await;
                self.state.send_replace(ServerState::Failed);
                Err(LifecycleError::Timeout {
                    operation: Operation::Start,
                    source,
                })
            }
        }
    }

    /// Close the listener, wait for the serving task, then wait until the
    /// address refuses connections.
    ///
    /// Fails with [`LifecycleError::NotStarted`] before `start`. While a
    /// `start` is in flight, waits for it to settle first. A concurrent or
    /// repeated `stop` waits for teardown to finish and returns `Ok`.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        if *self.state.borrow() == ServerState::Created {
            return Err(LifecycleError::NotStarted {
                address: self.address.clone(),
            });
        }
        self.stop_requested.fire();

        let mut state_rx = self.state.subscribe();
        let _ = state_rx.wait_for(|state| *state != ServerState::Starting).await;

        let claimed = self.state.send_if_modified(|state| {
            if *state == ServerState::Listening {
                *state = ServerState::StopRequested;
                true
            } else {
                false
            }
        });
        if !claimed {
            let _ = state_rx.wait_for(|state| state.is_terminal()).await;
            return Ok(());
        }

        let Some(local_addr) = self.local_addr.get().copied() else {
            // Listening is only reached after the address is recorded.
            self.state.send_replace(ServerState::Failed);
            return Ok(());
        };

        self.close.fire();
        tracing::info!(address = %local_addr, "Listener closed");
        self.done.wait().await;
        tracing::info!(address = %local_addr, "Serving task exited");

        match probe::wait_until_down(local_addr, &self.stop_policy).await {
            Ok(attempts) => {
                self.state.send_replace(ServerState::Stopped);
                tracing::info!(address = %local_addr, attempts, "Liveness server stopped");
                Ok(())
            }
            Err(source) => {
                tracing::error!(address = %local_addr, error = %source, "Socket was not released");
                self.state.send_replace(ServerState::Failed);
                Err(LifecycleError::Timeout {
                    operation: Operation::Stop,
                    source,
                })
            }
        }
    }

    /// Non-blocking: has `stop` been called?
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.is_set()
    }

    fn spawn_serving_task(&self, listener: TcpListener) {
        let server = self.http.clone();
        let close = self.close.clone();
        let done = FireOnDrop(self.done.clone());
        let address = self.address.clone();

        tokio::spawn(async move {
            let _done = done;
            if let Err(e) = server.run(listener, async move { close.wait().await }).await {
                tracing::debug!(address = %address, error = %e, "Accept loop returned an error");
            }
        });
    }

    /// Configured `host:port`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Address actually bound, once `start` has bound it.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Set once the listener is confirmed reachable.
    pub fn ready_signal(&self) -> &OneShot {
        &self.ready
    }

    /// Set once the serving task has exited.
    pub fn done_signal(&self) -> &OneShot {
        &self.done
    }

    /// Set once `stop` has been called. Long-running tasks can poll it to exit cooperatively.
    pub fn stop_requested_signal(&self) -> &OneShot {
        &self.stop_requested
    }
}

impl Drop for LivenessServer {
    fn drop(&mut self) {
        // Let a still-running serving task exit instead of leaking the socket.
        self.close.fire();
    }
}

/// Fires the signal when dropped, including when the serving task panics.
struct FireOnDrop(OneShot);

impl Drop for FireOnDrop {
    fn drop(&mut self) {
        self.0.fire();
    }
}

/// `host:port`, bracketing bare IPv6 hosts.
fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
