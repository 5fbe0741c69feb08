//! Per-client request throttling.
//!
//! Each limiter counts requests per client in fixed windows (one minute by
//! default). Once a client has used its budget for the current window,
//! further requests are rejected with `429 Too Many Requests` and a
//! `Retry-After` hint until the window rolls over. Throttling runs as route
//! middleware, so rejected requests never reach the license core.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use parking_lot::Mutex;
use tracing::warn;

use crate::error::ApiError;

/// Bucket key shared by requests that carry no peer address.
const UNKNOWN_CLIENT: &str = "unknown";

/// Stale windows are swept once the table grows past this many clients.
const SWEEP_THRESHOLD: usize = 4096;

/// Request budgets for the throttled routes. `None` disables throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    /// Requests per minute on `POST /auth`.
    pub auth_per_minute: Option<u32>,
    /// Requests per minute on `GET /verify`.
    pub verify_per_minute: Option<u32>,
}

impl RateLimits {
    /// No throttling on any route.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            auth_per_minute: None,
            verify_per_minute: None,
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            auth_per_minute: Some(5),
            verify_per_minute: Some(10),
        }
    }
}

#[derive(Debug)]
struct WindowState {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<String, WindowState>>,
}

impl FixedWindowLimiter {
    /// Creates a limiter allowing `limit` requests per `window`.
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a limiter allowing `limit` requests per minute.
    #[must_use]
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Records a request from `client` now.
    ///
    /// Returns `Err(retry_after)` if the client's budget is spent.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    /// Records a request from `client` at `now`.
    pub fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let mut clients = self.clients.lock();

        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, state| now.saturating_duration_since(state.started) < window);
        }

        let state = clients
            .entry(client.to_string())
            .or_insert(WindowState { started: now, count: 0 });

        if now.saturating_duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }

        if state.count >= self.limit {
            let elapsed = now.saturating_duration_since(state.started);
            return Err(self.window.saturating_sub(elapsed));
        }
        state.count += 1;
        Ok(())
    }

    /// Number of clients currently tracked.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware rejecting requests once the caller's window budget is spent.
pub async fn throttle(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&req);
    if let Err(retry_after) = limiter.check(&client) {
        warn!(
            "Rate limit hit: client={} path={} retry_after={}s",
            client,
            req.uri().path(),
            retry_after.as_secs()
        );
        return Err(ApiError::RateLimited {
            retry_after_secs: retry_after.as_secs().max(1),
        });
    }
    Ok(next.run(req).await)
}
