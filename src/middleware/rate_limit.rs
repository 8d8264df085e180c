// middleware/rate_limit.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// In-memory sliding-window limiter keyed by caller identity. Process-local
/// state is acceptable for single-instance deployment; multi-instance setups
/// back the same contract with a shared store.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        let mut requests = self.requests.lock().unwrap();
        let now = Instant::now();

        let entry = requests.entry(key.to_string()).or_default();

        // Drop requests that have fallen out of the window.
        entry.retain(|&timestamp| now.duration_since(timestamp) < self.window);

        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            false
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_id = get_client_id(&request);

    if !limiter.is_allowed(&client_id) {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(request).await)
}

fn get_client_id(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

/// Limit for the OTP request/verify endpoints.
pub fn auth_rate_limiter() -> RateLimiter {
    RateLimiter::new(10, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.is_allowed("ip-1"));
        assert!(limiter.is_allowed("ip-1"));
        assert!(limiter.is_allowed("ip-1"));
        assert!(!limiter.is_allowed("ip-1"));
    }

    #[test]
    fn keys_are_isolated() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.is_allowed("ip-1"));
        assert!(!limiter.is_allowed("ip-1"));
        assert!(limiter.is_allowed("ip-2"));
    }

    #[test]
    fn window_expiry_frees_capacity() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        assert!(limiter.is_allowed("ip-1"));
        assert!(!limiter.is_allowed("ip-1"));
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.is_allowed("ip-1"));
    }
}
