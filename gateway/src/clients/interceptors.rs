use std::time::{Duration, Instant};

use reqwest::RequestBuilder;
use tracing::info;

use crate::context::{AuthToken, Deadline, RequestId};
use crate::error::UpstreamKind;

/// Everything an outbound client call needs from the inbound request's
/// context, carried explicitly rather than read back out of `axum`
/// extensions inside client code (§4.C3d).
#[derive(Debug, Clone, Default)]
pub struct OutboundContext {
    pub request_id: Option<String>,
    pub auth_token: Option<String>,
    pub deadline: Option<Deadline>,
}

impl OutboundContext {
    pub fn from_parts(request_id: &RequestId, auth: &AuthToken, deadline: &Deadline) -> Self {
        Self {
            request_id: Some(request_id.0.clone()),
            auth_token: auth.0.clone(),
            deadline: Some(*deadline),
        }
    }

    /// Propagates `x-request-id`, `authorization`, and `user-agent` onto the
    /// outbound request (§4.C3d.1).
    pub fn apply(&self, mut builder: RequestBuilder) -> RequestBuilder {
        if let Some(id) = &self.request_id {
            builder = builder.header("x-request-id", id);
        }
        if let Some(token) = &self.auth_token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder = builder.header("user-agent", "news-gateway/0.1");
        builder
    }

    /// The remaining budget for this call: the caller's own timeout,
    /// shortened further only if the inbound deadline is tighter — never
    /// lengthened (§4.C3d.2).
    pub fn remaining(&self, own_timeout: Duration) -> Duration {
        match self.deadline.and_then(|d| d.0) {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                left.min(own_timeout)
            }
            None => own_timeout,
        }
    }
}

/// Runs `call`, emitting exactly one `"grpc"`-style INFO record with the
/// resolved upstream kind and call duration, regardless of outcome
/// (§4.C3d.3 — named for the RPC semantics this call carries even though
/// the wire format here is HTTP/JSON).
pub async fn with_outbound_logging<F, Fut, T>(method: &str, call: F) -> Result<T, UpstreamKind>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, UpstreamKind>>,
{
    let start = Instant::now();
    let result = call().await;
    let dur_ms = start.elapsed().as_secs_f64() * 1000.0;
    let code = match &result {
        Ok(_) => "ok",
        Err(kind) => kind.http().1,
    };
    info!(target: "grpc", method, code, dur_ms, "grpc");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant 11: if the inbound deadline D1 is tighter than the
    /// client's own configured timeout D2, the outbound call is bounded
    /// by D1, never lengthened to D2.
    #[test]
    fn never_lengthens_a_tighter_inbound_deadline() {
        let tight = Instant::now() + Duration::from_millis(20);
        let ctx = OutboundContext {
            request_id: None,
            auth_token: None,
            deadline: Some(Deadline(Some(tight))),
        };
        let own_timeout = Duration::from_secs(30);
        let remaining = ctx.remaining(own_timeout);
        assert!(remaining <= Duration::from_millis(20));
    }

    #[test]
    fn no_inbound_deadline_uses_own_timeout() {
        let ctx = OutboundContext::default();
        let own_timeout = Duration::from_millis(250);
        assert_eq!(ctx.remaining(own_timeout), own_timeout);
    }
}
