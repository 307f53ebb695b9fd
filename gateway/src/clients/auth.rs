use crate::clients::interceptors::OutboundContext;
use crate::error::UpstreamKind;

/// No auth service backs this deployment (out of scope, §4 Non-goals).
/// Exercises the `unimplemented`/501 branch of the error-mapping table
/// rather than silently no-op-succeeding.
#[derive(Clone, Default)]
pub struct AuthClient;

impl AuthClient {
    pub async fn register(&self, _ctx: &OutboundContext, _username: &str, _password: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn login(&self, _ctx: &OutboundContext, _username: &str, _password: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn refresh(&self, _ctx: &OutboundContext) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn revoke(&self, _ctx: &OutboundContext) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn validate(&self, _ctx: &OutboundContext) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }
}
