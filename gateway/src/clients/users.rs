use crate::clients::interceptors::OutboundContext;
use crate::error::UpstreamKind;

/// No user-profile service backs this deployment (out of scope, §4
/// Non-goals). `update_mask` is accepted here for signature parity with
/// where a real client would need it.
#[derive(Clone, Default)]
pub struct UsersClient;

impl UsersClient {
    pub async fn get(&self, _ctx: &OutboundContext, _id: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn update(&self, _ctx: &OutboundContext, _id: &str, _update_mask: &[String]) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn presign_avatar(&self, _ctx: &OutboundContext, _id: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn confirm_avatar(&self, _ctx: &OutboundContext, _id: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }
}
