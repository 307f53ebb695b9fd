use crate::clients::interceptors::OutboundContext;
use crate::error::UpstreamKind;

/// No comments service backs this deployment (out of scope, §4 Non-goals).
#[derive(Clone, Default)]
pub struct CommentsClient;

impl CommentsClient {
    pub async fn create(&self, _ctx: &OutboundContext, _news_id: &str, _body: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn list_for_news(&self, _ctx: &OutboundContext, _news_id: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn get(&self, _ctx: &OutboundContext, _id: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }

    pub async fn replies(&self, _ctx: &OutboundContext, _id: &str) -> Result<(), UpstreamKind> {
        Err(UpstreamKind::Unimplemented)
    }
}
