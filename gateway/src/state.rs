use crate::clients::auth::AuthClient;
use crate::clients::comments::CommentsClient;
use crate::clients::interceptors::OutboundContext;
use crate::clients::news::NewsClient;
use crate::clients::users::UsersClient;
use crate::context::{AuthToken, Deadline, RequestId};

/// Shared, cloneable handle to every upstream client the gateway holds
/// (§4.C3d). News is real; the rest are honest stand-ins for services out
/// of scope.
pub struct AppState {
    pub news: NewsClient,
    pub auth: AuthClient,
    pub comments: CommentsClient,
    pub users: UsersClient,
}

impl AppState {
    pub fn outbound_context(&self, request_id: &RequestId, auth: &AuthToken, deadline: &Deadline) -> OutboundContext {
        OutboundContext::from_parts(request_id, auth, deadline)
    }
}
