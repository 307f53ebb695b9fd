pub mod auth;
pub mod logging;
pub mod recover;
pub mod request_id;
pub mod timeout;
