use std::time::Instant;

/// Request-id, propagated via response header, downstream headers, and the
/// request-scoped context (§4.C3a.2). Stored as a typed `axum::Extension`
/// rather than a stringly-typed context key — the ecosystem-idiomatic
/// choice the "context key hygiene" design note (§9) recommends when the
/// host language disfavors stringly-typed contextual state.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer token extracted by the AuthBearer middleware (§4.C3a.4). Absent
/// when no/malformed `Authorization` header was sent — authn policy is
/// enforced downstream, not here.
#[derive(Debug, Clone, Default)]
pub struct AuthToken(pub Option<String>);

/// Deadline attached by the Timeout middleware (§4.C3a.5), read by the
/// outbound interceptor (§4.C3d) so it never lengthens a shorter deadline
/// already in force.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(pub Option<Instant>);
