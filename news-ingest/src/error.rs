use news_domain::DomainError;

/// Internal error type for the ingestion engine: a `thiserror` enum
/// wrapping the transport/storage errors the pipeline actually produces,
/// with a `General`/`Internal` catch-all for anything else.
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no sources configured")]
    NoSources,

    #[error("invalid page token")]
    InvalidCursor,

    #[error("not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;

/// Storage/internal errors translate 1:1 into domain errors at the
/// Facade boundary (§7 propagation policy: "Store → Facade: storage errors
/// are translated 1:1 to domain errors; other errors are wrapped and
/// logged at ERROR").
impl From<AggregatorError> for DomainError {
    fn from(err: AggregatorError) -> Self {
        match err {
            AggregatorError::InvalidCursor => DomainError::InvalidCursor,
            AggregatorError::NotFound => DomainError::NotFound,
            AggregatorError::InvalidArgument(msg) => DomainError::InvalidArgument(msg),
            other => {
                tracing::error!(error = %other, "wrapping storage/internal error as domain Internal");
                DomainError::Internal
            }
        }
    }
}
