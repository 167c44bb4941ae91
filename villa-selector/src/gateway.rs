use async_trait::async_trait;
use chrono::NaiveDate;

/// What the server said about a submission, as decoded by the transport
/// adapter. The selector only ever sees one of these four shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    /// Well-formed success body (`{ "ok": true }`).
    Accepted,
    /// Well-formed failure body with the server-supplied message, e.g. a
    /// booking conflict or a validation error.
    Rejected(String),
    /// Login redirect or 401: the session is missing or expired.
    Unauthenticated,
    /// The body could not be decoded (non-JSON, unexpected shape).
    Malformed,
}

/// The request never reached a response, e.g. connection refused or dropped.
#[derive(Debug, thiserror::Error)]
#[error("network error: {0}")]
pub struct NetworkError(pub String);

/// Transport seam between the selector and the reservation authority. The
/// production implementation wraps the HTTP call to `/api/reserve`; tests
/// use a stub.
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    async fn submit(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GatewayResponse, NetworkError>;
}
