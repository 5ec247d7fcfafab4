use poem::Request;
use poem_openapi::payload::Json;

use crate::errors::ApiError;
use crate::providers::SessionProvider;
use crate::types::internal::context::RequestContext;

/// Result type for endpoints that answer with JSON or an `ApiError`
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the request context for an endpoint
///
/// Never fails: an absent or unusable session yields an unauthenticated
/// context and the coordinator decides whether that is acceptable.
pub async fn create_request_context(req: &Request, session_provider: &SessionProvider) -> RequestContext {
    RequestContext::from_request(req, session_provider).await
}
