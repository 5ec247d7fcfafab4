use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::errors::InternalError;
use crate::errors::internal::{AccessError, SessionError};
use crate::providers::SessionProvider;
use crate::types::internal::{ActorContext, LoginEntry};

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the request metadata and, when a session resolved, the acting identity.
/// Nothing below the API layer reads request state from anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Raw User-Agent header, only used to guess a system label
    pub user_agent: Option<String>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Resolved identity, `None` when unauthenticated
    pub actor: Option<ActorContext>,

    /// Hash of the session that authenticated this request
    pub session_id: Option<String>,

    /// Set when the bearer token could not be checked against the store
    pub session_failure: Option<String>,
}

impl RequestContext {
    /// Create an unauthenticated API context
    pub fn new() -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::new(),
            source: RequestSource::API,
            actor: None,
            session_id: None,
            session_failure: None,
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        tracing::debug!("Creating CLI context for command {}", command_name);
        Self {
            source: RequestSource::CLI,
            ..Self::new()
        }
    }

    /// Build the context for an incoming request
    ///
    /// Reads the client address and User-Agent, and resolves the bearer session
    /// token to an actor. A missing, unknown or expired token leaves the context
    /// unauthenticated. A store failure while resolving is kept on the context
    /// and surfaces from `require_actor` as an infrastructure error.
    pub async fn from_request(req: &Request, session_provider: &SessionProvider) -> Self {
        let mut ctx = Self::new();
        ctx.ip_address = Self::extract_ip_address(req);
        ctx.user_agent = req.header("User-Agent").map(str::to_string);

        if let Some(bearer) = Self::extract_bearer(req) {
            match session_provider.resolve(&bearer.token).await {
                Ok(Some((session_id, actor))) => {
                    ctx = ctx.with_actor(actor);
                    ctx.session_id = Some(session_id);
                }
                Ok(None) => {
                    tracing::debug!("Request {} carried an unknown or expired session", ctx.request_id);
                }
                Err(e) => {
                    tracing::error!("Failed to resolve session for request {}: {}", ctx.request_id, e);
                    ctx.session_failure = Some(e.to_string());
                }
            }
        }

        tracing::trace!("Request context created: {:?}", ctx);

        ctx
    }

    fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                if let Ok(ip) = ip.trim().parse() {
                    return Some(ip);
                }
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            if let Ok(ip) = real_ip.trim().parse() {
                return Some(ip);
            }
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_actor(mut self, actor: ActorContext) -> Self {
        self.actor = Some(actor);
        self
    }

    /// The resolved actor, or Unauthenticated pointing at `entry`
    ///
    /// A session lookup that failed at the store is reported as such rather
    /// than as a missing login.
    pub fn require_actor(&self, entry: LoginEntry) -> Result<&ActorContext, InternalError> {
        if let Some(actor) = self.actor.as_ref() {
            return Ok(actor);
        }

        match &self.session_failure {
            Some(message) => Err(SessionError::ResolutionFailed {
                message: message.clone(),
            }
            .into()),
            None => Err(AccessError::Unauthenticated { entry }.into()),
        }
    }

    /// Client address as stored on records
    pub fn ip_string(&self) -> Option<String> {
        self.ip_address.map(|ip| ip.to_string())
    }

    /// Label used in log lines
    pub fn actor_label(&self) -> String {
        match &self.actor {
            Some(actor) => format!("{}#{}", actor.username, actor.user_id),
            None => match self.source {
                RequestSource::API => "anonymous".to_string(),
                RequestSource::CLI => "cli".to_string(),
            },
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
