//! Bearer authentication.
//!
//! `authenticate` runs on every request. It never rejects for a bad token on
//! its own: it records the outcome in a [`SecurityContext`] and lets the
//! request through. Route-level `require_auth` / `require_admin` decide.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use petconnect_core::models::auth::{PublicPrincipal, Role};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::services::auth::{TokenRejection, resolve_token};

/// The authenticated principal, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub PublicPrincipal);

/// Per-request authentication outcome. Lives only as long as the request.
#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    user: Option<AuthenticatedUser>,
    rejection: Option<TokenRejection>,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self {
            user: Some(user),
            rejection: None,
        }
    }

    pub fn rejected(rejection: TokenRejection) -> Self {
        Self {
            user: None,
            rejection: Some(rejection),
        }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    /// Why a presented token was not accepted, if one was presented.
    pub fn rejection(&self) -> Option<&TokenRejection> {
        self.rejection.as_ref()
    }

    /// The principal, or the 401 a protected route should answer with.
    fn require_user(&self) -> AppResult<&AuthenticatedUser> {
        if let Some(user) = &self.user {
            return Ok(user);
        }
        Err(match &self.rejection {
            Some(rejection) => rejection.clone().into_error(),
            None => AppError::authentication_required(),
        })
    }
}

/// The token of an `Authorization: Bearer <token>` header, if present and
/// well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Axum middleware: resolve the bearer token (if any) into a principal and
/// attach a [`SecurityContext`] (plus [`AuthenticatedUser`] on success).
///
/// Only store failures end the request here.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).map(str::to_owned);

    let context = match token {
        None => SecurityContext::anonymous(),
        Some(token) => match resolve_token(&state, &token).await? {
            Ok(principal) => {
                SecurityContext::authenticated(AuthenticatedUser(principal.to_public()))
            }
            Err(rejection) => {
                tracing::debug!(?rejection, path = %request.uri().path(), "bearer token not accepted");
                SecurityContext::rejected(rejection)
            }
        },
    };

    if let Some(user) = context.user() {
        request.extensions_mut().insert(user.clone());
    }
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

fn context_of(request: &Request) -> SecurityContext {
    request
        .extensions()
        .get::<SecurityContext>()
        .cloned()
        .unwrap_or_default()
}

/// Route layer: 401 unless the request carries an authenticated principal.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, AppError> {
    context_of(&request).require_user()?;
    Ok(next.run(request).await)
}

/// Route layer: 401 when unauthenticated, 403 unless the principal is `ADMIN`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let context = context_of(&request);
    let AuthenticatedUser(principal) = context.require_user()?;
    if !principal.role.has_privilege(Role::Admin) {
        return Err(AppError::Forbidden("Admin role required".into()));
    }
    Ok(next.run(request).await)
}
