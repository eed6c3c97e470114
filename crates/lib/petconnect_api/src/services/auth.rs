//! Authentication service: registration, login and bearer-token resolution.

use petconnect_core::auth::password::hash_password;
use petconnect_core::auth::{AuthResult, CredentialVerifier, VerifyResult};
use petconnect_core::models::auth::{NewPrincipal, Principal, Role};
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, RegisterRequest, ValidateTokenResponse};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 50;

/// Why a presented bearer token did not yield a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    Invalid(String),
    /// Signature and expiry were fine but nobody answers to the subject.
    UnknownPrincipal,
}

impl TokenRejection {
    pub fn into_error(self) -> AppError {
        match self {
            TokenRejection::Expired => AppError::token_expired(),
            TokenRejection::Invalid(reason) => AppError::invalid_token(reason),
            TokenRejection::UnknownPrincipal => {
                AppError::invalid_token("Token subject is not a registered principal")
            }
        }
    }
}

/// Validate `token` and load the principal it names.
///
/// The stored role is authoritative; the role claim only reflects the role
/// at issue time. Store failures are the only `Err`.
pub async fn resolve_token(
    state: &AppState,
    token: &str,
) -> AppResult<Result<Principal, TokenRejection>> {
    let subject = match state.tokens.validate(token) {
        AuthResult::Valid { subject, .. } => subject,
        AuthResult::Expired => return Ok(Err(TokenRejection::Expired)),
        AuthResult::Invalid(reason) => return Ok(Err(TokenRejection::Invalid(reason.to_string()))),
    };
    match state
        .store
        .find_principal(state.config.identity_key, &subject)
        .await?
    {
        Some(principal) => Ok(Ok(principal)),
        None => {
            debug!(key = %state.config.identity_key, "token subject has no principal");
            Ok(Err(TokenRejection::UnknownPrincipal))
        }
    }
}

/// Mint a token for `principal` and wrap it in the login/registration body.
fn build_auth_response(state: &AppState, principal: &Principal) -> AppResult<AuthResponse> {
    let subject = state.config.identity_key.of(principal);
    let token = state
        .tokens
        .codec()
        .issue(subject, principal.role, state.config.token_ttl)?;
    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.token_ttl.num_seconds(),
        user: principal.to_public(),
    })
}

/// Check credentials under the configured identity profile and issue a token.
///
/// Unknown principals and wrong passwords get the same 401.
pub async fn login(state: &AppState, lookup_key: &str, password: &str) -> AppResult<AuthResponse> {
    let key = state.config.identity_key;
    let verifier = CredentialVerifier::new(state.store.as_ref(), key);

    match verifier.verify(lookup_key, password).await? {
        VerifyResult::Verified(principal) => {
            info!(principal_id = %principal.id, role = %principal.role, "login succeeded");
            build_auth_response(state, &principal)
        }
        VerifyResult::NotFound | VerifyResult::Mismatch => {
            info!(key = %key, "login rejected");
            Err(AppError::invalid_credentials(key))
        }
    }
}

/// Trimmed username and lowercased email, or the first rule the request breaks.
fn check_registration(req: &RegisterRequest) -> AppResult<(String, String)> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }

    let email = req.email.trim().to_lowercase();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
    if !well_formed {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok((username.to_string(), email))
}

/// Create a principal and log them straight in.
///
/// The first principal ever registered becomes `ADMIN`; everyone after is a
/// `USER`. Clients cannot choose their role.
pub async fn register(state: &AppState, req: &RegisterRequest) -> AppResult<AuthResponse> {
    let (username, email) = check_registration(req)?;

    // Cheap duplicate checks before paying for bcrypt; the store re-checks.
    if state.store.find_principal_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if state.store.find_principal_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let role = if state.store.principal_count().await? == 0 {
        Role::Admin
    } else {
        Role::User
    };
    let password_hash = hash_password(&req.password, state.config.bcrypt_cost)?;

    let principal = state
        .store
        .create_principal(NewPrincipal {
            username,
            email,
            password_hash,
            role,
        })
        .await?;
    info!(principal_id = %principal.id, role = %principal.role, "principal registered");

    build_auth_response(state, &principal)
}

/// Report whether `token` currently authenticates anyone. Never an error
/// for bad tokens.
pub async fn validate(state: &AppState, token: Option<&str>) -> AppResult<ValidateTokenResponse> {
    let Some(token) = token else {
        return Ok(ValidateTokenResponse {
            valid: false,
            principal: None,
        });
    };
    Ok(match resolve_token(state, token).await? {
        Ok(principal) => ValidateTokenResponse {
            valid: true,
            principal: Some(principal.to_public()),
        },
        Err(_) => ValidateTokenResponse {
            valid: false,
            principal: None,
        },
    })
}
