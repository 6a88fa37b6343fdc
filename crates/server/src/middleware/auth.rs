//! Authentication extractors.
//!
//! Handlers declare their access requirement in their signature:
//! [`RequireAuth`] for any signed-in principal, [`RequireAdmin`] and
//! [`RequireBranch`] for role-specific endpoints, and [`CurrentUser`] for
//! public endpoints that merely want to know who is asking.
//!
//! The route guard verifies the session once per request and stashes the
//! claims in request extensions; these extractors read from there, falling
//! back to cookie verification on public paths the guard waves through.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use branchboard_core::Role;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

use super::session::token_from_headers;

fn claims_from_parts(parts: &Parts, state: &AppState) -> Option<Claims> {
    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Some(claims.clone());
    }
    let token = token_from_headers(&parts.headers)?;
    state.tokens().verify(&token).ok()
}

/// Extractor requiring any authenticated principal.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Claims);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        claims_from_parts(parts, &state)
            .map(Self)
            .ok_or(AppError::Authentication)
    }
}

/// Extractor requiring the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;
        if claims.role == Role::Admin {
            Ok(Self(claims))
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Extractor requiring a branch principal; carries the branch scope.
#[derive(Debug, Clone)]
pub struct RequireBranch {
    /// Verified session claims.
    pub claims: Claims,
    /// The single branch this principal may act for.
    pub branch: String,
}

impl<S> FromRequestParts<S> for RequireBranch
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;
        if claims.role != Role::Branch {
            return Err(AppError::Forbidden);
        }
        // A branch token without a branch claim is malformed; treat it the
        // same as the wrong role rather than trusting it anywhere.
        let Some(branch) = claims.branch.clone() else {
            return Err(AppError::Forbidden);
        };
        Ok(Self { claims, branch })
    }
}

/// Extractor yielding the current principal if one is signed in.
///
/// Never rejects; public endpoints use it to tailor their response.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Claims>);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(Self(claims_from_parts(parts, &state)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    use crate::auth::TOKEN_TTL_SECONDS;
    use crate::config::PortalConfig;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(PortalConfig::test_config(), Arc::new(MemoryStore::new()))
    }

    fn claims(role: Role, branch: Option<&str>) -> Claims {
        let iat = chrono::Utc::now().timestamp();
        Claims {
            sub: "someone@example.net".to_string(),
            role,
            branch: branch.map(str::to_owned),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        }
    }

    fn parts_with(claims: Option<Claims>) -> Parts {
        let mut req = Request::builder().uri("/api/reports").body(()).unwrap();
        if let Some(claims) = claims {
            req.extensions_mut().insert(claims);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_require_auth_reads_extension_claims() {
        let mut parts = parts_with(Some(claims(Role::Admin, None)));
        let RequireAuth(got) = RequireAuth::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert_eq!(got.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_require_auth_rejects_anonymous() {
        let mut parts = parts_with(None);
        let result = RequireAuth::from_request_parts(&mut parts, &state()).await;
        assert!(matches!(result, Err(AppError::Authentication)));
    }

    #[tokio::test]
    async fn test_require_admin_rejects_branch_role() {
        let mut parts = parts_with(Some(claims(Role::Branch, Some("Kolathur"))));
        let result = RequireAdmin::from_request_parts(&mut parts, &state()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_require_branch_yields_scope() {
        let mut parts = parts_with(Some(claims(Role::Branch, Some("Kolathur"))));
        let extracted = RequireBranch::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert_eq!(extracted.branch, "Kolathur");
    }

    #[tokio::test]
    async fn test_require_branch_rejects_admin_and_scopeless_tokens() {
        let mut admin = parts_with(Some(claims(Role::Admin, None)));
        assert!(matches!(
            RequireBranch::from_request_parts(&mut admin, &state()).await,
            Err(AppError::Forbidden)
        ));

        let mut scopeless = parts_with(Some(claims(Role::Branch, None)));
        assert!(matches!(
            RequireBranch::from_request_parts(&mut scopeless, &state()).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_current_user_is_none_for_anonymous() {
        let mut parts = parts_with(None);
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
