use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    exp: usize,
}

/// The authenticated principal, stashed in request extensions by
/// [`authenticate`] when a valid bearer token is present.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Middleware that resolves the authenticated user from an
/// `Authorization: Bearer <jwt>` header. A missing header passes through
/// unauthenticated (public routes stay public); a present-but-invalid token is
/// rejected outright.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Some(value) = header {
        let token = value.strip_prefix("Bearer ").unwrap_or(value);
        match decode_user_id(&state.jwt_secret, token) {
            Some(user_id) => {
                request.extensions_mut().insert(AuthUser { user_id });
            }
            None => return AppError::Unauthorized.into_response(),
        }
    }

    next.run(request).await
}

/// Extractor for handlers that require identity. Fails the request with 401
/// when no authenticated user was resolved; wrap in `Option` on routes where
/// identity is optional.
pub struct CurrentUser(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .map(|user| CurrentUser(user.user_id))
            .ok_or(AppError::Unauthorized)
    }
}

fn decode_user_id(secret: &str, token: &str) -> Option<i64> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.sub)
}

/// Mints a short-lived HS256 token for the given user. Login endpoints live
/// outside this service; this exists for tooling and tests.
#[allow(dead_code)]
pub fn issue_token(secret: &str, user_id: i64, ttl_secs: i64) -> Result<String, AppError> {
    let exp = (chrono::Utc::now().timestamp() + ttl_secs) as usize;
    encode(
        &Header::default(),
        &Claims { sub: user_id, exp },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Unauthorized)
}
