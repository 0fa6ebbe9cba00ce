use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::{CurrentUser, JwtService};
use crate::error::ApiError;
use crate::schemas::AppState;

/// Require a valid bearer token and inject [`CurrentUser`] into request
/// extensions. Applied as a `route_layer` on the protected router, so public
/// routes never pass through here.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // CORS preflight carries no credentials
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header_value) => JwtService::extract_from_header(header_value)
            .ok_or(ApiError::InvalidToken)?,
        None => {
            warn!("Missing authorization header for {}", req.uri());
            return Err(ApiError::Unauthorized);
        }
    };

    match state.jwt.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims).map_err(|_| ApiError::InvalidToken)?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!("Token validation failed for {}: {}", req.uri(), e);
            match e {
                crate::auth::JwtError::ExpiredToken => Err(ApiError::TokenExpired),
                _ => Err(ApiError::InvalidToken),
            }
        }
    }
}
