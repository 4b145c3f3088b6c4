use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::auth::{self, Scope};
use crate::error::ApiError;

/// Request-scoped authorization guard. Runs to completion before the wrapped
/// handler and short-circuits with 401 on any failure, so handler code never
/// executes for an unauthorized request.
pub async fn authorize(
    scope: Scope,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::verify_token(&token, scope).map_err(|msg| {
        tracing::debug!(scope = %scope, "authorization failed: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    // Forward the decoded claim payload to the handler
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Wrap every route in `router` behind a permission scope.
pub fn guard<S>(scope: Scope, router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn(
        move |headers: HeaderMap, request: Request, next: Next| {
            authorize(scope, headers, request, next)
        },
    ))
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn empty_token_is_rejected() {
        let headers = headers_with("Bearer ");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
