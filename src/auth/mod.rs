use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config;

/// Permission scopes understood by the API, one per protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    GetDrinksDetail,
    PostDrinks,
    PatchDrinks,
    DeleteDrinks,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::GetDrinksDetail => "get:drinks-detail",
            Scope::PostDrinks => "post:drinks",
            Scope::PatchDrinks => "patch:drinks",
            Scope::DeleteDrinks => "delete:drinks",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.permissions.iter().any(|p| p == scope.as_str())
    }
}

/// Verify a bearer token and check it carries the required permission scope.
///
/// Signature, expiry, issuer and (when configured) audience are all checked
/// before the permission claim is consulted. Any failure is reported as a
/// message suitable for a 401 response.
pub fn verify_token(token: &str, scope: Scope) -> Result<Claims, String> {
    let auth = &config::config().auth;

    if auth.jwt_secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&auth.jwt_issuer]);
    match &auth.jwt_audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid bearer token: {}", e))?;

    if !token_data.claims.has_scope(scope) {
        return Err(format!("Token lacks required permission: {}", scope));
    }

    Ok(token_data.claims)
}
