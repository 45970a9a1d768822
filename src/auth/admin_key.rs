use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use crate::config::AppConfig;
use crate::errors::AppError;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Proof that the request carried the configured admin key.
///
/// Add it as a handler argument to gate the route; the handler body never runs
/// for a missing or wrong key.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

impl FromRequest for AdminKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(check(req))
    }
}

fn check(req: &HttpRequest) -> Result<AdminKey, AppError> {
    let expected = req
        .app_data::<web::Data<AppConfig>>()
        .and_then(|config| config.admin_key.clone());

    let Some(expected) = expected else {
        tracing::warn!(path = %req.path(), "admin request rejected: no admin key configured");
        return Err(AppError::Unauthorized);
    };

    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if keys_match(key.as_bytes(), expected.as_bytes()) => Ok(AdminKey),
        _ => {
            tracing::warn!(path = %req.path(), "admin request rejected: bad or missing key");
            Err(AppError::Unauthorized)
        }
    }
}

/// Length-independent of where the first mismatch is.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
