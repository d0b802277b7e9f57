//! Double-submit form tokens. The cookie copy is signed, so a forged cookie is
//! dropped by the jar before comparison.

use axum_extra::extract::cookie::SignedCookieJar;
use cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const CSRF_COOKIE: &str = "csrf_token";

/// Returns the jar (with a freshly minted token cookie if there was none) and the token
/// to embed in the form.
pub fn issue(jar: SignedCookieJar) -> (SignedCookieJar, String) {
    if let Some(existing) = jar.get(CSRF_COOKIE) {
        let token = existing.value().to_string();
        return (jar, token);
    }

    let token = Uuid::new_v4().simple().to_string();
    let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(12));
    (jar.add(cookie), token)
}

pub fn verify(jar: &SignedCookieJar, submitted: &str) -> AppResult<()> {
    match jar.get(CSRF_COOKIE) {
        Some(cookie) if !submitted.is_empty() && cookie.value() == submitted => Ok(()),
        _ => Err(AppError::Csrf),
    }
}
